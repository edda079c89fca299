//! Problem data consumed read-only by the route arena.
//!
//! The arena never decides feasibility; demands and capacity are carried
//! here for the solver that drives it.

mod problem;

pub use problem::Problem;
