//! Route-level bookkeeping derived from a [`Solution`](crate::solution::Solution).

mod route_context;

pub use route_context::RouteContext;
