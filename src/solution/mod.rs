//! Index-based route arena.
//!
//! A [`Solution`] keeps every route as a doubly linked list over a flat,
//! recycling node arena. Nodes are addressed by [`NodeId`]; a [`Link`] is
//! either another node or the depot, which is never stored in the arena.
//!
//! - [`arena`](Solution::link) — allocation, link/unlink, reversal, objective
//! - [`routes`](Solution::routes) — route enumeration and the text dump
//! - [`edit`](Solution::move_segment) — segment moves, exchanges, sampling

mod arena;
mod edit;
mod node;
mod proptests;
mod routes;

pub use arena::Solution;
pub use node::{Link, NodeId};
pub use routes::{RouteHeads, RouteNodes, Routes};
