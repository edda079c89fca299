//! # u-route-arena
//!
//! Mutable route representation for vehicle routing local search: an
//! index-based arena of doubly linked route nodes with O(1) insert and
//! remove, O(k) segment reversal, and total-distance evaluation.
//!
//! ## Modules
//!
//! - [`solution`] — The route arena (`Solution`), node handles, route iteration
//! - [`context`] — Per-route head/tail/load summaries
//! - [`distance`] — Distance contract and dense distance matrix
//! - [`models`] — Capacitated problem data
//! - [`error`] — Error type for rejected edits and failed audits

pub mod context;
pub mod distance;
pub mod error;
pub mod models;
pub mod solution;

pub use error::{DataError, Result, RouteError};
