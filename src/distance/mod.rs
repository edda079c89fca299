//! Distance lookups consumed by objective evaluation.
//!
//! Provides the [`Distances`] trait and a dense distance matrix.

mod matrix;
mod source;

pub use matrix::DistanceMatrix;
pub use source::Distances;
