//! Error types for route arena operations.

use thiserror::Error;

use crate::solution::{Link, NodeId};

/// Structural problems reported by the route arena.
///
/// Edit operations return the first group of variants when a caller asks
/// for a move that does not match the current link structure. The audit
/// variants are produced by [`Solution::validate`](crate::solution::Solution::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// `left` cannot be reached from `right` by following predecessors.
    #[error("no contiguous chain from {left} to {right}")]
    BrokenSegment {
        /// First node of the requested segment.
        left: NodeId,
        /// Last node of the requested segment.
        right: NodeId,
    },

    /// A relink endpoint lies inside the segment being relinked.
    #[error("{node} lies inside the segment being relinked")]
    EndpointInSegment {
        /// The offending endpoint.
        node: NodeId,
    },

    /// Both operands of a two-node edit are the same node.
    #[error("cannot exchange {node} with itself")]
    SameNode {
        /// The repeated node.
        node: NodeId,
    },

    /// `used[slot]` does not point back at the node that claims the slot.
    #[error("slot back-pointer of {node} is inconsistent")]
    SlotMismatch {
        /// Node whose back-pointer is wrong.
        node: NodeId,
    },

    /// A slot is on both or neither of the used and free lists.
    #[error("{node} is not on exactly one of the used and free lists")]
    NotPartitioned {
        /// Node breaking the partition.
        node: NodeId,
    },

    /// `from.successor == to` but `to.predecessor != from`.
    #[error("link {from} -> {to} is not mirrored")]
    AsymmetricLink {
        /// Predecessor side of the edge.
        from: Link,
        /// Successor side of the edge.
        to: Link,
    },

    /// Following successors from a head never reached the depot.
    #[error("route starting at {head} does not return to the depot")]
    UnterminatedRoute {
        /// Route head the walk started from.
        head: NodeId,
    },
}

/// Shape mismatches in problem data, reported when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// The flat matrix data does not hold `size * size` entries.
    #[error("{size}x{size} matrix needs {} entries, got {len}", .size * .size)]
    MatrixShape {
        /// Declared number of locations.
        size: usize,
        /// Number of entries supplied.
        len: usize,
    },

    /// The demand list does not cover every matrix location.
    #[error("{demands} demands for {locations} locations")]
    DemandCount {
        /// Number of demands supplied.
        demands: usize,
        /// Number of locations in the distance matrix.
        locations: usize,
    },
}

/// Result type alias for route arena operations.
pub type Result<T> = std::result::Result<T, RouteError>;
