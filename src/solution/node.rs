//! Node handles, link tokens, and per-slot records.

use std::fmt;

/// A stable handle to a slot in a [`Solution`](super::Solution) arena.
///
/// Handles are plain indices. They stay valid while the node is active and
/// may be handed out again after the node is removed, so holding on to a
/// handle across a `remove` is a logic error that the arena reports by
/// panicking on the next access.
///
/// # Examples
///
/// ```
/// use u_route_arena::solution::{Link, Solution};
///
/// let mut sol = Solution::new();
/// let a = sol.insert(7, 10, Link::Depot, Link::Depot);
/// assert_eq!(a.index(), 0);
/// assert_eq!(sol.customer(a), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Wraps a raw slot index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw slot index in the arena.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// One end of an edge: either another node or the depot.
///
/// The depot is never stored in the arena. As a predecessor it marks a
/// route head; as a successor it marks the end of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Link {
    /// The depot sentinel.
    Depot,
    /// A regular node.
    Node(NodeId),
}

impl Link {
    /// Returns `true` for the depot sentinel.
    pub fn is_depot(self) -> bool {
        matches!(self, Link::Depot)
    }

    /// Returns the node, or `None` for the depot.
    pub fn node(self) -> Option<NodeId> {
        match self {
            Link::Depot => None,
            Link::Node(node) => Some(node),
        }
    }
}

impl From<NodeId> for Link {
    fn from(node: NodeId) -> Self {
        Link::Node(node)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Depot => f.write_str("depot"),
            Link::Node(node) => node.fmt(f),
        }
    }
}

/// Record stored in each arena slot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeData {
    pub(crate) predecessor: Link,
    pub(crate) successor: Link,
    pub(crate) customer: usize,
    pub(crate) load: i32,
    /// Position in `used`; `None` while the slot sits on the free list.
    pub(crate) slot: Option<usize>,
}

impl NodeData {
    pub(crate) fn detached(customer: usize, load: i32) -> Self {
        Self {
            predecessor: Link::Depot,
            successor: Link::Depot,
            customer,
            load,
            slot: None,
        }
    }
}
