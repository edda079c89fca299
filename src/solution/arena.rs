//! The node arena and its link primitives.

use tracing::{debug, trace};

use super::node::NodeData;
use super::{Link, NodeId};
use crate::distance::Distances;
use crate::error::{Result, RouteError};

/// A set of disjoint, depot-anchored routes stored as doubly linked lists
/// over a recycling node arena.
///
/// Every active node is listed exactly once in a dense `used` array and
/// remembers its position there, so removal is a swap-with-last. Removed
/// slots go to a free stack and are handed out again before the arena
/// grows, which keeps steady-state editing allocation-free.
///
/// # Invariants
///
/// - `used[slot(n)] == n` for every active node `n`.
/// - Every slot is either active or free, never both.
/// - Links between regular nodes are mirrored: `successor(a) == b` iff
///   `predecessor(b) == a`.
/// - Each route starts at a node whose predecessor is [`Link::Depot`] and
///   ends at a node whose successor is [`Link::Depot`].
///
/// Reading or linking a removed node panics. Moves that do not match the
/// current link structure are reported as [`RouteError`]s.
///
/// # Examples
///
/// ```
/// use u_route_arena::distance::DistanceMatrix;
/// use u_route_arena::solution::{Link, Solution};
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
///
/// let mut sol = Solution::new();
/// let a = sol.insert(1, 10, Link::Depot, Link::Depot);
/// let b = sol.insert(2, 20, a, Link::Depot);
/// assert_eq!(sol.successor(a), Link::Node(b));
/// assert!((sol.total_distance(&dm) - 4.0).abs() < 1e-10);
///
/// sol.remove(a);
/// assert_eq!(sol.predecessor(b), Link::Depot);
/// assert_eq!(sol.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solution {
    pub(super) nodes: Vec<NodeData>,
    pub(super) used: Vec<NodeId>,
    pub(super) free: Vec<NodeId>,
    /// Reused buffer for segment snapshots.
    pub(super) scratch: Vec<NodeId>,
}

/// Which link a segment walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Walk {
    Forward,
    Backward,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty solution with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            used: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            scratch: Vec::new(),
        }
    }

    /// Predecessor of `node`; [`Link::Depot`] if it heads its route.
    pub fn predecessor(&self, node: NodeId) -> Link {
        self.record(node).predecessor
    }

    /// Successor of `node`; [`Link::Depot`] if it ends its route.
    pub fn successor(&self, node: NodeId) -> Link {
        self.record(node).successor
    }

    /// Customer represented by `node`.
    pub fn customer(&self, node: NodeId) -> usize {
        self.record(node).customer
    }

    /// Load recorded at `node`.
    pub fn load(&self, node: NodeId) -> i32 {
        self.record(node).load
    }

    /// Changes the customer represented by `node`.
    pub fn set_customer(&mut self, node: NodeId, customer: usize) {
        self.record_mut(node).customer = customer;
    }

    /// Changes the load recorded at `node`.
    pub fn set_load(&mut self, node: NodeId, load: i32) {
        self.record_mut(node).load = load;
    }

    /// Returns `true` if `node` is allocated and not yet removed.
    pub fn is_active(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.index())
            .is_some_and(|data| data.slot.is_some())
    }

    /// Active nodes, in no particular order.
    pub fn node_indices(&self) -> &[NodeId] {
        &self.used
    }

    /// Removed slots waiting to be recycled.
    pub fn free_indices(&self) -> &[NodeId] {
        &self.free
    }

    /// Number of active nodes.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Returns `true` if no node is active.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Number of slots ever allocated (active plus free).
    pub fn num_slots(&self) -> usize {
        self.nodes.len()
    }

    /// Claims a slot for `customer`, recycling a removed one when possible.
    ///
    /// The new node is unlinked (both neighbors [`Link::Depot`]); the caller
    /// links it into a route.
    pub fn allocate(&mut self, customer: usize, load: i32) -> NodeId {
        let node = match self.free.pop() {
            Some(node) => {
                self.nodes[node.index()] = NodeData::detached(customer, load);
                node
            }
            None => {
                let node = NodeId::new(self.nodes.len());
                self.nodes.push(NodeData::detached(customer, load));
                trace!(slot = node.index(), "arena grew");
                node
            }
        };
        self.nodes[node.index()].slot = Some(self.used.len());
        self.used.push(node);
        node
    }

    /// Makes `successor` follow `predecessor`.
    ///
    /// A [`Link::Depot`] side is left untouched. No cycle or membership
    /// checks are made.
    ///
    /// # Panics
    ///
    /// Panics if either side is a removed or unknown node.
    pub fn link(&mut self, predecessor: impl Into<Link>, successor: impl Into<Link>) {
        let (predecessor, successor) = (predecessor.into(), successor.into());
        if let Link::Node(node) = successor {
            self.record_mut(node).predecessor = predecessor;
        }
        if let Link::Node(node) = predecessor {
            self.record_mut(node).successor = successor;
        }
    }

    /// Allocates a node for `customer` and links it as
    /// `predecessor -> new -> successor`.
    pub fn insert(
        &mut self,
        customer: usize,
        load: i32,
        predecessor: impl Into<Link>,
        successor: impl Into<Link>,
    ) -> NodeId {
        let node = self.allocate(customer, load);
        self.link(predecessor, node);
        self.link(node, successor);
        node
    }

    /// Splices `node` out of its route and returns its slot to the free list.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not active.
    pub fn remove(&mut self, node: NodeId) {
        let data = self.record(node);
        let (predecessor, successor) = (data.predecessor, data.successor);
        self.link(predecessor, successor);
        self.release(node);
    }

    /// Reverses the chain `left ..= right`, relinking it as
    /// `predecessor -> right -> ... -> left -> successor`.
    ///
    /// The chain is read through predecessor links from `right` back to
    /// `left`; the links of `predecessor` and `successor` themselves are not
    /// inspected, so the segment may already be spliced out of its old place.
    /// Nothing is modified when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`RouteError::BrokenSegment`] if `left` is not reachable from `right`
    ///   over mirrored predecessor links.
    /// - [`RouteError::EndpointInSegment`] if `predecessor` or `successor`
    ///   is part of the segment.
    pub fn reverse_segment(
        &mut self,
        left: NodeId,
        right: NodeId,
        predecessor: impl Into<Link>,
        successor: impl Into<Link>,
    ) -> Result<()> {
        let (predecessor, successor) = (predecessor.into(), successor.into());
        let mut chain = std::mem::take(&mut self.scratch);
        let result = self
            .capture(right, left, Walk::Backward, &mut chain)
            .and_then(|()| check_endpoints(&chain, [predecessor, successor]));

        match &result {
            Ok(()) => {
                let mut previous = predecessor;
                for &node in &chain {
                    self.link(previous, node);
                    previous = Link::Node(node);
                }
                self.link(left, successor);
            }
            Err(err) => debug!(%left, %right, %err, "segment reversal rejected"),
        }

        chain.clear();
        self.scratch = chain;
        result
    }

    /// Total distance over all routes.
    ///
    /// Each active node contributes `distance(customer, predecessor)`, with
    /// the depot standing in for a missing predecessor, and a route's last
    /// node adds `distance(customer, depot)`. The inbound leg is looked up
    /// from the node's side, so on an asymmetric matrix it is not the
    /// travel-direction entry.
    pub fn total_distance<D: Distances + ?Sized>(&self, problem: &D) -> f64 {
        let depot = problem.depot();
        self.used
            .iter()
            .map(|&node| {
                let data = &self.nodes[node.index()];
                let previous = self.customer_or(data.predecessor, depot);
                let mut leg = problem.distance(data.customer, previous);
                if data.successor.is_depot() {
                    leg += problem.distance(data.customer, depot);
                }
                leg
            })
            .sum()
    }

    /// Audits every arena invariant, returning the first violation found.
    ///
    /// Runs in O(slots); intended for tests and debug assertions.
    pub fn validate(&self) -> Result<()> {
        for (slot, &node) in self.used.iter().enumerate() {
            match self.nodes.get(node.index()) {
                Some(data) if data.slot == Some(slot) => {}
                _ => return Err(RouteError::SlotMismatch { node }),
            }
        }

        let mut seen = vec![false; self.nodes.len()];
        for &node in self.used.iter().chain(&self.free) {
            match seen.get_mut(node.index()) {
                Some(mark) if !*mark => *mark = true,
                _ => return Err(RouteError::NotPartitioned { node }),
            }
        }
        if let Some(missing) = seen.iter().position(|&mark| !mark) {
            return Err(RouteError::NotPartitioned {
                node: NodeId::new(missing),
            });
        }
        if let Some(&node) = self.free.iter().find(|&&node| self.is_active(node)) {
            return Err(RouteError::NotPartitioned { node });
        }

        for &node in &self.used {
            let data = &self.nodes[node.index()];
            if let Link::Node(next) = data.successor {
                if !self.is_active(next) || self.nodes[next.index()].predecessor != Link::Node(node) {
                    return Err(RouteError::AsymmetricLink {
                        from: Link::Node(node),
                        to: data.successor,
                    });
                }
            }
            if let Link::Node(prev) = data.predecessor {
                if !self.is_active(prev) || self.nodes[prev.index()].successor != Link::Node(node) {
                    return Err(RouteError::AsymmetricLink {
                        from: data.predecessor,
                        to: Link::Node(node),
                    });
                }
            }
        }

        let mut on_route = vec![false; self.nodes.len()];
        for &head in self.used.iter().filter(|&&n| self.nodes[n.index()].predecessor.is_depot()) {
            let mut current = Link::Node(head);
            while let Link::Node(node) = current {
                if on_route[node.index()] {
                    return Err(RouteError::UnterminatedRoute { head });
                }
                on_route[node.index()] = true;
                current = self.nodes[node.index()].successor;
            }
        }
        if let Some(&node) = self.used.iter().find(|&&n| !on_route[n.index()]) {
            return Err(RouteError::UnterminatedRoute { head: node });
        }

        Ok(())
    }

    /// Collects the chain from `from` to `to` into `chain`, following
    /// mirrored links in the given direction.
    pub(super) fn capture(
        &self,
        from: NodeId,
        to: NodeId,
        walk: Walk,
        chain: &mut Vec<NodeId>,
    ) -> Result<()> {
        let broken = match walk {
            Walk::Forward => RouteError::BrokenSegment { left: from, right: to },
            Walk::Backward => RouteError::BrokenSegment { left: to, right: from },
        };

        chain.clear();
        let mut current = from;
        loop {
            chain.push(current);
            if current == to {
                return Ok(());
            }
            if chain.len() >= self.used.len() {
                return Err(broken);
            }
            let data = self.record(current);
            let next = match walk {
                Walk::Forward => data.successor,
                Walk::Backward => data.predecessor,
            };
            current = match next {
                Link::Node(next) if self.mirror(next, walk) == Link::Node(current) => next,
                _ => return Err(broken),
            };
        }
    }

    /// The link of `node` pointing back against the walk direction.
    fn mirror(&self, node: NodeId, walk: Walk) -> Link {
        let data = self.record(node);
        match walk {
            Walk::Forward => data.predecessor,
            Walk::Backward => data.successor,
        }
    }

    fn customer_or(&self, link: Link, depot: usize) -> usize {
        match link {
            Link::Depot => depot,
            Link::Node(node) => self.customer(node),
        }
    }

    /// Drops `node` from `used` by swap-with-last and pushes it on `free`.
    ///
    /// This is the only place that moves entries of `used` around.
    fn release(&mut self, node: NodeId) {
        let slot = self.nodes[node.index()]
            .slot
            .take()
            .unwrap_or_else(|| panic!("{node} released twice"));
        self.used.swap_remove(slot);
        if let Some(&moved) = self.used.get(slot) {
            self.nodes[moved.index()].slot = Some(slot);
        }
        self.free.push(node);
    }

    fn record(&self, node: NodeId) -> &NodeData {
        let data = self
            .nodes
            .get(node.index())
            .unwrap_or_else(|| panic!("{node} is outside the arena ({} slots)", self.nodes.len()));
        assert!(data.slot.is_some(), "{node} was removed");
        data
    }

    fn record_mut(&mut self, node: NodeId) -> &mut NodeData {
        let slots = self.nodes.len();
        let data = self
            .nodes
            .get_mut(node.index())
            .unwrap_or_else(|| panic!("{node} is outside the arena ({slots} slots)"));
        assert!(data.slot.is_some(), "{node} was removed");
        data
    }
}

/// Rejects relink endpoints that sit inside the captured segment.
pub(super) fn check_endpoints(chain: &[NodeId], endpoints: [Link; 2]) -> Result<()> {
    for endpoint in endpoints {
        if let Link::Node(node) = endpoint {
            if chain.contains(&node) {
                return Err(RouteError::EndpointInSegment { node });
            }
        }
    }
    Ok(())
}
