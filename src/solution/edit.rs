//! Compound edits built from the link primitives.
//!
//! These apply moves a search procedure has already chosen: relocating a
//! segment (Or-opt), swapping two nodes (exchange), and picking a random
//! node to seed a ruin step.

use rand::Rng;
use tracing::debug;

use super::arena::{check_endpoints, Walk};
use super::{Link, NodeId, Solution};
use crate::error::{Result, RouteError};

impl Solution {
    /// Cuts the chain `head ..= tail` out of its route and relinks it
    /// between `predecessor` and `successor`, reversed if requested.
    ///
    /// The gap left behind is closed first, so `predecessor` and `successor`
    /// may be the nodes that surrounded the segment. They should be adjacent
    /// once the segment is gone; that is not checked.
    ///
    /// # Errors
    ///
    /// - [`RouteError::BrokenSegment`] if `tail` is not reachable from
    ///   `head` over mirrored successor links.
    /// - [`RouteError::EndpointInSegment`] if `predecessor` or `successor`
    ///   is part of the segment.
    ///
    /// Nothing is modified when an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_route_arena::solution::{Link, Solution};
    ///
    /// let mut sol = Solution::from_routes(&[vec![1, 2, 3, 4]], |_| 1);
    /// let nodes: Vec<_> = sol.route_heads().flat_map(|h| sol.route(h)).collect();
    ///
    /// // Move [2, 3] to the end, reversed.
    /// sol.move_segment(nodes[1], nodes[2], nodes[3], Link::Depot, true).unwrap();
    /// assert_eq!(sol.to_routes(), vec![vec![1, 4, 3, 2]]);
    /// ```
    pub fn move_segment(
        &mut self,
        head: NodeId,
        tail: NodeId,
        predecessor: impl Into<Link>,
        successor: impl Into<Link>,
        reversed: bool,
    ) -> Result<()> {
        let (predecessor, successor) = (predecessor.into(), successor.into());
        let mut chain = std::mem::take(&mut self.scratch);
        let checked = self
            .capture(head, tail, Walk::Forward, &mut chain)
            .and_then(|()| check_endpoints(&chain, [predecessor, successor]));
        chain.clear();
        self.scratch = chain;
        if let Err(err) = checked {
            debug!(%head, %tail, %err, "segment move rejected");
            return Err(err);
        }

        let (before, after) = (self.predecessor(head), self.successor(tail));
        self.link(before, after);
        if reversed {
            self.reverse_segment(head, tail, predecessor, successor)
        } else {
            self.link(predecessor, head);
            self.link(tail, successor);
            Ok(())
        }
    }

    /// Swaps the positions of `a` and `b`, within one route or across two.
    ///
    /// Adjacent nodes are handled as a two-node reversal.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::SameNode`] if `a == b`.
    pub fn exchange(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        if a == b {
            return Err(RouteError::SameNode { node: a });
        }
        if self.successor(a) == Link::Node(b) {
            let (before, after) = (self.predecessor(a), self.successor(b));
            return self.reverse_segment(a, b, before, after);
        }
        if self.successor(b) == Link::Node(a) {
            let (before, after) = (self.predecessor(b), self.successor(a));
            return self.reverse_segment(b, a, before, after);
        }

        let (before_a, after_a) = (self.predecessor(a), self.successor(a));
        let (before_b, after_b) = (self.predecessor(b), self.successor(b));
        self.link(before_a, b);
        self.link(b, after_a);
        self.link(before_b, a);
        self.link(a, after_b);
        Ok(())
    }

    /// Picks an active node uniformly at random, or `None` if empty.
    pub fn random_node<R: Rng>(&self, rng: &mut R) -> Option<NodeId> {
        if self.used.is_empty() {
            return None;
        }
        Some(self.used[rng.random_range(0..self.used.len())])
    }
}
