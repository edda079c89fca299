//! Route enumeration, per-route queries, and the human-readable dump.

use std::fmt;
use std::iter::FusedIterator;

use super::{Link, NodeId, Solution};
use crate::distance::Distances;

/// Iterator over route heads, created by [`Solution::route_heads`].
///
/// Heads are discovered by scanning the active nodes for a depot
/// predecessor, so the order follows the arena's internal `used` order.
#[derive(Debug, Clone)]
pub struct RouteHeads<'a> {
    solution: &'a Solution,
    scan: std::slice::Iter<'a, NodeId>,
}

impl Iterator for RouteHeads<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let solution = self.solution;
        self.scan
            .by_ref()
            .copied()
            .find(|&node| solution.predecessor(node).is_depot())
    }
}

impl FusedIterator for RouteHeads<'_> {}

/// Iterator over the nodes of one route, created by [`Solution::route`].
///
/// # Panics
///
/// Panics if the route visits more nodes than the arena holds, which can
/// only happen when a caller linked a cycle.
#[derive(Debug, Clone)]
pub struct RouteNodes<'a> {
    solution: &'a Solution,
    next: Link,
    budget: usize,
}

impl Iterator for RouteNodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next.node()?;
        assert!(self.budget > 0, "route through {node} never returns to the depot");
        self.budget -= 1;
        self.next = self.solution.successor(node);
        Some(node)
    }
}

impl FusedIterator for RouteNodes<'_> {}

/// Iterator over all routes, created by [`Solution::routes`].
#[derive(Debug, Clone)]
pub struct Routes<'a> {
    heads: RouteHeads<'a>,
}

impl<'a> Iterator for Routes<'a> {
    type Item = RouteNodes<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let solution = self.heads.solution;
        let head = self.heads.next()?;
        Some(solution.route(head))
    }
}

impl FusedIterator for Routes<'_> {}

impl Solution {
    /// Builds a solution from customer sequences, one route per entry.
    ///
    /// Empty sequences produce no route. `load_of` supplies each stop's load.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_route_arena::solution::Solution;
    ///
    /// let demands = [0, 10, 20, 30];
    /// let sol = Solution::from_routes(&[vec![1, 3], vec![], vec![2]], |c| demands[c]);
    /// assert_eq!(sol.num_routes(), 2);
    /// assert_eq!(sol.len(), 3);
    /// ```
    pub fn from_routes<F>(routes: &[Vec<usize>], load_of: F) -> Self
    where
        F: Fn(usize) -> i32,
    {
        let mut solution = Self::with_capacity(routes.iter().map(Vec::len).sum());
        for route in routes {
            let mut previous = Link::Depot;
            for &customer in route {
                let node = solution.insert(customer, load_of(customer), previous, Link::Depot);
                previous = Link::Node(node);
            }
        }
        solution
    }

    /// Lazily yields the head of every route.
    pub fn route_heads(&self) -> RouteHeads<'_> {
        RouteHeads {
            solution: self,
            scan: self.used.iter(),
        }
    }

    /// Lazily yields every route as an iterator over its nodes.
    ///
    /// Each call re-derives routes from the current links.
    pub fn routes(&self) -> Routes<'_> {
        Routes {
            heads: self.route_heads(),
        }
    }

    /// Nodes of the route starting at `head`, in travel order.
    pub fn route(&self, head: NodeId) -> RouteNodes<'_> {
        RouteNodes {
            solution: self,
            next: Link::Node(head),
            budget: self.used.len(),
        }
    }

    /// Customers of the route starting at `head`, in travel order.
    pub fn customers(&self, head: NodeId) -> impl Iterator<Item = usize> + '_ {
        self.route(head).map(move |node| self.customer(node))
    }

    /// Number of routes.
    pub fn num_routes(&self) -> usize {
        self.route_heads().count()
    }

    /// Customer sequences of all routes, in [`route_heads`](Self::route_heads) order.
    pub fn to_routes(&self) -> Vec<Vec<usize>> {
        self.route_heads()
            .map(|head| self.customers(head).collect())
            .collect()
    }

    /// Finds the head of the route containing `node` and the 0-based
    /// position of `node` within it.
    ///
    /// # Panics
    ///
    /// Panics if the predecessor chain loops.
    pub fn route_head_of(&self, node: NodeId) -> (NodeId, usize) {
        let mut head = node;
        let mut position = 0;
        while let Link::Node(previous) = self.predecessor(head) {
            position += 1;
            assert!(
                position <= self.used.len(),
                "predecessor chain of {node} never reaches the depot"
            );
            head = previous;
        }
        (head, position)
    }

    /// Distance of the route starting at `head`, depot legs included.
    ///
    /// Sums the same legs [`total_distance`](Self::total_distance) counts
    /// for this route's nodes.
    pub fn route_distance<D: Distances + ?Sized>(&self, head: NodeId, problem: &D) -> f64 {
        let depot = problem.depot();
        let mut previous = depot;
        let mut distance = 0.0;
        for customer in self.customers(head) {
            distance += problem.distance(customer, previous);
            previous = customer;
        }
        distance + problem.distance(previous, depot)
    }

    /// Renders one line per route: `Route k: 0 - customer (load) - ... - 0`.
    pub fn format_routes(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (number, route) in self.routes().enumerate() {
            if number > 0 {
                writeln!(f)?;
            }
            write!(f, "Route {}: 0", number + 1)?;
            for node in route {
                write!(f, " - {} ({})", self.customer(node), self.load(node))?;
            }
            write!(f, " - 0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    fn two_routes() -> Solution {
        Solution::from_routes(&[vec![1, 2, 3], vec![4, 5]], |c| c as i32 * 10)
    }

    #[test]
    fn test_from_routes_shape() {
        let sol = two_routes();
        assert_eq!(sol.len(), 5);
        assert_eq!(sol.num_routes(), 2);
        assert_eq!(sol.to_routes(), vec![vec![1, 2, 3], vec![4, 5]]);
        assert!(sol.validate().is_ok());
    }

    #[test]
    fn test_route_heads_restartable() {
        let sol = two_routes();
        let first: Vec<_> = sol.route_heads().collect();
        let second: Vec<_> = sol.route_heads().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_routes_reflect_edits() {
        let mut sol = two_routes();
        let heads: Vec<_> = sol.route_heads().collect();
        sol.remove(heads[1]);
        assert_eq!(sol.to_routes().len(), 2);
        assert!(sol.to_routes().contains(&vec![5]));
    }

    #[test]
    fn test_route_head_of() {
        let sol = two_routes();
        let head = sol.route_heads().next().expect("has routes");
        let nodes: Vec<_> = sol.route(head).collect();
        assert_eq!(sol.route_head_of(nodes[0]), (head, 0));
        assert_eq!(sol.route_head_of(nodes[2]), (head, 2));
    }

    #[test]
    fn test_route_distance_matches_total() {
        let dm = DistanceMatrix::from_coordinates(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (0.0, 1.0),
            (0.0, 2.0),
        ]);
        let sol = two_routes();
        let per_route: f64 = sol.route_heads().map(|h| sol.route_distance(h, &dm)).sum();
        assert!((per_route - sol.total_distance(&dm)).abs() < 1e-10);
        // 0→1→2→3→0 = 6, 0→4→5→0 = 4
        assert!((per_route - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_route_distance_asymmetric() {
        let dm = DistanceMatrix::from_data(
            3,
            vec![
                0.0, 10.0, 4.0, //
                3.0, 0.0, 7.0, //
                2.0, 1.0, 0.0,
            ],
        )
        .expect("3x3");
        let sol = Solution::from_routes(&[vec![1, 2]], |_| 0);
        let head = sol.route_heads().next().expect("one route");
        // d(1, 0) + d(2, 1) + d(2, 0)
        assert!((sol.route_distance(head, &dm) - 6.0).abs() < 1e-10);
        assert!((sol.route_distance(head, &dm) - sol.total_distance(&dm)).abs() < 1e-10);
    }

    #[test]
    fn test_format_routes() {
        let sol = Solution::from_routes(&[vec![3, 1], vec![2]], |c| c as i32 * 5);
        assert_eq!(
            sol.format_routes(),
            "Route 1: 0 - 3 (15) - 1 (5) - 0\nRoute 2: 0 - 2 (10) - 0"
        );
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(Solution::new().format_routes(), "");
    }

    #[test]
    #[should_panic(expected = "never returns to the depot")]
    fn test_route_cycle_panics() {
        let mut sol = Solution::new();
        let a = sol.allocate(1, 0);
        let b = sol.allocate(2, 0);
        sol.link(a, b);
        sol.link(b, a);
        let _ = sol.route(a).count();
    }
}
