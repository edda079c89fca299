//! Per-route summaries: head, tail, total load, and prefix loads.

use tracing::debug;

use crate::solution::{Link, NodeId, Solution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RouteData {
    head: NodeId,
    tail: NodeId,
    load: i32,
}

/// Cached route summaries derived from a [`Solution`].
///
/// Route indices are dense (`0..num_routes()`) and belong to the context,
/// not the arena. The context is not updated by arena edits; call
/// [`update_route`](Self::update_route) for the routes an edit touched, or
/// [`rebuild`](Self::rebuild) to start over.
///
/// # Examples
///
/// ```
/// use u_route_arena::context::RouteContext;
/// use u_route_arena::solution::Solution;
///
/// let sol = Solution::from_routes(&[vec![1, 2], vec![3]], |c| c as i32 * 10);
/// let mut ctx = RouteContext::new();
/// ctx.rebuild(&sol);
/// assert_eq!(ctx.num_routes(), 2);
/// assert_eq!(ctx.load(0) + ctx.load(1), 60);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    routes: Vec<RouteData>,
    pre_loads: Vec<i32>,
}

impl RouteContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// First node of the route.
    pub fn head(&self, route: usize) -> NodeId {
        self.routes[route].head
    }

    /// Last node of the route.
    pub fn tail(&self, route: usize) -> NodeId {
        self.routes[route].tail
    }

    /// Total load carried on the route.
    pub fn load(&self, route: usize) -> i32 {
        self.routes[route].load
    }

    /// Load accumulated from the route head up to and including `node`.
    pub fn pre_load(&self, node: NodeId) -> i32 {
        self.pre_loads[node.index()]
    }

    /// Replaces the head of a route, e.g. after an edit moved the first node.
    pub fn set_head(&mut self, route: usize, head: NodeId) {
        self.routes[route].head = head;
    }

    /// Adds `load` to the route total without touching prefix loads.
    pub fn add_load(&mut self, route: usize, load: i32) {
        self.routes[route].load += load;
    }

    /// Number of routes tracked.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Drops every route from index `num_routes` on.
    pub fn truncate(&mut self, num_routes: usize) {
        self.routes.truncate(num_routes);
    }

    /// Appends a route summary and returns its index.
    pub fn add_route(&mut self, head: NodeId, tail: NodeId, load: i32) -> usize {
        self.routes.push(RouteData { head, tail, load });
        self.routes.len() - 1
    }

    /// Copies the summary of route `src` over route `dest`.
    pub fn move_route(&mut self, dest: usize, src: usize) {
        self.routes[dest] = self.routes[src];
    }

    /// Recomputes every route from the solution's current links.
    pub fn rebuild(&mut self, solution: &Solution) {
        self.routes.clear();
        for head in solution.route_heads() {
            self.add_route(head, head, 0);
        }
        for route in 0..self.routes.len() {
            self.update_route(solution, route, Link::Depot);
        }
        debug!(routes = self.routes.len(), nodes = solution.len(), "route context rebuilt");
    }

    /// Recomputes tail, total load, and prefix loads of `route` for every
    /// node after `after`. Pass [`Link::Depot`] to start from the head.
    ///
    /// Prefix loads up to and including `after` are taken as correct.
    pub fn update_route(&mut self, solution: &Solution, route: usize, after: Link) {
        if self.pre_loads.len() < solution.num_slots() {
            self.pre_loads.resize(solution.num_slots(), 0);
        }

        let (mut load, mut current, mut tail) = match after {
            Link::Depot => (0, Link::Node(self.routes[route].head), None),
            Link::Node(node) => (self.pre_load(node), solution.successor(node), Some(node)),
        };
        while let Link::Node(node) = current {
            load += solution.load(node);
            self.pre_loads[node.index()] = load;
            tail = Some(node);
            current = solution.successor(node);
        }

        let data = &mut self.routes[route];
        data.tail = tail.unwrap_or(data.head);
        data.load = load;
    }
}
