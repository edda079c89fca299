//! The distance contract between a problem and the route arena.

/// Read-only provider of travel distances between customer locations.
///
/// Customer identifiers are the values stored in arena nodes; the depot is
/// a customer identifier too, conventionally `0`. Symmetry is not assumed.
/// The arena looks up a node's inbound leg as `distance(node, predecessor)`
/// and a route's return leg as `distance(last, depot)`.
///
/// # Examples
///
/// ```
/// use u_route_arena::distance::Distances;
///
/// struct Line;
///
/// impl Distances for Line {
///     fn distance(&self, from: usize, to: usize) -> f64 {
///         (from as f64 - to as f64).abs()
///     }
/// }
///
/// assert_eq!(Line.distance(1, 4), 3.0);
/// assert_eq!(Line.depot(), 0);
/// ```
pub trait Distances {
    /// Travel distance from location `from` to location `to`.
    fn distance(&self, from: usize, to: usize) -> f64;

    /// Customer identifier of the depot.
    fn depot(&self) -> usize {
        0
    }
}

impl<D: Distances + ?Sized> Distances for &D {
    fn distance(&self, from: usize, to: usize) -> f64 {
        (**self).distance(from, to)
    }

    fn depot(&self) -> usize {
        (**self).depot()
    }
}
