//! Capacitated routing problem data.

use serde::{Deserialize, Serialize};

use crate::distance::{DistanceMatrix, Distances};
use crate::error::DataError;

/// A capacitated vehicle routing instance.
///
/// Holds the per-customer demands (index 0 = depot), the vehicle capacity,
/// and the distance matrix between all locations. The arena only reads
/// distances; demands and capacity are carried for the caller's
/// feasibility logic.
///
/// # Examples
///
/// ```
/// use u_route_arena::models::Problem;
/// use u_route_arena::distance::Distances;
///
/// let problem = Problem::from_coordinates(
///     &[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)],
///     vec![0, 10, 20],
///     100,
/// )
/// .expect("one demand per location");
/// assert_eq!(problem.num_customers(), 3);
/// assert_eq!(problem.demand(2), 20);
/// assert!((problem.distance(0, 1) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProblemFields")]
pub struct Problem {
    capacity: i32,
    demands: Vec<i32>,
    distances: DistanceMatrix,
}

#[derive(Deserialize)]
struct ProblemFields {
    capacity: i32,
    demands: Vec<i32>,
    distances: DistanceMatrix,
}

impl TryFrom<ProblemFields> for Problem {
    type Error = DataError;

    fn try_from(fields: ProblemFields) -> Result<Self, Self::Error> {
        let (demands, locations) = (fields.demands.len(), fields.distances.size());
        Self::new(fields.capacity, fields.demands, fields.distances)
            .ok_or(DataError::DemandCount { demands, locations })
    }
}

impl Problem {
    /// Creates a problem from explicit data.
    ///
    /// Returns `None` if the number of demands doesn't match the matrix size.
    pub fn new(capacity: i32, demands: Vec<i32>, distances: DistanceMatrix) -> Option<Self> {
        if demands.len() != distances.size() {
            return None;
        }
        Some(Self {
            capacity,
            demands,
            distances,
        })
    }

    /// Creates a problem with Euclidean distances between `(x, y)` locations.
    pub fn from_coordinates(
        points: &[(f64, f64)],
        demands: Vec<i32>,
        capacity: i32,
    ) -> Option<Self> {
        Self::new(capacity, demands, DistanceMatrix::from_coordinates(points))
    }

    /// Number of locations, including the depot.
    pub fn num_customers(&self) -> usize {
        self.demands.len()
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Demand of the given customer.
    pub fn demand(&self, customer: usize) -> i32 {
        self.demands[customer]
    }

    /// The underlying distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}

impl Distances for Problem {
    fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }
}
