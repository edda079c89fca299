//! Dense distance matrix.

use serde::{Deserialize, Serialize};

use super::Distances;
use crate::error::DataError;

/// A dense n×n distance matrix stored in row-major order.
///
/// Row and column `i` belong to customer identifier `i`, with the depot at
/// index 0.
///
/// # Examples
///
/// ```
/// use u_route_arena::distance::{DistanceMatrix, Distances};
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert!((dm.distance(1, 2) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixFields")]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

/// Unchecked wire form, accepted only through [`DistanceMatrix::from_data`].
#[derive(Deserialize)]
struct MatrixFields {
    data: Vec<f64>,
    size: usize,
}

impl TryFrom<MatrixFields> for DistanceMatrix {
    type Error = DataError;

    fn try_from(fields: MatrixFields) -> Result<Self, Self::Error> {
        let len = fields.data.len();
        Self::from_data(fields.size, fields.data).ok_or(DataError::MatrixShape {
            size: fields.size,
            len,
        })
    }
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a Euclidean distance matrix from `(x, y)` locations.
    pub fn from_coordinates(points: &[(f64, f64)]) -> Self {
        let data = points
            .iter()
            .flat_map(|&(x1, y1)| points.iter().map(move |&(x2, y2)| (x1 - x2).hypot(y1 - y2)))
            .collect();
        Self {
            data,
            size: points.len(),
        }
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[self.offset(from, to)]
    }

    /// Overwrites one directed entry.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        let at = self.offset(from, to);
        self.data[at] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `d(i, j)` and `d(j, i)` differ by at most `tol`
    /// for every pair.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        self.data.chunks_exact(self.size.max(1)).enumerate().all(|(row, entries)| {
            entries[..row]
                .iter()
                .enumerate()
                .all(|(col, &d)| (d - self.get(col, row)).abs() <= tol)
        })
    }

    fn offset(&self, from: usize, to: usize) -> usize {
        assert!(
            from < self.size && to < self.size,
            "location ({from}, {to}) outside {n}x{n} matrix",
            n = self.size
        );
        from * self.size + to
    }
}

impl Distances for DistanceMatrix {
    fn distance(&self, from: usize, to: usize) -> f64 {
        self.get(from, to)
    }
}
