//! Euclidean distance and the neighbor record produced by a query.

use std::cmp::Ordering;

/// Euclidean distance `sqrt(sum((a_i - b_i)^2))` between two points.
///
/// Both slices must have the same length; callers validate the schema first.
#[must_use]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "points must share a schema");
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// A training row selected as one of the nearest neighbors of a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Zero-based row index in the training table.
    pub index: usize,
    /// Euclidean distance from the query to this row.
    pub distance: f64,
}

impl Neighbor {
    /// Total ordering by distance using [`f64::total_cmp`].
    #[must_use]
    pub fn cmp_distance(&self, other: &Self) -> Ordering {
        self.distance.total_cmp(&other.distance)
    }
}
