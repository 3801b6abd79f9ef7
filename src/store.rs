//! Point storage shared by the clustering algorithms.
//!
//! A [`PointStore`] owns the dataset for one clustering run: each point's
//! dimension vector (immutable after load) plus its mutable assignment state
//! (current cluster and cached squared distance to the assigned centroid).
//! Clusterers never mutate a caller's store; they take a working copy with
//! assignments reset, so several algorithms can run against the same logical
//! dataset without interfering with each other.

use crate::error::{Error, Result};

/// A single point: immutable dimensions plus mutable assignment state.
#[derive(Debug, Clone)]
pub struct Point {
    dims: Vec<f64>,
    cluster: Option<usize>,
    dist_sq: f64,
}

impl Point {
    fn new(dims: Vec<f64>) -> Self {
        Self {
            dims,
            cluster: None,
            dist_sq: f64::INFINITY,
        }
    }

    /// Dimension values of this point.
    pub fn dims(&self) -> &[f64] {
        &self.dims
    }

    /// Currently assigned cluster, or `None` if no clusterer has run yet.
    pub fn cluster(&self) -> Option<usize> {
        self.cluster
    }

    /// Cached squared distance to the assigned centroid.
    ///
    /// Starts at `f64::INFINITY`; only meaningful after a centroid-based
    /// fit. Linkage fits leave it untouched.
    pub fn dist_sq(&self) -> f64 {
        self.dist_sq
    }

    pub(crate) fn assign(&mut self, cluster: usize, dist_sq: f64) {
        self.cluster = Some(cluster);
        self.dist_sq = dist_sq;
    }

    pub(crate) fn set_cluster(&mut self, cluster: usize) {
        self.cluster = Some(cluster);
    }

    pub(crate) fn reset(&mut self) {
        self.cluster = None;
        self.dist_sq = f64::INFINITY;
    }
}

/// Squared Euclidean distance between two dimension vectors.
#[inline]
pub(crate) fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// An owned set of points; point ids are indices into the store.
#[derive(Debug, Clone)]
pub struct PointStore {
    points: Vec<Point>,
    dim: usize,
}

impl PointStore {
    /// Build a store from row vectors.
    ///
    /// Every row must have the same dimensionality; the input must be
    /// non-empty.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyInput);
        }
        let dim = rows[0].len();
        for row in &rows {
            if row.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: row.len(),
                });
            }
        }
        Ok(Self {
            points: rows.into_iter().map(Point::new).collect(),
            dim,
        })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the store holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimensionality of every point in the store.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The point with the given id, if present.
    pub fn point(&self, id: usize) -> Option<&Point> {
        self.points.get(id)
    }

    /// All points, indexed by id.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Current assignment of every point.
    pub fn assignments(&self) -> Vec<Option<usize>> {
        self.points.iter().map(|p| p.cluster).collect()
    }

    /// Cluster labels for every point; errors if any point is unassigned.
    pub fn labels(&self) -> Result<Vec<usize>> {
        self.points
            .iter()
            .enumerate()
            .map(|(id, p)| {
                p.cluster
                    .ok_or_else(|| Error::Other(format!("point {id} has no cluster assignment")))
            })
            .collect()
    }

    /// Clear all assignments and cached distances.
    pub fn reset_assignments(&mut self) {
        for p in &mut self.points {
            p.reset();
        }
    }

    /// Deep copy with assignments reset; the private working state of one
    /// clusterer invocation.
    pub(crate) fn working_copy(&self) -> PointStore {
        let mut copy = self.clone();
        copy.reset_assignments();
        copy
    }

    pub(crate) fn point_mut(&mut self, id: usize) -> &mut Point {
        &mut self.points[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_empty() {
        assert!(matches!(
            PointStore::from_rows(vec![]),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![0.0, 1.0], vec![2.0]];
        assert!(matches!(
            PointStore::from_rows(rows),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_fresh_points_are_unassigned() {
        let store = PointStore::from_rows(vec![vec![0.0], vec![1.0]]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.dim(), 1);
        for p in store.points() {
            assert_eq!(p.cluster(), None);
            assert!(p.dist_sq().is_infinite());
        }
        assert!(store.labels().is_err());
    }

    #[test]
    fn test_working_copy_is_independent() {
        let mut store = PointStore::from_rows(vec![vec![0.0], vec![1.0]]).unwrap();
        store.point_mut(0).assign(7, 0.25);

        let copy = store.working_copy();
        assert_eq!(copy.point(0).unwrap().cluster(), None);
        assert_eq!(store.point(0).unwrap().cluster(), Some(7));
    }

    #[test]
    fn test_squared_euclidean() {
        assert_eq!(squared_euclidean(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_euclidean(&[1.0], &[1.0]), 0.0);
    }
}
