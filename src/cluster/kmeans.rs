//! K-means clustering.
//!
//! Partitions data into k clusters by minimizing **within-cluster sum of squares**
//! (WCSS). The foundational clustering algorithm, dating to 1957 (Lloyd).
//!
//! # The Objective
//!
//! K-means minimizes:
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! Sum of squared distances from each point to its cluster centroid.
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids (randomly or via k-means++ style farthest-first)
//! 2. **Assign**: Each point → nearest centroid
//! 3. **Update**: Each centroid → mean of assigned points
//! 4. Repeat until no assignment changes
//!
//! **Why it converges**: WCSS decreases monotonically. Each step either
//! decreases WCSS or leaves it unchanged. Bounded below by 0 → must converge.
//! A safety iteration bound still applies; hitting it is reported on the fit
//! instead of looping forever.
//!
//! # Failure Modes
//!
//! - **Local optima**: NP-hard problem; Lloyd finds local minimum only
//! - **Wrong k**: Must specify k in advance; use the elbow sweep or silhouette
//! - **Non-spherical clusters**: Assumes roughly spherical, equal-sized clusters
//! - **Initialization sensitivity**: Bad initial centroids → bad results
//!
//! ## Seeding
//!
//! [`Seeding::Random`] draws k independent uniform point indices (duplicates
//! allowed — random-restart semantics). [`Seeding::PlusPlus`] picks the first
//! centroid uniformly at random, then repeatedly takes the point farthest
//! from its nearest chosen centroid. This is the deterministic farthest-first
//! variant of k-means++: given the first draw, every later seed is a pure
//! argmax, not a weighted sample.

use ndarray::Array2;
use rand::prelude::*;
use tracing::{debug, warn};

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::store::PointStore;

/// Centroid seeding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeding {
    /// k independent uniform draws of point indices; duplicates permitted.
    Random,
    /// First centroid uniform, then farthest-first (k-means++ variant).
    PlusPlus,
}

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Seeding strategy.
    seeding: Seeding,
    /// Maximum refinement rounds.
    max_iter: usize,
    /// Random seed.
    seed: Option<u64>,
}

impl Kmeans {
    /// Create a new K-means clusterer with k-means++ seeding.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seeding: Seeding::PlusPlus,
            max_iter: 100,
            seed: None,
        }
    }

    /// Set the seeding strategy.
    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    /// Set the safety bound on refinement rounds.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run Lloyd's algorithm against a snapshot of `store`.
    ///
    /// The caller's store is never mutated; the returned fit owns a copy
    /// whose points carry their final assignment and cached squared distance.
    pub fn fit(&self, store: &PointStore) -> Result<KmeansFit> {
        let n = store.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }

        let d = store.dim();
        let mut flat: Vec<f64> = Vec::with_capacity(n * d);
        for p in store.points() {
            flat.extend_from_slice(p.dims());
        }
        let data = Array2::from_shape_vec((n, d), flat).map_err(|e| Error::Other(e.to_string()))?;

        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut centroids = self.init_centroids(&data, &mut rng);
        let mut work = store.working_copy();
        let mut converged = false;
        let mut iterations = 0;

        for iter in 0..self.max_iter {
            iterations = iter + 1;

            // Assignment step. A point is touched only when its minimum
            // distance differs from the cached one; a round with no touches
            // is the convergence signal.
            let mut changed = false;
            for i in 0..n {
                let point = data.row(i);
                let mut best_cluster = 0;
                let mut best_dist = f64::MAX;
                for c in 0..self.k {
                    let dist = Self::squared_distance(&point, &centroids.row(c));
                    if dist < best_dist {
                        best_dist = dist;
                        best_cluster = c;
                    }
                }
                if best_dist != work.point(i).map(|p| p.dist_sq()).unwrap_or(f64::INFINITY) {
                    work.point_mut(i).assign(best_cluster, best_dist);
                    changed = true;
                }
            }
            if !changed {
                converged = true;
                break;
            }

            // Update step.
            let mut new_centroids = Array2::zeros((self.k, d));
            let mut counts = vec![0usize; self.k];
            for (i, p) in work.points().iter().enumerate() {
                let c = p.cluster().unwrap_or(0);
                for j in 0..d {
                    new_centroids[[c, j]] += data[[i, j]];
                }
                counts[c] += 1;
            }
            for c in 0..self.k {
                if counts[c] > 0 {
                    for j in 0..d {
                        new_centroids[[c, j]] /= counts[c] as f64;
                    }
                } else {
                    // Empty cluster: reseed from a uniformly drawn point.
                    let idx = rng.random_range(0..n);
                    debug!(cluster = c, reseeded_from = idx, "empty cluster reseeded");
                    new_centroids.row_mut(c).assign(&data.row(idx));
                }
            }
            centroids = new_centroids;
        }

        if !converged {
            warn!(
                k = self.k,
                max_iter = self.max_iter,
                "k-means hit the iteration bound without converging"
            );
        }

        let labels: Vec<usize> = work
            .points()
            .iter()
            .map(|p| p.cluster().unwrap_or(0))
            .collect();

        Ok(KmeansFit {
            store: work,
            centroids,
            labels,
            iterations,
            converged,
        })
    }

    /// Initialize centroids according to the configured seeding strategy.
    fn init_centroids(&self, data: &Array2<f64>, rng: &mut impl Rng) -> Array2<f64> {
        let n = data.nrows();
        let d = data.ncols();
        let mut centroids = Array2::zeros((self.k, d));

        match self.seeding {
            Seeding::Random => {
                for c in 0..self.k {
                    let idx = rng.random_range(0..n);
                    centroids.row_mut(c).assign(&data.row(idx));
                }
            }
            Seeding::PlusPlus => {
                // First centroid: random point.
                let first = rng.random_range(0..n);
                centroids.row_mut(0).assign(&data.row(first));

                // Remaining centroids: farthest-first selection.
                for i in 1..self.k {
                    let mut selected = 0;
                    let mut max_dist = f64::MIN;
                    for j in 0..n {
                        let point = data.row(j);
                        let min_dist = (0..i)
                            .map(|c| Self::squared_distance(&point, &centroids.row(c)))
                            .fold(f64::MAX, f64::min);
                        if min_dist > max_dist {
                            max_dist = min_dist;
                            selected = j;
                        }
                    }
                    if max_dist == 0.0 {
                        // Every point sits on a chosen centroid; fall back
                        // to a uniform draw.
                        selected = rng.random_range(0..n);
                    }
                    centroids.row_mut(i).assign(&data.row(selected));
                }
            }
        }

        centroids
    }

    /// Compute squared Euclidean distance.
    fn squared_distance(a: &ndarray::ArrayView1<'_, f64>, b: &ndarray::ArrayView1<'_, f64>) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
    }
}

/// Result of a [`Kmeans::fit`] run.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    store: PointStore,
    centroids: Array2<f64>,
    labels: Vec<usize>,
    iterations: usize,
    converged: bool,
}

impl KmeansFit {
    /// The fitted point store: assignments plus cached squared distances.
    pub fn store(&self) -> &PointStore {
        &self.store
    }

    /// Consume the fit, returning the fitted store.
    pub fn into_store(self) -> PointStore {
        self.store
    }

    /// Cluster label per point, in `0..k`.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Final centroid matrix (k × d).
    pub fn centroids(&self) -> &Array2<f64> {
        &self.centroids
    }

    /// Number of refinement rounds executed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the assignment step stabilized within the iteration bound.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Mean over all points of the squared distance to the assigned centroid.
    pub fn aggregate_cost(&self) -> f64 {
        let n = self.store.len();
        if n == 0 {
            return 0.0;
        }
        let total: f64 = self
            .store
            .points()
            .iter()
            .zip(&self.labels)
            .map(|(p, &c)| {
                let centroid = self.centroids.row(c);
                p.dims()
                    .iter()
                    .zip(centroid.iter())
                    .map(|(x, y)| (x - y).powi(2))
                    .sum::<f64>()
            })
            .sum();
        total / n as f64
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        let store = PointStore::from_rows(data.to_vec())?;
        Ok(self.fit(&store)?.labels().to_vec())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
            vec![11.0, 10.0],
        ]
    }

    #[test]
    fn test_kmeans_basic() {
        let data = two_blobs();
        let kmeans = Kmeans::new(2).with_seed(42);
        let labels = kmeans.fit_predict(&data).unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_kmeans_all_points_assigned() {
        let data: Vec<Vec<f64>> = (0..50)
            .map(|i| vec![i as f64 * 0.1, (i % 5) as f64])
            .collect();

        let kmeans = Kmeans::new(5).with_seed(123);
        let labels = kmeans.fit_predict(&data).unwrap();

        assert_eq!(labels.len(), data.len());
        for &label in &labels {
            assert!(label < 5, "label {} out of range", label);
        }
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let data = two_blobs();

        let labels1 = Kmeans::new(2).with_seed(7).fit_predict(&data).unwrap();
        let labels2 = Kmeans::new(2).with_seed(7).fit_predict(&data).unwrap();

        assert_eq!(labels1, labels2, "same seed should give same result");
    }

    #[test]
    fn test_kmeans_cost_non_increasing_across_rounds() {
        let data = two_blobs();
        let store = PointStore::from_rows(data).unwrap();

        let mut previous = f64::MAX;
        for max_iter in 1..=6 {
            let fit = Kmeans::new(2)
                .with_seed(11)
                .with_max_iter(max_iter)
                .fit(&store)
                .unwrap();
            let cost = fit.aggregate_cost();
            assert!(
                cost <= previous + 1e-12,
                "cost rose from {previous} to {cost} at round {max_iter}"
            );
            previous = cost;
        }
    }

    #[test]
    fn test_kmeans_fit_caches_distances() {
        let store = PointStore::from_rows(two_blobs()).unwrap();
        let fit = Kmeans::new(2).with_seed(42).fit(&store).unwrap();

        assert!(fit.converged());
        for p in fit.store().points() {
            assert!(p.cluster().is_some());
            assert!(p.dist_sq().is_finite());
        }
        // Caller's store untouched.
        assert!(store.points().iter().all(|p| p.cluster().is_none()));
    }

    #[test]
    fn test_kmeans_plain_seeding_runs() {
        let data = two_blobs();
        let kmeans = Kmeans::new(2).with_seeding(Seeding::Random).with_seed(5);
        let labels = kmeans.fit_predict(&data).unwrap();
        assert_eq!(labels.len(), 6);
        for &l in &labels {
            assert!(l < 2);
        }
    }

    #[test]
    fn test_kmeans_k_equals_n() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];

        let kmeans = Kmeans::new(3).with_seed(42);
        let labels = kmeans.fit_predict(&data).unwrap();

        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_kmeans_empty_input_error() {
        let data: Vec<Vec<f64>> = vec![];
        let result = Kmeans::new(2).fit_predict(&data);
        assert!(result.is_err());
    }

    #[test]
    fn test_kmeans_k_larger_than_n_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let result = Kmeans::new(5).fit_predict(&data);
        assert!(matches!(
            result,
            Err(Error::InvalidClusterCount {
                requested: 5,
                n_items: 2
            })
        ));
    }

    #[test]
    fn test_kmeans_zero_k_error() {
        let data = vec![vec![0.0], vec![1.0]];
        assert!(Kmeans::new(0).fit_predict(&data).is_err());
    }
}
