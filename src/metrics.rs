//! Clustering evaluation metrics.
//!
//! Measures for assessing clustering quality: internal cohesion/separation
//! via the silhouette score, and agreement with a ground-truth labeling via
//! the pairwise Hamming distance.
//!
//! | Metric | Range | Best | Properties |
//! |--------|-------|------|------------|
//! | [`silhouette_score`] | [-1, 1] | 1 | Internal; no ground truth needed |
//! | [`hamming_distance`] | [0, 1] | 0 | Pairwise; invariant to label permutation |
//!
//! Both operate on the output of either clusterer: the silhouette reads a
//! fitted [`PointStore`], the Hamming distance compares two label vectors.
//!
//! # Example
//!
//! ```rust
//! use agglo::{hamming_distance, Kmeans, PointStore};
//! use agglo::metrics::silhouette_score;
//!
//! let rows = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![10.0, 10.0],
//!     vec![10.0, 11.0],
//! ];
//! let store = PointStore::from_rows(rows).unwrap();
//! let fit = Kmeans::new(2).with_seed(42).fit(&store).unwrap();
//!
//! let score = silhouette_score(fit.store()).unwrap();
//! assert!(score > 0.8);
//!
//! let truth = [0, 0, 1, 1];
//! let distance = hamming_distance(&truth, fit.labels()).unwrap();
//! assert_eq!(distance, 0.0);
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::store::{squared_euclidean, PointStore};

/// Per-cluster running state for the silhouette computation.
#[derive(Debug, Clone, Copy)]
struct ClusterStat {
    in_cluster_avg: f64,
    out_cluster_min_avg: f64,
}

/// Silhouette score per cluster, keyed by the cluster's label in the store.
///
/// For each cluster: the in-cluster average is the mean squared distance of
/// its members to the cluster's centroid; the out-cluster minimum is the
/// smallest mean squared distance from any member to the points of another
/// cluster. The score is `(out − in) / max(out, in)`, defined as 0 when both
/// terms are 0 (duplicate points) so no NaN can escape.
///
/// Requires at least two clusters.
pub fn silhouette_by_cluster(store: &PointStore) -> Result<Vec<(usize, f64)>> {
    if store.is_empty() {
        return Err(Error::EmptyInput);
    }
    let labels = store.labels()?;

    let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (id, &label) in labels.iter().enumerate() {
        members.entry(label).or_default().push(id);
    }
    if members.len() < 2 {
        return Err(Error::InvalidParameter {
            name: "clusters",
            message: "silhouette requires at least 2 clusters",
        });
    }

    // Center of mass per cluster.
    let dim = store.dim();
    let mut centroids: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for (&label, ids) in &members {
        let mut centroid = vec![0.0; dim];
        for &id in ids {
            for (j, v) in store.points()[id].dims().iter().enumerate() {
                centroid[j] += v;
            }
        }
        for v in &mut centroid {
            *v /= ids.len() as f64;
        }
        centroids.insert(label, centroid);
    }

    let mut scores = Vec::with_capacity(members.len());
    for (&label, ids) in &members {
        let mut stat = ClusterStat {
            in_cluster_avg: 0.0,
            out_cluster_min_avg: f64::MAX,
        };
        let centroid = &centroids[&label];

        for &id in ids {
            let dims = store.points()[id].dims();
            stat.in_cluster_avg += squared_euclidean(dims, centroid);

            for (&other, other_ids) in &members {
                if other == label {
                    continue;
                }
                let total: f64 = other_ids
                    .iter()
                    .map(|&q| squared_euclidean(dims, store.points()[q].dims()))
                    .sum();
                let avg = total / other_ids.len() as f64;
                if avg < stat.out_cluster_min_avg {
                    stat.out_cluster_min_avg = avg;
                }
            }
        }
        stat.in_cluster_avg /= ids.len() as f64;

        let denom = stat.out_cluster_min_avg.max(stat.in_cluster_avg);
        let score = if denom == 0.0 {
            0.0
        } else {
            (stat.out_cluster_min_avg - stat.in_cluster_avg) / denom
        };
        debug!(cluster = label, score, "silhouette");
        scores.push((label, score));
    }
    Ok(scores)
}

/// Mean silhouette score across clusters.
///
/// See [`silhouette_by_cluster`] for the per-cluster definition and the
/// degenerate-input rules.
pub fn silhouette_score(store: &PointStore) -> Result<f64> {
    let scores = silhouette_by_cluster(store)?;
    Ok(scores.iter().map(|(_, s)| s).sum::<f64>() / scores.len() as f64)
}

/// Pairwise Hamming distance between two labelings.
///
/// Over all unordered point pairs, the fraction whose co-cluster relation
/// disagrees: co-clustered in one labeling but not in the other. Cluster ids
/// themselves never matter, only the partitions they induce, so two
/// labelings that differ by a label permutation have distance 0.
///
/// Labelings with fewer than two points induce no pairs; the distance is
/// defined as 0.
///
/// # Example
///
/// ```rust
/// use agglo::metrics::hamming_distance;
///
/// let truth = [0, 0, 1, 1];
/// assert_eq!(hamming_distance(&truth, &[5, 5, 2, 2]).unwrap(), 0.0);
///
/// // Pairs (0,1) and (2,3) are split apart: 2 of 6 pairs disagree.
/// let split = [0, 1, 2, 3];
/// let d = hamming_distance(&truth, &split).unwrap();
/// assert!((d - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn hamming_distance(truth: &[usize], result: &[usize]) -> Result<f64> {
    if truth.len() != result.len() {
        return Err(Error::DimensionMismatch {
            expected: truth.len(),
            found: result.len(),
        });
    }
    let n = truth.len();
    if n < 2 {
        return Ok(0.0);
    }

    let mut missed = 0usize;
    let mut total = 0usize;
    for a in 0..n {
        for b in (a + 1)..n {
            let together_truth = truth[a] == truth[b];
            let together_result = result[a] == result[b];
            if together_truth != together_result {
                missed += 1;
            }
            total += 1;
        }
    }
    Ok(missed as f64 / total as f64)
}
