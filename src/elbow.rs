//! Elbow-method diagnostic sweep.
//!
//! Runs k-means with k-means++ seeding across a range of cluster counts and
//! records the aggregate clustering cost at each k together with its decline
//! from the previous k. The sweep chooses nothing by itself: the elbow — the
//! k where marginal cost reduction sharply diminishes — is read off the
//! output by a human or a follow-on heuristic.

use tracing::info;

use crate::cluster::{Kmeans, Seeding};
use crate::error::Result;
use crate::store::PointStore;

/// One row of the elbow sweep.
#[derive(Debug, Clone, Copy)]
pub struct ElbowPoint {
    /// Cluster count this row was fitted with.
    pub k: usize,
    /// Aggregate clustering cost at this k.
    pub cost: f64,
    /// Cost decline from the previous k (0 for the first row).
    pub decline: f64,
}

/// Sweep driver over cluster counts.
#[derive(Debug, Clone)]
pub struct ElbowSearch {
    max_k: usize,
    seed: Option<u64>,
}

impl Default for ElbowSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl ElbowSearch {
    /// Sweep k from 1 through 20 (clamped to the dataset size).
    pub fn new() -> Self {
        Self {
            max_k: 20,
            seed: None,
        }
    }

    /// Set the upper end of the sweep.
    pub fn with_max_k(mut self, max_k: usize) -> Self {
        self.max_k = max_k;
        self
    }

    /// Set random seed for reproducibility; each k derives its own seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the sweep against `store`, one k-means++ fit per k.
    pub fn run(&self, store: &PointStore) -> Result<Vec<ElbowPoint>> {
        let top = self.max_k.min(store.len());
        let mut rows = Vec::with_capacity(top);
        let mut previous = 0.0;

        for k in 1..=top {
            let mut kmeans = Kmeans::new(k).with_seeding(Seeding::PlusPlus);
            if let Some(seed) = self.seed {
                kmeans = kmeans.with_seed(seed.wrapping_add(k as u64));
            }
            let fit = kmeans.fit(store)?;
            let cost = fit.aggregate_cost();
            let decline = if k == 1 { 0.0 } else { previous - cost };
            info!(k, cost, decline, "elbow sweep row");
            rows.push(ElbowPoint { k, cost, decline });
            previous = cost;
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob_store() -> PointStore {
        PointStore::from_rows(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
            vec![11.0, 10.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_sweep_clamps_to_dataset_size() {
        let store = blob_store();
        let rows = ElbowSearch::new().with_seed(42).run(&store).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].k, 1);
        assert_eq!(rows[5].k, 6);
    }

    #[test]
    fn test_first_row_has_zero_decline() {
        let store = blob_store();
        let rows = ElbowSearch::new()
            .with_max_k(3)
            .with_seed(1)
            .run(&store)
            .unwrap();
        assert_eq!(rows[0].decline, 0.0);
        for pair in rows.windows(2) {
            assert!(
                (pair[1].decline - (pair[0].cost - pair[1].cost)).abs() < 1e-12,
                "decline must track consecutive costs"
            );
        }
    }

    #[test]
    fn test_elbow_visible_on_two_blobs() {
        // With two tight, far-apart blobs the k=1 → k=2 decline dominates
        // everything after it.
        let store = blob_store();
        let rows = ElbowSearch::new().with_seed(9).run(&store).unwrap();
        let drop_to_two = rows[1].decline;
        for row in &rows[2..] {
            assert!(drop_to_two > row.decline);
        }
        // k = n drives the cost to zero.
        assert!(rows[5].cost.abs() < 1e-12);
    }
}
