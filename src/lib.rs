//! # agglo
//!
//! Centroid and linkage clustering for dense vectors.
//!
//! Two algorithm families over one shared data model:
//! - k-means (Lloyd iterations with plain-random or k-means++ seeding)
//! - agglomerative hierarchical clustering (single/complete/average linkage)
//!   driven by a union-find structure and a lazy-deletion priority queue
//!
//! plus quality metrics (silhouette score, pairwise Hamming distance against
//! a ground truth) and an elbow-method cost sweep for choosing k.
//!
//! The primary public API is under [`cluster`]; metrics live in [`metrics`]
//! and the sweep in [`elbow`]. Data enters through
//! [`PointStore::from_rows`](store::PointStore::from_rows); every fit works
//! on a private snapshot, so one store can feed several algorithms.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod elbow;
pub mod error;
pub mod metrics;
pub mod store;

pub use cluster::{
    Clustering, HierarchicalClustering, Kmeans, KmeansFit, Linkage, LinkageFit, MergeStep,
    Seeding, UnionFind,
};
pub use elbow::{ElbowPoint, ElbowSearch};
pub use error::{Error, Result};
pub use metrics::{hamming_distance, silhouette_by_cluster, silhouette_score};
pub use store::{Point, PointStore};
