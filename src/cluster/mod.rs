//! Clustering algorithms for grouping points.
//!
//! Two families are implemented, sharing the [`Clustering`] trait and the
//! [`PointStore`](crate::store::PointStore) data model.
//!
//! ## K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance
//!
//! **When to use**: Fast initial exploration, or when you need hard
//! assignments and can accept the spherical assumption. Seeding is either
//! plain random or k-means++ farthest-first; see [`Seeding`].
//!
//! ## Hierarchical (Agglomerative) Clustering
//!
//! Bottom-up: start with each point as its own cluster, repeatedly merge the
//! two closest clusters until the requested count remains. Built on a
//! union-find structure and a lazy-deletion priority queue over the complete
//! pairwise edge graph.
//!
//! **Linkage methods** determine "distance between clusters":
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single | min(pairwise) | Chaining; elongated clusters |
//! | Complete | max(pairwise) | Compact, spherical clusters |
//! | Average | mean(pairwise) | Balanced compromise |
//!
//! **When to use**: When cluster shape matters more than speed, or when the
//! merge history itself is of interest.
//!
//! ## Usage
//!
//! ```rust
//! use agglo::cluster::{Clustering, HierarchicalClustering, Kmeans, Linkage};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! // K-means with a fixed seed.
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! // Agglomerative with single linkage.
//! let labels = HierarchicalClustering::new(2)
//!     .with_linkage(Linkage::Single)
//!     .fit_predict(&data)
//!     .unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

mod kmeans;
mod linkage;
mod traits;
mod union_find;

pub use kmeans::{Kmeans, KmeansFit, Seeding};
pub use linkage::{HierarchicalClustering, Linkage, LinkageFit, MergeStep};
pub use traits::Clustering;
pub use union_find::UnionFind;
