//! Hierarchical (agglomerative) clustering.
//!
//! Bottom-up clustering over the complete graph of point pairs: start with
//! each point as its own cluster, repeatedly contract the globally cheapest
//! edge until the requested number of clusters remains.
//!
//! # Linkage Methods
//!
//! The key choice: how do we define "distance between clusters"?
//!
//! | Linkage | Formula | Effect |
//! |---------|---------|--------|
//! | Single | min(d(a,b)) for a∈A, b∈B | Chaining; elongated clusters |
//! | Complete | max(d(a,b)) | Compact, spherical clusters |
//! | Average | mean(d(a,b)) | Balanced compromise |
//!
//! # Engine
//!
//! **Single** linkage never needs to re-derive an edge after a merge: the
//! distance between a merged cluster and any other cluster is the minimum of
//! the two sub-edges, which already sits in sorted order. One full sort up
//! front (cheapest edge popped last, Kruskal style) therefore replaces every
//! reheapify, for O(m + n α(n)) total work after the sort.
//!
//! **Complete/Average** linkage must re-derive edges: merging changes which
//! edge is minimal. The engine keeps an authoritative edge map keyed by live
//! root pairs next to a lazy min-heap. A merge removes the affected edges
//! from the map, combines colliding ones (max for complete; count-weighted
//! mean for average), and reinserts them with a fresh stamp. Heap entries are
//! never mutated in place; a popped entry whose stamp no longer matches the
//! map is stale and is discarded at extraction time. O(m log n) total.
//!
//! Average linkage carries a `merged_count` per edge — the number of original
//! point pairs it stands for — so that combining an already-averaged edge
//! weighs it by its true mass rather than as a single observation.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use super::traits::Clustering;
use super::union_find::UnionFind;
use crate::error::{Error, Result};
use crate::store::{squared_euclidean, PointStore};

/// Linkage method for hierarchical clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage: mean distance between clusters.
    Average,
}

/// Hierarchical (agglomerative) clustering.
#[derive(Debug, Clone)]
pub struct HierarchicalClustering {
    /// Number of clusters to produce.
    n_clusters: usize,
    /// Linkage method.
    linkage: Linkage,
}

/// One contraction step: the edge that was merged and the size of the
/// resulting cluster.
#[derive(Debug, Clone, Copy)]
pub struct MergeStep {
    /// First endpoint of the merged edge (a cluster root at merge time).
    pub a: usize,
    /// Second endpoint of the merged edge.
    pub b: usize,
    /// Squared-distance weight of the merged edge under the linkage rule.
    pub distance: f64,
    /// Size of the resulting cluster.
    pub size: usize,
}

impl HierarchicalClustering {
    /// Create a new hierarchical clusterer with average linkage.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            linkage: Linkage::Average,
        }
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Contract edges over a snapshot of `store` until `n_clusters` remain.
    ///
    /// The caller's store is never mutated; the returned fit owns a copy in
    /// which every point's cluster is its final union-find root.
    pub fn fit(&self, store: &PointStore) -> Result<LinkageFit> {
        let n = store.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        let r = self.n_clusters;
        if r == 0 || r > n {
            return Err(Error::InvalidClusterCount {
                requested: r,
                n_items: n,
            });
        }

        let mut work = store.working_copy();
        let mut sets = UnionFind::new();
        for id in 0..n {
            sets.make_set(id)?;
        }
        let mut sizes: HashMap<usize, usize> = (0..n).map(|id| (id, 1)).collect();
        let mut merges = Vec::with_capacity(n - r);

        match self.linkage {
            Linkage::Single => {
                self.contract_sorted(&work, &mut sets, &mut sizes, &mut merges)?
            }
            Linkage::Complete | Linkage::Average => {
                self.contract_queued(&work, &mut sets, &mut sizes, &mut merges)?
            }
        }

        for id in 0..n {
            let root = sets.find(id)?;
            work.point_mut(id).set_cluster(root);
        }
        let labels = dense_labels(&work)?;

        Ok(LinkageFit {
            store: work,
            merges,
            labels,
        })
    }

    /// Single linkage: one descending sort, cheapest edge popped from the
    /// back. Stale edges (endpoints already co-clustered) are skipped at
    /// extraction; nothing is ever re-derived.
    fn contract_sorted(
        &self,
        store: &PointStore,
        sets: &mut UnionFind,
        sizes: &mut HashMap<usize, usize>,
        merges: &mut Vec<MergeStep>,
    ) -> Result<()> {
        let mut edges = all_pair_edges(store);
        edges.sort_unstable_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then(b.1.cmp(&a.1))
                .then(b.2.cmp(&a.2))
        });

        while sets.len() > self.n_clusters {
            let (dist, u, v) = edges.pop().ok_or(Error::DisconnectedGraph)?;
            let root_u = sets.find(u)?;
            let root_v = sets.find(v)?;
            if root_u == root_v {
                continue;
            }
            sets.union(u, v)?;
            record_merge(sets, sizes, merges, root_u, root_v, dist)?;
        }
        Ok(())
    }

    /// Complete/average linkage: authoritative edge map plus lazy min-heap.
    fn contract_queued(
        &self,
        store: &PointStore,
        sets: &mut UnionFind,
        sizes: &mut HashMap<usize, usize>,
        merges: &mut Vec<MergeStep>,
    ) -> Result<()> {
        let mut edges = EdgeSet::complete(store);

        while sets.len() > self.n_clusters {
            let (root_a, root_b, dist) = edges.pop_min().ok_or(Error::DisconnectedGraph)?;
            // Map keys are maintained as live roots, so a current entry can
            // never connect two co-clustered endpoints.
            debug_assert_ne!(sets.find(root_a)?, sets.find(root_b)?);

            sets.union(root_a, root_b)?;
            let survivor = sets.find(root_a)?;
            let absorbed = if survivor == root_a { root_b } else { root_a };
            record_merge(sets, sizes, merges, root_a, root_b, dist)?;

            edges.contract(survivor, absorbed, self.linkage);
        }
        Ok(())
    }
}

/// Result of a [`HierarchicalClustering::fit`] run.
#[derive(Debug, Clone)]
pub struct LinkageFit {
    store: PointStore,
    merges: Vec<MergeStep>,
    labels: Vec<usize>,
}

impl LinkageFit {
    /// The fitted point store; each point's cluster is its union-find root.
    pub fn store(&self) -> &PointStore {
        &self.store
    }

    /// Consume the fit, returning the fitted store.
    pub fn into_store(self) -> PointStore {
        self.store
    }

    /// Contraction history in merge order.
    pub fn merges(&self) -> &[MergeStep] {
        &self.merges
    }

    /// Cluster label per point, densely renumbered to `0..r`.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }
}

impl Clustering for HierarchicalClustering {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        let store = PointStore::from_rows(data.to_vec())?;
        Ok(self.fit(&store)?.labels().to_vec())
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

fn all_pair_edges(store: &PointStore) -> Vec<(f64, usize, usize)> {
    let n = store.len();
    let mut edges = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let dist = squared_euclidean(store.points()[i].dims(), store.points()[j].dims());
            edges.push((dist, i, j));
        }
    }
    edges
}

fn record_merge(
    sets: &mut UnionFind,
    sizes: &mut HashMap<usize, usize>,
    merges: &mut Vec<MergeStep>,
    a: usize,
    b: usize,
    distance: f64,
) -> Result<()> {
    let merged = sizes.get(&a).copied().unwrap_or(1) + sizes.get(&b).copied().unwrap_or(1);
    let root = sets.find(a)?;
    sizes.insert(root, merged);
    debug!(a, b, distance, size = merged, "merged edge");
    merges.push(MergeStep {
        a,
        b,
        distance,
        size: merged,
    });
    Ok(())
}

/// Labels renumbered to consecutive integers in order of sorted root id.
fn dense_labels(store: &PointStore) -> Result<Vec<usize>> {
    let roots = store.labels()?;
    let mut unique = roots.clone();
    unique.sort_unstable();
    unique.dedup();
    Ok(roots
        .iter()
        .map(|r| unique.binary_search(r).unwrap_or(0))
        .collect())
}

/// Heap entry; compared by distance, then endpoints for a reproducible
/// tie-break.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEdge {
    distance: f64,
    a: usize,
    b: usize,
    stamp: u64,
}

impl Eq for HeapEdge {}

impl Ord for HeapEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.a.cmp(&other.a))
            .then(self.b.cmp(&other.b))
    }
}

impl PartialOrd for HeapEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy)]
struct EdgeData {
    distance: f64,
    merged_count: usize,
    stamp: u64,
}

/// Authoritative inter-cluster edge set with a lazy-deletion min-heap.
///
/// Invariant: for every pair of live roots there is exactly one entry in
/// `edges`, and `adjacency` mirrors its key set. The heap may additionally
/// hold any number of stale entries; staleness is detected by stamp mismatch
/// at pop time.
#[derive(Debug)]
struct EdgeSet {
    edges: HashMap<(usize, usize), EdgeData>,
    adjacency: HashMap<usize, HashSet<usize>>,
    heap: BinaryHeap<Reverse<HeapEdge>>,
    next_stamp: u64,
}

impl EdgeSet {
    /// Complete graph over all point pairs, squared Euclidean weights,
    /// `merged_count = 1`.
    fn complete(store: &PointStore) -> Self {
        let n = store.len();
        let mut set = Self {
            edges: HashMap::with_capacity(n * (n - 1) / 2),
            adjacency: HashMap::with_capacity(n),
            heap: BinaryHeap::with_capacity(n * (n - 1) / 2),
            next_stamp: 0,
        };
        for (dist, i, j) in all_pair_edges(store) {
            set.insert(i, j, dist, 1);
        }
        set
    }

    fn insert(&mut self, a: usize, b: usize, distance: f64, merged_count: usize) {
        let (a, b) = ordered(a, b);
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.edges.insert(
            (a, b),
            EdgeData {
                distance,
                merged_count,
                stamp,
            },
        );
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        self.heap.push(Reverse(HeapEdge {
            distance,
            a,
            b,
            stamp,
        }));
    }

    fn remove(&mut self, a: usize, b: usize) -> Option<EdgeData> {
        let (a, b) = ordered(a, b);
        let data = self.edges.remove(&(a, b))?;
        if let Some(nbrs) = self.adjacency.get_mut(&a) {
            nbrs.remove(&b);
        }
        if let Some(nbrs) = self.adjacency.get_mut(&b) {
            nbrs.remove(&a);
        }
        Some(data)
    }

    /// Pop the cheapest current edge, discarding stale heap entries.
    fn pop_min(&mut self) -> Option<(usize, usize, f64)> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            match self.edges.get(&(entry.a, entry.b)) {
                Some(data) if data.stamp == entry.stamp => {
                    self.remove(entry.a, entry.b);
                    return Some((entry.a, entry.b, entry.distance));
                }
                _ => continue,
            }
        }
        None
    }

    /// Re-home every edge of `absorbed` onto `survivor`, combining each with
    /// the survivor's own edge to the same neighbor under the linkage rule.
    fn contract(&mut self, survivor: usize, absorbed: usize, linkage: Linkage) {
        let neighbors: Vec<usize> = self
            .adjacency
            .remove(&absorbed)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();

        for x in neighbors {
            if x == survivor {
                continue;
            }
            // Both edges exist while the graph is complete over live roots;
            // combine whatever is present.
            let from_absorbed = self.remove(absorbed, x);
            let from_survivor = self.remove(survivor, x);
            let combined = match (from_survivor, from_absorbed) {
                (Some(s), Some(o)) => combine(s, o, linkage),
                (Some(s), None) => (s.distance, s.merged_count),
                (None, Some(o)) => (o.distance, o.merged_count),
                (None, None) => continue,
            };
            self.insert(survivor, x, combined.0, combined.1);
        }
    }
}

fn combine(s: EdgeData, o: EdgeData, linkage: Linkage) -> (f64, usize) {
    let count = s.merged_count + o.merged_count;
    match linkage {
        // Farthest-neighbor rule.
        Linkage::Complete => (s.distance.max(o.distance), count),
        // Count-weighted mean so already-averaged edges keep their mass.
        Linkage::Average => (
            (s.distance * s.merged_count as f64 + o.distance * o.merged_count as f64)
                / count as f64,
            count,
        ),
        // Single linkage never routes through the queued engine.
        Linkage::Single => (s.distance.min(o.distance), count),
    }
}

#[inline]
fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
