//! Union-find (disjoint sets) over registered point identifiers.
//!
//! Foundation for agglomerative linkage: every point starts as its own set
//! and each merge is a `union`. Path compression plus union-by-rank gives
//! near-constant amortized `find`.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Union-find over explicitly registered ids.
///
/// Ids must be registered with [`make_set`](UnionFind::make_set) before use;
/// operations on unregistered ids are programming errors and are reported as
/// [`Error::UnknownId`] rather than silently creating singletons.
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    parent: HashMap<usize, usize>,
    rank: HashMap<usize, u32>,
    live: usize,
}

impl UnionFind {
    /// Create an empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` as a new singleton set.
    ///
    /// Registering the same id twice returns [`Error::DuplicateId`].
    pub fn make_set(&mut self, id: usize) -> Result<()> {
        if self.parent.contains_key(&id) {
            return Err(Error::DuplicateId { id });
        }
        self.parent.insert(id, id);
        self.rank.insert(id, 0);
        self.live += 1;
        Ok(())
    }

    /// Root of `id`'s set, compressing every node visited on the way.
    pub fn find(&mut self, id: usize) -> Result<usize> {
        let mut root = *self.parent.get(&id).ok_or(Error::UnknownId { id })?;
        while self.parent[&root] != root {
            root = self.parent[&root];
        }
        // Second pass: re-point the whole chain at the root.
        let mut cur = id;
        while cur != root {
            let next = self.parent[&cur];
            self.parent.insert(cur, root);
            cur = next;
        }
        Ok(root)
    }

    /// Merge the sets containing `a` and `b`.
    ///
    /// Returns `false` (and changes nothing) when they are already in the
    /// same set. The lower-rank root is attached under the higher-rank one;
    /// on a rank tie `a`'s root goes under `b`'s root and `b`'s rank grows.
    pub fn union(&mut self, a: usize, b: usize) -> Result<bool> {
        let root_a = self.find(a)?;
        let root_b = self.find(b)?;
        if root_a == root_b {
            return Ok(false);
        }
        self.live -= 1;
        let rank_a = self.rank[&root_a];
        let rank_b = self.rank[&root_b];
        if rank_a > rank_b {
            self.parent.insert(root_b, root_a);
        } else {
            self.parent.insert(root_a, root_b);
            if rank_a == rank_b {
                self.rank.insert(root_b, rank_b + 1);
            }
        }
        Ok(true)
    }

    /// Number of live (distinct) sets.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no ids are registered.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether `id` has been registered.
    pub fn contains(&self, id: usize) -> bool {
        self.parent.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ids(n: usize) -> UnionFind {
        let mut sets = UnionFind::new();
        for id in 0..n {
            sets.make_set(id).unwrap();
        }
        sets
    }

    #[test]
    fn test_make_set_rejects_duplicates() {
        let mut sets = UnionFind::new();
        sets.make_set(3).unwrap();
        assert!(matches!(sets.make_set(3), Err(Error::DuplicateId { id: 3 })));
        assert_eq!(sets.len(), 1);
    }

    #[test]
    fn test_find_rejects_unregistered() {
        let mut sets = with_ids(2);
        assert!(matches!(sets.find(9), Err(Error::UnknownId { id: 9 })));
        assert!(matches!(sets.union(0, 9), Err(Error::UnknownId { id: 9 })));
    }

    #[test]
    fn test_union_connects_and_counts() {
        let mut sets = with_ids(4);
        assert_eq!(sets.len(), 4);

        assert!(sets.union(0, 1).unwrap());
        assert!(sets.union(2, 3).unwrap());
        assert_eq!(sets.len(), 2);
        assert_eq!(sets.find(0).unwrap(), sets.find(1).unwrap());
        assert_ne!(sets.find(0).unwrap(), sets.find(2).unwrap());

        assert!(sets.union(1, 2).unwrap());
        assert_eq!(sets.len(), 1);
        assert_eq!(sets.find(0).unwrap(), sets.find(3).unwrap());
    }

    #[test]
    fn test_union_same_set_is_noop() {
        let mut sets = with_ids(2);
        sets.union(0, 1).unwrap();
        assert!(!sets.union(0, 1).unwrap());
        assert_eq!(sets.len(), 1);
    }

    #[test]
    fn test_rank_tie_favors_b() {
        let mut sets = with_ids(2);
        // Equal ranks: a's root is attached under b's root.
        sets.union(0, 1).unwrap();
        assert_eq!(sets.find(0).unwrap(), 1);
        assert_eq!(sets.find(1).unwrap(), 1);

        // {0,1} now has rank 1; singleton 2 goes under it regardless of order.
        sets.make_set(2).unwrap();
        sets.union(2, 0).unwrap();
        assert_eq!(sets.find(2).unwrap(), 1);
    }

    #[test]
    fn test_find_idempotent_after_compression() {
        let mut sets = with_ids(8);
        for id in 1..8 {
            sets.union(id - 1, id).unwrap();
        }
        let root = sets.find(0).unwrap();
        for id in 0..8 {
            assert_eq!(sets.find(id).unwrap(), root);
            assert_eq!(sets.find(id).unwrap(), root);
        }
        assert_eq!(sets.len(), 1);
    }
}
