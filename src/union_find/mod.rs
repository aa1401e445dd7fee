//! Disjoint-set forest with union by rank and path compression.
//!
//! The parent-pointer tree is stored as a `Vec<Cell<Slot>>` so that `find`
//! (with path compression) can update parent pointers even on an immutable
//! reference. Compression never changes the partition, only the tree shape.

use std::cell::Cell;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Slot {
    Root { rank: u32 },
    Child(usize),
}

#[derive(Debug, Clone)]
pub struct UnionFind {
    slots: Vec<Cell<Slot>>,
    sets: usize,
}

impl UnionFind {
    /// Creates `len` singleton sets, one per element `0..len`.
    pub fn new(len: usize) -> Self {
        UnionFind {
            slots: (0..len).map(|_| Cell::new(Slot::Root { rank: 0 })).collect(),
            sets: len,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of disjoint sets currently tracked.
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Finds the representative of the set containing `x`, compressing the
    /// path behind it. Union by rank keeps the tree height logarithmic, so
    /// the recursion is shallow.
    pub fn find(&self, x: usize) -> usize {
        match self.slots[x].get() {
            Slot::Root { .. } => x,
            Slot::Child(parent) => {
                let root = self.find(parent);
                self.slots[x].set(Slot::Child(root));
                root
            }
        }
    }

    /// Merges the sets containing `a` and `b` by rank. Returns `false` if
    /// they were already the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        let rank_a = match self.slots[root_a].get() {
            Slot::Root { rank } => rank,
            Slot::Child(_) => unreachable!("find() always returns a root"),
        };
        let rank_b = match self.slots[root_b].get() {
            Slot::Root { rank } => rank,
            Slot::Child(_) => unreachable!("find() always returns a root"),
        };

        // Lower rank loses; on a tie the first argument's root wins, so the
        // outcome is deterministic for a fixed call sequence.
        let (winner, loser) = if rank_a < rank_b {
            (root_b, root_a)
        } else {
            (root_a, root_b)
        };
        if rank_a == rank_b {
            self.slots[winner].set(Slot::Root { rank: rank_a + 1 });
        }
        self.slots[loser].set(Slot::Child(winner));
        self.sets -= 1;
        true
    }

    /// Whether `a` and `b` are in the same set.
    pub fn connected(&self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// The current partition as element lists, every element appearing in
    /// exactly one list. Lists and their contents are ordered by first
    /// appearance, so the result is stable for a fixed union history.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut position: Vec<Option<usize>> = vec![None; self.slots.len()];
        let mut out: Vec<Vec<usize>> = Vec::with_capacity(self.sets);
        for x in 0..self.slots.len() {
            let root = self.find(x);
            match position[root] {
                Some(slot) => out[slot].push(x),
                None => {
                    position[root] = Some(out.len());
                    out.push(vec![x]);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn singletons_at_start() {
        let uf = UnionFind::new(4);
        assert_eq!(uf.set_count(), 4);
        for i in 0..4 {
            assert_eq!(uf.find(i), i);
        }
    }

    #[test]
    fn union_merges_and_connected_agrees() {
        let mut uf = UnionFind::new(5);
        assert!(uf.union(0, 1));
        assert!(uf.union(3, 4));
        assert!(!uf.union(1, 0));
        assert!(uf.connected(0, 1));
        assert!(!uf.connected(1, 3));
        assert_eq!(uf.set_count(), 3);
    }

    #[test]
    fn path_compression_points_chains_at_the_root() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1);
        uf.union(1, 2);
        uf.union(2, 3);
        let root = uf.find(3);
        for i in 0..4 {
            assert_eq!(uf.find(i), root);
        }
    }

    #[test]
    fn components_partition_every_element_once() {
        let mut uf = UnionFind::new(6);
        uf.union(0, 2);
        uf.union(2, 4);
        uf.union(1, 5);
        let comps = uf.components();
        assert_eq!(comps.len(), 3);
        let mut seen: Vec<usize> = comps.iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn components_are_stable_within_a_call() {
        let mut uf = UnionFind::new(4);
        uf.union(3, 1);
        let a = uf.components();
        let b = uf.components();
        assert_eq!(a, b);
    }
}
