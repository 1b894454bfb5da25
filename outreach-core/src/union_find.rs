//! Union-find (disjoint set union) shared by the spatial clusterer and the
//! Kruskal step of the graph augmenter.
//!
//! Parents and ranks live in two parallel arenas indexed by node id, so the
//! structure never allocates per node after construction. `find` compresses
//! paths and `union` attaches the shallower tree under the deeper one.
//! Indices at or beyond [`DisjointSet::len`] are a caller bug and panic.

/// Arena-indexed disjoint set with path compression and union by rank.
///
/// # Examples
/// ```
/// use outreach_core::DisjointSet;
///
/// let mut set = DisjointSet::new(4);
/// assert!(set.union(0, 1));
/// assert!(!set.union(1, 0));
/// assert_eq!(set.find(1), set.find(0));
/// assert_eq!(set.component_count(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    components: usize,
}

impl DisjointSet {
    /// Creates `n` singleton sets.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            components: n,
        }
    }

    /// Number of elements tracked by the structure.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.parent.len() }

    /// Returns `true` when the structure tracks no elements.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.parent.is_empty() }

    /// Number of disjoint sets remaining.
    #[must_use]
    #[rustfmt::skip]
    pub fn component_count(&self) -> usize { self.components }

    /// Returns the representative of `node`'s set, compressing the path.
    ///
    /// # Panics
    /// Panics when `node >= self.len()`.
    pub fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Merges the sets containing `left` and `right`.
    ///
    /// Returns `false` when both already share a representative.
    ///
    /// # Panics
    /// Panics when either index is `>= self.len()`.
    pub fn union(&mut self, left: usize, right: usize) -> bool {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return false;
        }
        let left_rank = self.rank[left];
        let right_rank = self.rank[right];
        if left_rank < right_rank {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if left_rank == right_rank {
            self.rank[left] = left_rank.saturating_add(1);
        }
        self.components -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn starts_as_singletons() {
        let mut set = DisjointSet::new(3);
        assert_eq!(set.len(), 3);
        assert_eq!(set.component_count(), 3);
        assert!((0..3).all(|node| set.find(node) == node));
    }

    #[test]
    fn empty_set_has_no_components() {
        let set = DisjointSet::new(0);
        assert!(set.is_empty());
        assert_eq!(set.component_count(), 0);
    }

    #[rstest]
    #[case::chain(&[(0, 1), (1, 2), (2, 3)], 2)]
    #[case::star(&[(0, 1), (0, 2), (0, 3)], 2)]
    #[case::pairs(&[(0, 1), (2, 3)], 3)]
    fn unions_reduce_component_count(#[case] pairs: &[(usize, usize)], #[case] expected: usize) {
        let mut set = DisjointSet::new(5);
        for &(left, right) in pairs {
            assert!(set.union(left, right));
        }
        assert_eq!(set.component_count(), expected);
    }

    #[test]
    fn redundant_union_is_rejected() {
        let mut set = DisjointSet::new(3);
        assert!(set.union(0, 1));
        assert!(set.union(1, 2));
        assert!(!set.union(0, 2));
        assert_eq!(set.component_count(), 1);
    }

    #[test]
    fn find_compresses_paths() {
        let mut set = DisjointSet::new(6);
        for node in 1..6 {
            set.union(node - 1, node);
        }
        let root = set.find(5);
        for node in 0..6 {
            assert_eq!(set.find(node), root);
        }
        assert!(set.parent.iter().all(|&parent| parent == root));
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn out_of_range_index_panics() {
        let mut set = DisjointSet::new(2);
        set.find(2);
    }
}
