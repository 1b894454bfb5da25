//! Great-circle radius queries backed by an R-tree over unit-sphere positions.
//!
//! Two points are within angular distance θ exactly when their unit vectors
//! are within chord length `2·sin(θ/2)`, so a Euclidean R-tree answers the
//! haversine radius query without false positives or misses.

use rstar::{RTree, primitives::GeomWithData};

use crate::geo::{Coordinate, chord_for_radius_km};

type IndexedPosition = GeomWithData<[f64; 3], usize>;

pub(super) struct SphereIndex {
    tree: RTree<IndexedPosition>,
    positions: Vec<[f64; 3]>,
}

impl SphereIndex {
    pub(super) fn build(coordinates: impl IntoIterator<Item = Coordinate>) -> Self {
        let positions: Vec<[f64; 3]> = coordinates
            .into_iter()
            .map(Coordinate::unit_vector)
            .collect();
        let entries = positions
            .iter()
            .enumerate()
            .map(|(index, position)| GeomWithData::new(*position, index))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
            positions,
        }
    }

    /// Calls `visit(i, j)` once for every unordered pair `i < j` whose
    /// great-circle distance is at most `radius_km`.
    pub(super) fn for_each_pair_within(&self, radius_km: f64, mut visit: impl FnMut(usize, usize)) {
        let chord = chord_for_radius_km(radius_km);
        let max_squared = chord * chord;
        for (index, position) in self.positions.iter().enumerate() {
            for neighbour in self.tree.locate_within_distance(*position, max_squared) {
                if index < neighbour.data {
                    visit(index, neighbour.data);
                }
            }
        }
    }
}
