// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use molecule::{AtomIndex, Molecule};
use rstar::{primitives::GeomWithData, RTree};
use ultraviolet::Vec3;

type IndexedPoint = GeomWithData<[f32; 3], AtomIndex>;

/// An R*-tree over a snapshot of a molecule's atom coordinates, answering "which atoms lie
/// within `r` of this point" in O(log n + k).
///
/// Coordinates are copied at construction; later edits to the molecule are not seen.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
    tolerance: f32,
}

impl SpatialIndex {
    /// Bulk-loads every atom of `molecule`.  `tolerance` widens each query radius so atoms at
    /// exactly the cutoff distance are reported.
    pub fn new(molecule: &Molecule, tolerance: f32) -> Self {
        let points: Vec<IndexedPoint> = molecule
            .atoms()
            .map(|(index, atom)| {
                let p = atom.position;
                GeomWithData::new([p.x, p.y, p.z], index)
            })
            .collect();
        log::trace!("building spatial index over {} atoms", points.len());
        Self {
            tree: RTree::bulk_load(points),
            tolerance: tolerance.max(0.0),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Indices of all atoms whose distance to `point` is at most `radius` (plus the tolerance),
    /// in no particular order.  A negative radius finds nothing.
    pub fn find_within_radius(&self, point: Vec3, radius: f32) -> Vec<AtomIndex> {
        if radius < 0.0 || radius.is_nan() {
            return Vec::new();
        }
        let cutoff = radius + self.tolerance;
        self.tree
            .locate_within_distance([point.x, point.y, point.z], cutoff * cutoff)
            .map(|entry| entry.data)
            .collect()
    }

    /// Like [`find_within_radius`](Self::find_within_radius), centred on an atom of `molecule`.
    /// The atom itself is part of the result.  Unknown atoms find nothing.
    pub fn find_within_radius_of_atom(
        &self,
        molecule: &Molecule,
        atom: AtomIndex,
        radius: f32,
    ) -> Vec<AtomIndex> {
        match molecule.atom(atom) {
            Some(atom) => self.find_within_radius(atom.position, radius),
            None => Vec::new(),
        }
    }
}


// End of File
