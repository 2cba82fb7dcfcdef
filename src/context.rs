// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use common::BoundingBox;
use molecule::{AtomIndex, Molecule};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::SelectionConfig;
use crate::selection::Selection;
use crate::spatial_index::SpatialIndex;

/// Per-molecule evaluation state for one selection.
///
/// Holds the memoised results that whole-molecule kinds (distance, box and expansion
/// predicates) need.  Caches are keyed by canonical strings, so equivalent subtrees share one
/// entry, and entries are never overwritten once written.  The spatial index is built on the
/// first distance query.
///
/// A context borrows its molecule: editing the molecule requires dropping the context first,
/// which is what keeps the caches valid.
pub struct EvaluationContext<'m> {
    molecule: &'m Molecule,
    selection: Selection,
    config: SelectionConfig,
    spatial_index: Option<SpatialIndex>,
    residue_cache: FxHashMap<String, FxHashSet<AtomIndex>>,
    chain_cache: FxHashMap<String, FxHashSet<AtomIndex>>,
    around_cache: FxHashMap<String, Vec<bool>>,
    box_cache: FxHashMap<String, BoundingBox>,
}

impl<'m> EvaluationContext<'m> {
    pub fn new(molecule: &'m Molecule, selection: Selection) -> Self {
        Self::with_config(molecule, selection, SelectionConfig::default())
    }

    pub fn with_config(molecule: &'m Molecule, selection: Selection, config: SelectionConfig) -> Self {
        Self {
            molecule,
            selection,
            config,
            spatial_index: None,
            residue_cache: FxHashMap::default(),
            chain_cache: FxHashMap::default(),
            around_cache: FxHashMap::default(),
            box_cache: FxHashMap::default(),
        }
    }

    pub fn molecule(&self) -> &'m Molecule {
        self.molecule
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Whether `atom` is selected.
    pub fn matches(&mut self, atom: AtomIndex) -> bool {
        let root = self.selection.root().clone();
        root.evaluate(self, atom)
    }

    pub fn spatial_index(&mut self) -> &SpatialIndex {
        let molecule = self.molecule;
        let tolerance = self.config.distance_epsilon;
        self.spatial_index
            .get_or_insert_with(|| SpatialIndex::new(molecule, tolerance))
    }

    pub fn has_residue_cache(&self, key: &str) -> bool {
        self.residue_cache.contains_key(key)
    }

    pub fn residue_atoms(&self, key: &str) -> Option<&FxHashSet<AtomIndex>> {
        self.residue_cache.get(key)
    }

    pub fn set_residue_atoms(&mut self, key: String, atoms: FxHashSet<AtomIndex>) {
        log::debug!("{key}: {} atoms", atoms.len());
        self.residue_cache.entry(key).or_insert(atoms);
    }

    pub fn has_chain_cache(&self, key: &str) -> bool {
        self.chain_cache.contains_key(key)
    }

    pub fn chain_atoms(&self, key: &str) -> Option<&FxHashSet<AtomIndex>> {
        self.chain_cache.get(key)
    }

    pub fn set_chain_atoms(&mut self, key: String, atoms: FxHashSet<AtomIndex>) {
        log::debug!("{key}: {} atoms", atoms.len());
        self.chain_cache.entry(key).or_insert(atoms);
    }

    pub fn has_around_cache(&self, key: &str) -> bool {
        self.around_cache.contains_key(key)
    }

    pub fn around_cache(&self, key: &str) -> Option<&Vec<bool>> {
        self.around_cache.get(key)
    }

    pub fn set_around_cache(&mut self, key: String, mask: Vec<bool>) {
        log::debug!(
            "{key}: {} of {} atoms in range",
            mask.iter().filter(|&&near| near).count(),
            mask.len()
        );
        self.around_cache.entry(key).or_insert(mask);
    }

    pub fn has_box_cache(&self, key: &str) -> bool {
        self.box_cache.contains_key(key)
    }

    pub fn box_cache(&self, key: &str) -> Option<&BoundingBox> {
        self.box_cache.get(key)
    }

    pub fn set_box_cache(&mut self, key: String, bounds: BoundingBox) {
        log::debug!("{key}: {bounds:?}");
        self.box_cache.entry(key).or_insert(bounds);
    }
}


// End of File
