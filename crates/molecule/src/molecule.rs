// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::OnceLock;

use common::BoundingBox;
use periodic_table::Element;
use petgraph::{graph, unionfind::UnionFind, visit::EdgeRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ultraviolet::Vec3;

use crate::components::{classify_residue, ComponentFlags};

/// A graph representation of a molecule.
/// Atoms are never removed, so a plain (non-stable) graph keeps node indices dense and equal to
/// the 0-based atom index the selection language exposes.  It is undirected because bonds have
/// no direction.  Each node stores an atom, and each edge stores the integer bond order it
/// represents.
pub type MoleculeGraph = graph::UnGraph<Atom, BondOrder>;

/// The order of a bond (i.e. single bond = 1u8, double bond = 2u8, ..). This is a
/// u8 because we currently do not support fractional bonding, and because bonds
/// cannot be negative.
pub type BondOrder = u8;

/// The 0-based position of an atom in its molecule.
pub type AtomIndex = usize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("atom index {0} is out of range")]
    UnknownAtom(AtomIndex),

    #[error("atom {0} cannot be bonded to itself")]
    SelfBond(AtomIndex),
}

/// Secondary structure assignment of a residue.  Residues without an assignment are treated as
/// loop by the selection language.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryStructure {
    Helix,
    Sheet,
    Turn,
}

/// Identifies a residue within a molecule: chain, sequence number, and insertion code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    pub chain: char,
    pub number: i32,
    pub insert_code: char,
}

/// Residue metadata carried by every atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Residue {
    pub name: String,
    pub number: i32,
    pub insert_code: char,
    pub chain: char,
    pub secondary_structure: Option<SecondaryStructure>,
}

impl Default for Residue {
    fn default() -> Self {
        Self {
            name: String::new(),
            number: 0,
            insert_code: ' ',
            chain: ' ',
            secondary_structure: None,
        }
    }
}

impl Residue {
    pub fn new(name: impl Into<String>, number: i32, chain: char) -> Self {
        Self {
            name: name.into(),
            number,
            chain,
            ..Default::default()
        }
    }

    pub fn with_insert_code(mut self, insert_code: char) -> Self {
        self.insert_code = insert_code;
        self
    }

    pub fn with_secondary_structure(mut self, ss: SecondaryStructure) -> Self {
        self.secondary_structure = Some(ss);
        self
    }

    pub fn key(&self) -> ResidueKey {
        ResidueKey {
            chain: self.chain,
            number: self.number,
            insert_code: self.insert_code,
        }
    }
}

/// Stores the data for each atom in a `Molecule`.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub name: String,
    /// `None` for atoms whose element could not be determined (atomic number 0).
    pub element: Option<Element>,
    pub position: Vec3,
    /// The serial number from the source file, matched by the `id` keyword.
    pub serial: i32,
    /// Alternate location indicator, `' '` when absent.
    pub alt_loc: char,
    pub b_factor: f32,
    pub residue: Residue,
}

impl Atom {
    pub fn new(name: impl Into<String>, element: Element, position: Vec3) -> Self {
        Self {
            name: name.into(),
            element: Some(element),
            position,
            serial: 0,
            alt_loc: ' ',
            b_factor: 0.0,
            residue: Residue::default(),
        }
    }

    pub fn with_residue(mut self, residue: Residue) -> Self {
        self.residue = residue;
        self
    }

    pub fn with_serial(mut self, serial: i32) -> Self {
        self.serial = serial;
        self
    }

    pub fn with_alt_loc(mut self, alt_loc: char) -> Self {
        self.alt_loc = alt_loc;
        self
    }

    pub fn with_b_factor(mut self, b_factor: f32) -> Self {
        self.b_factor = b_factor;
        self
    }

    /// 0 for unknown elements.
    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.element.map_or(0, Element::atomic_number)
    }
}

/// A molecule: atoms, bonds, and per-molecule tables derived from them on first use.
///
/// The derived tables (component classification and bonded fragments) are computed at most once
/// and are cleared by any edit, so repeated reads after construction are free.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    title: String,
    graph: MoleculeGraph,
    components: OnceLock<Vec<ComponentFlags>>,
    fragments: OnceLock<Vec<usize>>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn graph(&self) -> &MoleculeGraph {
        &self.graph
    }

    fn invalidate(&mut self) {
        self.components = OnceLock::new();
        self.fragments = OnceLock::new();
    }

    /// Appends an atom and returns its index.
    pub fn add_atom(&mut self, atom: Atom) -> AtomIndex {
        self.invalidate();
        self.graph.add_node(atom).index()
    }

    /// Bonds two atoms.  Bonding an already bonded pair replaces the bond order.
    pub fn add_bond(
        &mut self,
        a: AtomIndex,
        b: AtomIndex,
        order: BondOrder,
    ) -> Result<(), MoleculeError> {
        for index in [a, b] {
            if index >= self.atom_count() {
                return Err(MoleculeError::UnknownAtom(index));
            }
        }
        if a == b {
            return Err(MoleculeError::SelfBond(a));
        }
        self.invalidate();
        self.graph
            .update_edge(graph::NodeIndex::new(a), graph::NodeIndex::new(b), order);
        Ok(())
    }

    pub fn atom(&self, index: AtomIndex) -> Option<&Atom> {
        self.graph.node_weight(graph::NodeIndex::new(index))
    }

    /// Mutable access to an atom.  Clears the derived tables, since the residue may change.
    pub fn atom_mut(&mut self, index: AtomIndex) -> Option<&mut Atom> {
        self.invalidate();
        self.graph.node_weight_mut(graph::NodeIndex::new(index))
    }

    /// All atoms in index order.
    pub fn atoms(&self) -> impl Iterator<Item = (AtomIndex, &Atom)> + '_ {
        self.graph.raw_nodes().iter().map(|node| &node.weight).enumerate()
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Every bond once, as `(a, b, order)` with `a` and `b` in insertion order.
    pub fn bonds(&self) -> impl Iterator<Item = (AtomIndex, AtomIndex, BondOrder)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index(), *edge.weight()))
    }

    /// Atoms bonded to `index`.  Empty for an out-of-range index.
    pub fn neighbors(&self, index: AtomIndex) -> impl Iterator<Item = AtomIndex> + '_ {
        let node = graph::NodeIndex::new(index);
        let valid = index < self.atom_count();
        valid
            .then(|| self.graph.neighbors(node).map(|n| n.index()))
            .into_iter()
            .flatten()
    }

    /// The box spanned by all atom centres.  Empty for an empty molecule.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.atoms().map(|(_, atom)| atom.position))
    }

    /// Classifies every atom's residue (protein, water, ligand, ...).  The pass runs once per
    /// molecule; later calls return the stored result.
    pub fn components(&self) -> &[ComponentFlags] {
        self.components.get_or_init(|| {
            log::trace!("classifying {} atoms of {:?}", self.atom_count(), self.title);
            self.atoms()
                .map(|(_, atom)| classify_residue(&atom.residue.name))
                .collect()
        })
    }

    /// Component flags of one atom; empty for an out-of-range index.
    pub fn component_flags(&self, index: AtomIndex) -> ComponentFlags {
        self.components()
            .get(index)
            .copied()
            .unwrap_or(ComponentFlags::empty())
    }

    /// True if the atom carries any of `flags`.
    pub fn has_component(&self, index: AtomIndex, flags: ComponentFlags) -> bool {
        self.component_flags(index).intersects(flags)
    }

    /// Bonded fragment id of every atom.  Fragments are the connected components of the bond
    /// graph, numbered from 0 in order of their lowest atom index.
    pub fn fragments(&self) -> &[usize] {
        self.fragments.get_or_init(|| {
            let count = self.atom_count();
            let mut sets = UnionFind::<usize>::new(count);
            for (a, b, _) in self.bonds() {
                sets.union(a, b);
            }
            let mut ids = vec![usize::MAX; count];
            let mut numbering = vec![usize::MAX; count];
            let mut next = 0;
            for (atom, id) in ids.iter_mut().enumerate() {
                let root = sets.find(atom);
                if numbering[root] == usize::MAX {
                    numbering[root] = next;
                    next += 1;
                }
                *id = numbering[root];
            }
            ids
        })
    }

    pub fn fragment(&self, index: AtomIndex) -> Option<usize> {
        self.fragments().get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Molecule {
        let residue = Residue::new("HOH", 1, 'W');
        let mut mol = Molecule::with_title("water");
        let o = mol.add_atom(
            Atom::new("O", Element::Oxygen, Vec3::zero()).with_residue(residue.clone()),
        );
        let h1 = mol.add_atom(
            Atom::new("H1", Element::Hydrogen, Vec3::new(0.96, 0.0, 0.0)).with_residue(residue.clone()),
        );
        let h2 = mol.add_atom(
            Atom::new("H2", Element::Hydrogen, Vec3::new(-0.24, 0.93, 0.0)).with_residue(residue),
        );
        mol.add_bond(o, h1, 1).unwrap();
        mol.add_bond(o, h2, 1).unwrap();
        mol
    }

    #[test]
    fn indices_are_dense_and_ordered() {
        let mol = water();
        let names: Vec<_> = mol.atoms().map(|(i, a)| (i, a.name.as_str())).collect();
        assert_eq!(names, vec![(0, "O"), (1, "H1"), (2, "H2")]);
        assert_eq!(mol.bond_count(), 2);
        let mut neighbors: Vec<_> = mol.neighbors(0).collect();
        neighbors.sort();
        assert_eq!(neighbors, vec![1, 2]);
        assert_eq!(mol.neighbors(99).count(), 0);
    }

    #[test]
    fn bad_bonds_are_rejected() {
        let mut mol = water();
        assert_eq!(mol.add_bond(0, 7, 1), Err(MoleculeError::UnknownAtom(7)));
        assert_eq!(mol.add_bond(1, 1, 1), Err(MoleculeError::SelfBond(1)));
        // Re-bonding replaces the order instead of adding a second edge.
        mol.add_bond(1, 0, 2).unwrap();
        assert_eq!(mol.bond_count(), 2);
    }

    #[test]
    fn fragments_follow_bonds() {
        let mut mol = water();
        let ion = mol.add_atom(Atom::new("NA", Element::Sodium, Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(mol.fragments(), &[0, 0, 0, 1]);
        assert_eq!(mol.fragment(ion), Some(1));

        // Edits clear the derived tables.
        mol.add_bond(2, ion, 1).unwrap();
        assert_eq!(mol.fragments(), &[0, 0, 0, 0]);
    }

    #[test]
    fn bounding_box_spans_atoms() {
        let mol = water();
        let bounds = mol.bounding_box();
        assert!(bounds.contains(Vec3::new(0.5, 0.5, 0.0)));
        assert!(Molecule::new().bounding_box().is_empty());
    }
}

// End of File
