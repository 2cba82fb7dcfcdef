// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! The molecule model atom selections are evaluated against: atoms with residue metadata, a
//! bond graph, residue-name classification, and readers for PDB and JSON input.

pub mod components;
mod molecule;
pub mod pdb;
mod record;

pub use crate::components::{classify_residue, ComponentFlags};
pub use crate::molecule::{
    Atom, AtomIndex, BondOrder, Molecule, MoleculeError, MoleculeGraph, Residue, ResidueKey,
    SecondaryStructure,
};
pub use crate::pdb::{load_pdb, read_pdb, read_pdb_str, PdbError};
pub use crate::record::{AtomRecord, MoleculeRecord, RecordError};

// End of File
