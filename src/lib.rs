// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! A PyMOL-style atom selection language.
//!
//! ```
//! use atomselect::{Molecule, Select};
//!
//! let molecule = Molecule::new();
//! let mut near_ligand = Select::new(&molecule, "byres around 5 ligand and not water")?;
//! assert!(near_ligand.indices().is_empty());
//! # Ok::<(), atomselect::SelectionError>(())
//! ```
//!
//! Text is parsed once into a [`Selection`], an immutable predicate tree that can be shared
//! between threads and evaluated against any number of molecules.  Evaluation goes through an
//! [`EvaluationContext`], which memoises the whole-molecule work (neighbour searches, residue and
//! chain expansion) that per-atom predicates need.

mod config;
mod context;
mod error;
mod matchers;
mod parser;
pub mod predicate;
mod residue_selector;
mod select;
mod selection;
mod spatial_index;

pub use crate::config::SelectionConfig;
pub use crate::context::EvaluationContext;
pub use crate::error::{Result, SelectionError};
pub use crate::matchers::{matching_atoms, AtomMatcher, HasAtomName, HasResidueName};
pub use crate::parser::{parse, parse_with};
pub use crate::predicate::{Predicate, PredicateKind, PredicateRef};
pub use crate::residue_selector::{
    mol_to_selector_set, parse_selector_set, selector_string, str_selector_set, ResidueSelector,
    ResidueSelectorSet,
};
pub use crate::select::{count, select, Select};
pub use crate::selection::Selection;
pub use crate::spatial_index::SpatialIndex;

pub use molecule::{
    load_pdb, read_pdb_str, Atom, AtomIndex, ComponentFlags, Molecule, PdbError, Residue,
    SecondaryStructure,
};
pub use periodic_table::Element;

// End of File
