// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Plain name matchers for callers that already know the exact name they want and do not need
//! the selection language.

use molecule::{AtomIndex, Molecule};

use crate::residue_selector::ResidueSelectorSet;

pub trait AtomMatcher {
    fn matches(&self, molecule: &Molecule, atom: AtomIndex) -> bool;
}

/// Exact name comparison shared by the matchers below.  Case-insensitive unless asked otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NameComparison {
    name: String,
    case_sensitive: bool,
    whitespace: bool,
}

impl NameComparison {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            case_sensitive: false,
            whitespace: false,
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        let (wanted, candidate) = if self.whitespace {
            (self.name.as_str(), candidate)
        } else {
            (self.name.trim(), candidate.trim())
        };
        if self.case_sensitive {
            wanted == candidate
        } else {
            wanted.eq_ignore_ascii_case(candidate)
        }
    }
}

/// Matches atoms whose residue has the given name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasResidueName(NameComparison);

impl HasResidueName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(NameComparison::new(name))
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.0.case_sensitive = case_sensitive;
        self
    }

    /// When set, surrounding whitespace is significant.
    pub fn whitespace(mut self, whitespace: bool) -> Self {
        self.0.whitespace = whitespace;
        self
    }
}

impl AtomMatcher for HasResidueName {
    fn matches(&self, molecule: &Molecule, atom: AtomIndex) -> bool {
        molecule
            .atom(atom)
            .is_some_and(|a| self.0.matches(&a.residue.name))
    }
}

/// Matches atoms with the given name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasAtomName(NameComparison);

impl HasAtomName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(NameComparison::new(name))
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.0.case_sensitive = case_sensitive;
        self
    }

    pub fn whitespace(mut self, whitespace: bool) -> Self {
        self.0.whitespace = whitespace;
        self
    }
}

impl AtomMatcher for HasAtomName {
    fn matches(&self, molecule: &Molecule, atom: AtomIndex) -> bool {
        molecule.atom(atom).is_some_and(|a| self.0.matches(&a.name))
    }
}

impl AtomMatcher for ResidueSelectorSet {
    fn matches(&self, molecule: &Molecule, atom: AtomIndex) -> bool {
        ResidueSelectorSet::matches(self, molecule, atom)
    }
}

/// Indices of the atoms `matcher` accepts, ascending.
pub fn matching_atoms(molecule: &Molecule, matcher: &dyn AtomMatcher) -> Vec<AtomIndex> {
    (0..molecule.atom_count())
        .filter(|&atom| matcher.matches(molecule, atom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use molecule::{Atom, Residue};
    use periodic_table::Element;
    use ultraviolet::Vec3;

    fn molecule() -> Molecule {
        let mut mol = Molecule::new();
        mol.add_atom(
            Atom::new(" CA ", Element::Carbon, Vec3::zero())
                .with_residue(Residue::new("ALA", 1, 'A')),
        );
        mol.add_atom(
            Atom::new("ca", Element::Calcium, Vec3::zero())
                .with_residue(Residue::new("Ala ", 2, 'A')),
        );
        mol
    }

    #[test]
    fn atom_names() {
        let mol = molecule();
        assert_eq!(matching_atoms(&mol, &HasAtomName::new("CA")), vec![0, 1]);
        assert_eq!(
            matching_atoms(&mol, &HasAtomName::new("CA").case_sensitive(true)),
            vec![0]
        );
        assert!(matching_atoms(&mol, &HasAtomName::new("CA").whitespace(true)).is_empty());
        assert_eq!(
            matching_atoms(&mol, &HasAtomName::new(" CA ").whitespace(true)),
            vec![0]
        );
        assert!(!HasAtomName::new("CA").matches(&mol, 7));
    }

    #[test]
    fn residue_names() {
        let mol = molecule();
        assert_eq!(matching_atoms(&mol, &HasResidueName::new("ala")), vec![0, 1]);
        assert_eq!(
            matching_atoms(&mol, &HasResidueName::new("ALA").case_sensitive(true)),
            vec![0]
        );
    }
}

// End of File
