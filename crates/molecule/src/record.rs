// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! JSON persistence.  A molecule is written as a flat record without any of the tables derived
//! on demand (classification, fragments), which are rebuilt after loading.

use periodic_table::Element;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ultraviolet::Vec3;

use crate::molecule::{Atom, AtomIndex, BondOrder, Molecule, MoleculeError, Residue};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid bond: {0}")]
    Bond(#[from] MoleculeError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomRecord {
    pub name: String,
    #[serde(default)]
    pub element: Option<Element>,
    pub position: [f32; 3],
    #[serde(default)]
    pub serial: i32,
    #[serde(default = "blank")]
    pub alt_loc: char,
    #[serde(default)]
    pub b_factor: f32,
    #[serde(default)]
    pub residue: Residue,
}

fn blank() -> char {
    ' '
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoleculeRecord {
    #[serde(default)]
    pub title: String,
    pub atoms: Vec<AtomRecord>,
    #[serde(default)]
    pub bonds: Vec<(AtomIndex, AtomIndex, BondOrder)>,
}

impl From<&Atom> for AtomRecord {
    fn from(atom: &Atom) -> Self {
        Self {
            name: atom.name.clone(),
            element: atom.element,
            position: [atom.position.x, atom.position.y, atom.position.z],
            serial: atom.serial,
            alt_loc: atom.alt_loc,
            b_factor: atom.b_factor,
            residue: atom.residue.clone(),
        }
    }
}

impl From<AtomRecord> for Atom {
    fn from(record: AtomRecord) -> Self {
        Self {
            name: record.name,
            element: record.element,
            position: Vec3::from(record.position),
            serial: record.serial,
            alt_loc: record.alt_loc,
            b_factor: record.b_factor,
            residue: record.residue,
        }
    }
}

impl MoleculeRecord {
    pub fn from_molecule(molecule: &Molecule) -> Self {
        Self {
            title: molecule.title().to_string(),
            atoms: molecule.atoms().map(|(_, atom)| atom.into()).collect(),
            bonds: molecule.bonds().collect(),
        }
    }

    pub fn into_molecule(self) -> Result<Molecule, MoleculeError> {
        let mut molecule = Molecule::with_title(self.title);
        for atom in self.atoms {
            molecule.add_atom(atom.into());
        }
        for (a, b, order) in self.bonds {
            molecule.add_bond(a, b, order)?;
        }
        Ok(molecule)
    }
}

impl Molecule {
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let record: MoleculeRecord = serde_json::from_str(json)?;
        Ok(record.into_molecule()?)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(&MoleculeRecord::from_molecule(self))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::SecondaryStructure;

    #[test]
    fn loads_minimal_json() {
        let json = r#"{
            "title": "fragment",
            "atoms": [
                {"name": "CA", "element": 6, "position": [0.0, 0.0, 0.0],
                 "residue": {"name": "ALA", "number": 4, "chain": "A", "secondary_structure": "helix"}},
                {"name": "X", "position": [1.5, 0.0, 0.0]}
            ],
            "bonds": [[0, 1, 1]]
        }"#;
        let mol = Molecule::from_json(json).unwrap();
        assert_eq!(mol.title(), "fragment");
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 1);

        let ca = mol.atom(0).unwrap();
        assert_eq!(ca.element, Some(Element::Carbon));
        assert_eq!(ca.residue.chain, 'A');
        assert_eq!(ca.residue.insert_code, ' ');
        assert_eq!(ca.residue.secondary_structure, Some(SecondaryStructure::Helix));

        let unknown = mol.atom(1).unwrap();
        assert_eq!(unknown.atomic_number(), 0);
        assert_eq!(unknown.alt_loc, ' ');
    }

    #[test]
    fn rejects_dangling_bonds() {
        let json = r#"{"atoms": [{"name": "C", "position": [0, 0, 0]}], "bonds": [[0, 3, 1]]}"#;
        assert!(matches!(
            Molecule::from_json(json),
            Err(RecordError::Bond(MoleculeError::UnknownAtom(3)))
        ));
    }

    #[test]
    fn written_json_reloads() {
        let mut mol = Molecule::with_title("pair");
        let a = mol.add_atom(Atom::new("N", Element::Nitrogen, Vec3::zero()).with_serial(7));
        let b = mol.add_atom(Atom::new("H", Element::Hydrogen, Vec3::unit_x()));
        mol.add_bond(a, b, 1).unwrap();

        let reloaded = Molecule::from_json(&mol.to_json().unwrap()).unwrap();
        assert_eq!(reloaded.atom(0), mol.atom(0));
        assert_eq!(reloaded.bonds().collect::<Vec<_>>(), vec![(0, 1, 1)]);
    }
}

// End of File
