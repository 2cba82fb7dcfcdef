// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

#![allow(dead_code)]

use atomselect::{Atom, Element, Molecule, Residue, SecondaryStructure};
use ultraviolet::Vec3;

/// A two-residue peptide (ALA 1 in a helix, GLY 2 unassigned) on chain A, a three-atom ligand
/// and a zinc ion on chain B, and one water on chain W.
///
/// | index | atom | residue     |
/// |-------|------|-------------|
/// | 0-6   | N CA C O CB H HA | ALA 1 A |
/// | 7-11  | N CA C O OXT     | GLY 2 A |
/// | 12-14 | C1 O1 H1         | LIG 101 B |
/// | 15    | ZN               | ZN 201 B |
/// | 16-18 | O H1 H2          | HOH 301 W |
///
/// Serial numbers are `index + 1` and temperature factors equal the index.
pub fn complex() -> Molecule {
    let ala = Residue::new("ALA", 1, 'A').with_secondary_structure(SecondaryStructure::Helix);
    let gly = Residue::new("GLY", 2, 'A');
    let lig = Residue::new("LIG", 101, 'B');
    let zn = Residue::new("ZN", 201, 'B');
    let hoh = Residue::new("HOH", 301, 'W');

    let atoms = [
        ("N", Element::Nitrogen, [0.0, 0.0, 0.0], &ala),
        ("CA", Element::Carbon, [1.5, 0.0, 0.0], &ala),
        ("C", Element::Carbon, [3.0, 0.0, 0.0], &ala),
        ("O", Element::Oxygen, [3.0, 1.2, 0.0], &ala),
        ("CB", Element::Carbon, [1.5, 1.5, 0.0], &ala),
        ("H", Element::Hydrogen, [-1.0, 0.0, 0.0], &ala),
        ("HA", Element::Hydrogen, [1.5, -1.0, 0.0], &ala),
        ("N", Element::Nitrogen, [4.5, 0.0, 0.0], &gly),
        ("CA", Element::Carbon, [6.0, 0.0, 0.0], &gly),
        ("C", Element::Carbon, [7.5, 0.0, 0.0], &gly),
        ("O", Element::Oxygen, [7.5, 1.2, 0.0], &gly),
        ("OXT", Element::Oxygen, [8.5, -0.8, 0.0], &gly),
        ("C1", Element::Carbon, [12.0, 0.0, 0.0], &lig),
        ("O1", Element::Oxygen, [13.2, 0.0, 0.0], &lig),
        ("H1", Element::Hydrogen, [13.8, 0.8, 0.0], &lig),
        ("ZN", Element::Zinc, [12.0, 3.0, 0.0], &zn),
        ("O", Element::Oxygen, [0.0, 0.0, 20.0], &hoh),
        ("H1", Element::Hydrogen, [0.96, 0.0, 20.0], &hoh),
        ("H2", Element::Hydrogen, [-0.24, 0.93, 20.0], &hoh),
    ];

    let mut mol = Molecule::with_title("complex");
    for (index, (name, element, [x, y, z], residue)) in atoms.into_iter().enumerate() {
        mol.add_atom(
            Atom::new(name, element, Vec3::new(x, y, z))
                .with_residue(residue.clone())
                .with_serial(index as i32 + 1)
                .with_b_factor(index as f32),
        );
    }

    let bonds = [
        (0, 1),
        (1, 2),
        (2, 3),
        (1, 4),
        (0, 5),
        (1, 6),
        (2, 7),
        (7, 8),
        (8, 9),
        (9, 10),
        (9, 11),
        (12, 13),
        (13, 14),
        (16, 17),
        (16, 18),
    ];
    for (a, b) in bonds {
        mol.add_bond(a, b, 1).unwrap();
    }
    mol
}

/// Four atoms on the x axis: REF at 0, NEAR at 1.5, MID at 4 and FAR at 10.
pub fn line() -> Molecule {
    let mut mol = Molecule::with_title("line");
    for (name, x) in [("REF", 0.0), ("NEAR", 1.5), ("MID", 4.0), ("FAR", 10.0)] {
        mol.add_atom(Atom::new(name, Element::Carbon, Vec3::new(x, 0.0, 0.0)));
    }
    mol
}

/// Unbonded carbons with the given names, all at the origin.
pub fn named(names: &[&str]) -> Molecule {
    let mut mol = Molecule::new();
    for name in names {
        mol.add_atom(Atom::new(*name, Element::Carbon, Vec3::zero()));
    }
    mol
}

/// One carbon per residue (`X 1`, `X 2`, ...) on chain A, with the given temperature factors.
pub fn b_factors(values: &[f32]) -> Molecule {
    let mut mol = Molecule::new();
    for (index, &b_factor) in values.iter().enumerate() {
        mol.add_atom(
            Atom::new("C", Element::Carbon, Vec3::new(index as f32 * 10.0, 0.0, 0.0))
                .with_residue(Residue::new("X", index as i32 + 1, 'A'))
                .with_b_factor(b_factor),
        );
    }
    mol
}

/// Atom names of `indices`, for readable assertions.
pub fn names(mol: &Molecule, indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .filter_map(|&i| mol.atom(i))
        .map(|atom| atom.name.clone())
        .collect()
}

// End of File
