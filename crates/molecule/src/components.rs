// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Residue-name based classification of atoms into molecular components.
//!
//! Every residue falls into exactly one category, tested in this order: water, protein, nucleic
//! acid, cofactor, solvent.  Anything unrecognized is a ligand.

use std::collections::HashSet;

use bitflags::bitflags;
use lazy_static::lazy_static;

bitflags! {
    /// Component categories.  The selection keyword `solvent` matches either `WATER` or
    /// `SOLVENT`; every other component keyword matches its own flag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ComponentFlags: u32 {
        const PROTEIN = 1;
        const LIGAND = 1 << 1;
        const SOLVENT = 1 << 2;
        const COFACTOR = 1 << 3;
        const NUCLEIC = 1 << 4;
        const WATER = 1 << 5;
    }
}

fn name_set(names: &[&'static str]) -> HashSet<&'static str> {
    names.iter().copied().collect()
}

lazy_static! {
    static ref WATER_RESIDUES: HashSet<&'static str> =
        name_set(&["HOH", "WAT", "H2O", "DOD", "TIP", "TIP3", "SPC"]);

    static ref AMINO_ACID_RESIDUES: HashSet<&'static str> = name_set(&[
        "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE", "LEU", "LYS", "MET",
        "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
        // Protonation and disulfide variants
        "HID", "HIE", "HIP", "CYX", "ASH", "GLH",
        // Caps
        "ACE", "NME",
    ]);

    static ref NUCLEOTIDE_RESIDUES: HashSet<&'static str> = name_set(&[
        "A", "G", "C", "U", "T", "DA", "DG", "DC", "DT", "DU", "ADE", "GUA", "CYT", "URA", "THY",
        "RA", "RG", "RC", "RU",
    ]);

    static ref COFACTOR_RESIDUES: HashSet<&'static str> = name_set(&[
        "NAD", "NAP", "NAI", "NDP", "FAD", "FMN", "FNR", "HEM", "HEC", "HEA", "ATP", "ADP", "AMP",
        "GTP", "GDP", "GMP", "COA", "ACO", "PLP", "BTN", "B12", "CBY", "SF4", "FES", "F3S",
        // Ions that usually act as cofactors
        "MG", "CA", "ZN", "FE", "MN", "CU",
    ]);

    static ref SOLVENT_RESIDUES: HashSet<&'static str> =
        name_set(&["DMS", "DMF", "ACN", "MET", "EOH", "IPA", "GOL", "PEG", "EDO"]);
}

/// Classifies a residue by name.  The name is trimmed and compared case-insensitively.
///
/// `MET` is both methionine and a solvent code; the protein test comes first, so it is protein.
pub fn classify_residue(residue_name: &str) -> ComponentFlags {
    let name = residue_name.trim().to_ascii_uppercase();
    let name = name.as_str();

    if WATER_RESIDUES.contains(name) {
        ComponentFlags::WATER
    } else if AMINO_ACID_RESIDUES.contains(name) {
        ComponentFlags::PROTEIN
    } else if NUCLEOTIDE_RESIDUES.contains(name) {
        ComponentFlags::NUCLEIC
    } else if COFACTOR_RESIDUES.contains(name) {
        ComponentFlags::COFACTOR
    } else if SOLVENT_RESIDUES.contains(name) {
        ComponentFlags::SOLVENT
    } else {
        ComponentFlags::LIGAND
    }
}


// End of File
