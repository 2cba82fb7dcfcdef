// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::io::Write;

use atomselect_molecule::{
    load_pdb, read_pdb_str, ComponentFlags, PdbError, SecondaryStructure,
};
use periodic_table::Element;

const MINI_PDB: &str = "\
TITLE     MINI TEST STRUCTURE
HELIX    1   1 ALA A    1  GLY A    2  1                                   2
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00 10.50           N
ATOM      2  CA  ALA A   1       1.458   0.000   0.000  1.00 11.25           C
ATOM      3  CA AGLY A   2       3.000   1.000   0.000  1.00 12.00           C
ATOM      4  CA  GLY A   2A      4.500   1.000   0.000  1.00 12.00           C
HETATM    5 ZN    ZN B 101      10.000  10.000  10.000  1.00 30.00            
HETATM    6  O   HOH W 201      -5.000   0.000   0.000  1.00 40.00           O
CONECT    1    2
CONECT    2    1    3
END
ATOM      7  CA  ALA A   9       0.000   0.000   0.000  1.00  0.00           C
";

mod reader_tests {
    use super::*;

    #[test]
    fn test_reads_coordinate_records() {
        let mol = read_pdb_str(MINI_PDB).unwrap();
        assert_eq!(mol.title(), "MINI TEST STRUCTURE");
        // Everything after END is ignored.
        assert_eq!(mol.atom_count(), 6);

        let ca = mol.atom(1).unwrap();
        assert_eq!(ca.name, "CA");
        assert_eq!(ca.serial, 2);
        assert_eq!(ca.element, Some(Element::Carbon));
        assert_eq!(ca.residue.name, "ALA");
        assert_eq!(ca.residue.chain, 'A');
        assert_eq!(ca.residue.number, 1);
        assert!((ca.position.x - 1.458).abs() < 1e-6);
        assert!((ca.b_factor - 11.25).abs() < 1e-6);

        assert_eq!(mol.atom(2).unwrap().alt_loc, 'A');
        assert_eq!(mol.atom(3).unwrap().residue.insert_code, 'A');
    }

    #[test]
    fn test_element_falls_back_to_atom_name() {
        let mol = read_pdb_str(MINI_PDB).unwrap();
        let zinc = mol.atom(4).unwrap();
        assert_eq!(zinc.name, "ZN");
        assert_eq!(zinc.element, Some(Element::Zinc));
        assert_eq!(zinc.residue.name, "ZN");
    }

    #[test]
    fn test_conect_records_become_bonds() {
        let mol = read_pdb_str(MINI_PDB).unwrap();
        // 1-2 is listed twice but is a single bond.
        assert_eq!(mol.bond_count(), 2);
        let mut neighbors: Vec<_> = mol.neighbors(1).collect();
        neighbors.sort();
        assert_eq!(neighbors, vec![0, 2]);
    }

    #[test]
    fn test_helix_ranges_respect_insertion_codes() {
        let mol = read_pdb_str(MINI_PDB).unwrap();
        let ss: Vec<_> = mol
            .atoms()
            .map(|(_, atom)| atom.residue.secondary_structure)
            .collect();
        assert_eq!(
            ss,
            vec![
                Some(SecondaryStructure::Helix),
                Some(SecondaryStructure::Helix),
                Some(SecondaryStructure::Helix),
                None,
                None,
                None,
            ]
        );
    }

    #[test]
    fn test_bad_coordinates_report_line() {
        let text = "ATOM      1  N   ALA A   1       0.000   abcde   0.000  1.00 10.50           N\n";
        match read_pdb_str(text) {
            Err(PdbError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file_uses_stem_as_fallback_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("untitled.pdb");
        let body: String = MINI_PDB.lines().skip(1).collect::<Vec<_>>().join("\n");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(body.as_bytes())
            .unwrap();

        let mol = load_pdb(&path).unwrap();
        assert_eq!(mol.title(), "untitled");
        assert_eq!(mol.atom_count(), 6);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_pdb("/nonexistent/structure.pdb"),
            Err(PdbError::Io(_))
        ));
    }
}

mod classification_tests {
    use super::*;

    #[test]
    fn test_classification_is_idempotent() {
        let mol = read_pdb_str(MINI_PDB).unwrap();
        let first: Vec<ComponentFlags> = mol.components().to_vec();
        let second: Vec<ComponentFlags> = mol.components().to_vec();
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                ComponentFlags::PROTEIN,
                ComponentFlags::PROTEIN,
                ComponentFlags::PROTEIN,
                ComponentFlags::PROTEIN,
                ComponentFlags::COFACTOR,
                ComponentFlags::WATER,
            ]
        );
    }

    #[test]
    fn test_per_atom_queries() {
        let mol = read_pdb_str(MINI_PDB).unwrap();
        assert!(mol.has_component(0, ComponentFlags::PROTEIN));
        assert!(mol.has_component(5, ComponentFlags::WATER | ComponentFlags::SOLVENT));
        assert!(!mol.has_component(5, ComponentFlags::PROTEIN));
        assert!(!mol.has_component(99, ComponentFlags::all()));
        assert_eq!(mol.component_flags(4).bits(), 8);
    }
}

// End of File
