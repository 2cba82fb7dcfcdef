// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A fixed-column PDB reader covering what the selection language looks at: `ATOM`/`HETATM`
//! coordinate records, `CONECT` bonds, and `HELIX`/`SHEET`/`TURN` secondary structure.  Only
//! the first model of a multi-model file is read.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use periodic_table::Element;
use thiserror::Error;
use ultraviolet::Vec3;

use crate::molecule::{Atom, AtomIndex, Molecule, Residue, SecondaryStructure};

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid PDB format on line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// A secondary structure segment from a `HELIX`, `SHEET` or `TURN` record.  Both ends inclusive.
#[derive(Debug, Clone, Copy)]
struct Segment {
    kind: SecondaryStructure,
    chain: char,
    start: (i32, char),
    end: (i32, char),
}

impl Segment {
    fn covers(&self, residue: &Residue) -> bool {
        let at = (residue.number, residue.insert_code);
        residue.chain == self.chain && self.start <= at && at <= self.end
    }
}

pub fn load_pdb(path: impl AsRef<Path>) -> Result<Molecule, PdbError> {
    let file = File::open(path.as_ref())?;
    let mut molecule = read_pdb(BufReader::new(file))?;
    if molecule.title().is_empty() {
        if let Some(stem) = path.as_ref().file_stem() {
            molecule.set_title(stem.to_string_lossy());
        }
    }
    Ok(molecule)
}

pub fn read_pdb_str(contents: &str) -> Result<Molecule, PdbError> {
    read_pdb(contents.as_bytes())
}

pub fn read_pdb(reader: impl BufRead) -> Result<Molecule, PdbError> {
    let mut molecule = Molecule::new();
    let mut title = String::new();
    let mut by_serial: HashMap<i32, AtomIndex> = HashMap::new();
    let mut segments = Vec::new();
    let mut bonds = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let record = column(&line, 1, 6);

        match record {
            "ATOM" | "HETATM" => {
                let atom = parse_atom(&line, line_number)?;
                let serial = atom.serial;
                let atom_index = molecule.add_atom(atom);
                by_serial.insert(serial, atom_index);
            }
            "CONECT" => {
                let from = column(&line, 7, 11);
                let Ok(from) = from.parse::<i32>() else {
                    log::warn!("line {line_number}: skipping CONECT with bad serial {from:?}");
                    continue;
                };
                for (start, end) in [(12, 16), (17, 21), (22, 26), (27, 31)] {
                    if let Ok(to) = column(&line, start, end).parse::<i32>() {
                        bonds.push((from, to, line_number));
                    }
                }
            }
            "HELIX" => segments.push(Segment {
                kind: SecondaryStructure::Helix,
                chain: char_at(&line, 20),
                start: (parse_int(&line, 22, 25, line_number)?, char_at(&line, 26)),
                end: (parse_int(&line, 34, 37, line_number)?, char_at(&line, 38)),
            }),
            "SHEET" => segments.push(Segment {
                kind: SecondaryStructure::Sheet,
                chain: char_at(&line, 22),
                start: (parse_int(&line, 23, 26, line_number)?, char_at(&line, 27)),
                end: (parse_int(&line, 34, 37, line_number)?, char_at(&line, 38)),
            }),
            "TURN" => segments.push(Segment {
                kind: SecondaryStructure::Turn,
                chain: char_at(&line, 20),
                start: (parse_int(&line, 21, 24, line_number)?, char_at(&line, 25)),
                end: (parse_int(&line, 32, 35, line_number)?, char_at(&line, 36)),
            }),
            "TITLE" => {
                let text = column(&line, 11, 80);
                if !text.is_empty() {
                    if !title.is_empty() {
                        title.push(' ');
                    }
                    title.push_str(text);
                }
            }
            "ENDMDL" | "END" => break,
            _ => {}
        }
    }

    molecule.set_title(title);
    if !segments.is_empty() {
        assign_secondary_structure(&mut molecule, &segments);
    }
    connect(molecule, &by_serial, &bonds)
}

fn parse_atom(line: &str, line_number: usize) -> Result<Atom, PdbError> {
    let name_field = line.get(12..16).unwrap_or("");
    let name = name_field.trim();
    if name.is_empty() {
        return Err(PdbError::Parse {
            line: line_number,
            message: "missing atom name".to_string(),
        });
    }

    let position = Vec3::new(
        parse_float(line, 31, 38, line_number)?,
        parse_float(line, 39, 46, line_number)?,
        parse_float(line, 47, 54, line_number)?,
    );

    let residue = Residue {
        name: column(line, 18, 20).to_string(),
        number: parse_int(line, 23, 26, line_number)?,
        insert_code: char_at(line, 27),
        chain: char_at(line, 22),
        secondary_structure: None,
    };

    Ok(Atom {
        name: name.to_string(),
        element: element_of(column(line, 77, 78), name_field),
        position,
        serial: column(line, 7, 11).parse().unwrap_or(0),
        alt_loc: char_at(line, 17),
        b_factor: column(line, 61, 66).parse().unwrap_or(0.0),
        residue,
    })
}

/// Resolves the element column, falling back to the atom name.  Names whose first column is
/// blank (`" CA "`) are single-letter elements; names starting in the first column (`"FE  "`)
/// may be two-letter ones.
fn element_of(element_field: &str, name_field: &str) -> Option<Element> {
    if let Some(element) = Element::from_symbol(element_field) {
        return Some(element);
    }
    let letters: String = name_field
        .trim()
        .chars()
        .skip_while(|c| c.is_ascii_digit())
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if !name_field.starts_with(' ') && letters.len() >= 2 {
        if let Some(element) = Element::from_symbol(&letters[..2]) {
            return Some(element);
        }
    }
    letters.get(..1).and_then(Element::from_symbol)
}

fn assign_secondary_structure(molecule: &mut Molecule, segments: &[Segment]) {
    for index in 0..molecule.atom_count() {
        if let Some(atom) = molecule.atom_mut(index) {
            atom.residue.secondary_structure = segments
                .iter()
                .find(|segment| segment.covers(&atom.residue))
                .map(|segment| segment.kind);
        }
    }
}

fn connect(
    mut molecule: Molecule,
    by_serial: &HashMap<i32, AtomIndex>,
    bonds: &[(i32, i32, usize)],
) -> Result<Molecule, PdbError> {
    for &(from, to, line_number) in bonds {
        match (by_serial.get(&from), by_serial.get(&to)) {
            (Some(&a), Some(&b)) if a != b => {
                molecule.add_bond(a, b, 1).map_err(|e| PdbError::Parse {
                    line: line_number,
                    message: e.to_string(),
                })?;
            }
            _ => log::warn!("line {line_number}: skipping CONECT {from}-{to}"),
        }
    }
    Ok(molecule)
}

/// The text of 1-based inclusive columns `start..=end`, trimmed.  Short lines yield whatever
/// part of the range exists.
fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start > end {
        return "";
    }
    line.get(start - 1..end).unwrap_or("").trim()
}

/// The character in 1-based column `at`, or blank.
fn char_at(line: &str, at: usize) -> char {
    line.get(at - 1..at)
        .and_then(|s| s.chars().next())
        .unwrap_or(' ')
}

fn parse_int(line: &str, start: usize, end: usize, line_number: usize) -> Result<i32, PdbError> {
    let text = column(line, start, end);
    text.parse().map_err(|_| PdbError::Parse {
        line: line_number,
        message: format!("invalid integer {text:?} in columns {start}-{end}"),
    })
}

fn parse_float(line: &str, start: usize, end: usize, line_number: usize) -> Result<f32, PdbError> {
    let text = column(line, start, end);
    text.parse().map_err(|_| PdbError::Parse {
        line: line_number,
        message: format!("invalid coordinate {text:?} in columns {start}-{end}"),
    })
}


// End of File
