// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Residues named explicitly as `NAME:NUMBER:ICODE:CHAIN` strings, e.g. `ALA:12::A` or
//! `GLY:7:B:H`.  A blank insertion code or chain is written as an empty field.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use molecule::{AtomIndex, Molecule, Residue, ResidueKey};
use rustc_hash::FxHashSet;

use crate::error::{Result, SelectionError};
use crate::select::select;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueSelector {
    pub name: String,
    pub number: i32,
    pub insert_code: char,
    pub chain: char,
}

impl ResidueSelector {
    pub fn from_residue(residue: &Residue) -> Self {
        Self {
            name: residue.name.trim().to_string(),
            number: residue.number,
            insert_code: residue.insert_code,
            chain: residue.chain,
        }
    }

    pub fn key(&self) -> ResidueKey {
        ResidueKey {
            chain: self.chain,
            number: self.number,
            insert_code: self.insert_code,
        }
    }
}

impl Ord for ResidueSelector {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key()
            .cmp(&other.key())
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for ResidueSelector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ResidueSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.name,
            self.number,
            self.insert_code.to_string().trim(),
            self.chain.to_string().trim()
        )
    }
}

impl FromStr for ResidueSelector {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split(':').map(str::trim).collect();
        let [name, number, insert_code, chain] = fields[..] else {
            return Err(SelectionError::Selector(format!(
                "{s:?} has {} fields, expected NAME:NUMBER:ICODE:CHAIN",
                fields.len()
            )));
        };
        let number = number.parse().map_err(|_| {
            SelectionError::Selector(format!("{s:?} has a non-integer residue number {number:?}"))
        })?;
        Ok(Self {
            name: name.to_string(),
            number,
            insert_code: single_char(s, insert_code, "insertion code")?,
            chain: single_char(s, chain, "chain id")?,
        })
    }
}

fn single_char(selector: &str, field: &str, what: &str) -> Result<char> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(' '),
        (Some(c), None) => Ok(c),
        _ => Err(SelectionError::Selector(format!(
            "{selector:?} has a {what} longer than one character"
        ))),
    }
}

/// A set of residue selectors, matched against atoms by chain, number and insertion code.
#[derive(Debug, Clone, Default)]
pub struct ResidueSelectorSet {
    selectors: BTreeSet<ResidueSelector>,
    keys: FxHashSet<ResidueKey>,
}

impl ResidueSelectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, selector: ResidueSelector) -> bool {
        self.keys.insert(selector.key());
        self.selectors.insert(selector)
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Selectors in (chain, number, insertion code, name) order.
    pub fn iter(&self) -> impl Iterator<Item = &ResidueSelector> + '_ {
        self.selectors.iter()
    }

    pub fn contains_residue(&self, residue: &Residue) -> bool {
        self.keys.contains(&residue.key())
    }

    /// The residue name is not compared.
    pub fn matches(&self, molecule: &Molecule, atom: AtomIndex) -> bool {
        molecule
            .atom(atom)
            .is_some_and(|a| self.contains_residue(&a.residue))
    }
}

impl FromIterator<ResidueSelector> for ResidueSelectorSet {
    fn from_iter<I: IntoIterator<Item = ResidueSelector>>(iter: I) -> Self {
        let mut set = Self::new();
        for selector in iter {
            set.insert(selector);
        }
        set
    }
}

/// Parses selectors separated by any run of `,`, `;`, `&`, tabs and newlines.
pub fn parse_selector_set(text: &str) -> Result<ResidueSelectorSet> {
    text.split([',', ';', '&', '\t', '\n'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::parse::<ResidueSelector>)
        .collect()
}

/// The selector string of the residue `atom` belongs to.
pub fn selector_string(molecule: &Molecule, atom: AtomIndex) -> Option<String> {
    molecule
        .atom(atom)
        .map(|a| ResidueSelector::from_residue(&a.residue).to_string())
}

/// Selector strings of every residue in `molecule`.
pub fn mol_to_selector_set(molecule: &Molecule) -> BTreeSet<String> {
    molecule
        .atoms()
        .map(|(_, atom)| ResidueSelector::from_residue(&atom.residue).to_string())
        .collect()
}

/// Selector strings of the residues holding at least one atom matched by `selection`.
pub fn str_selector_set(molecule: &Molecule, selection: &str) -> Result<BTreeSet<String>> {
    Ok(select(molecule, selection)?
        .into_iter()
        .filter_map(|atom| selector_string(molecule, atom))
        .collect())
}


// End of File
