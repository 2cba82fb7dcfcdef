// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use molecule::{AtomIndex, Molecule};

use crate::context::EvaluationContext;
use crate::error::Result;
use crate::selection::Selection;

/// A selection bound to one molecule, with the evaluation state that binding needs.
pub struct Select<'m> {
    context: EvaluationContext<'m>,
}

impl<'m> Select<'m> {
    pub fn new(molecule: &'m Molecule, text: &str) -> Result<Self> {
        Ok(Self::with_selection(molecule, Selection::parse(text)?))
    }

    pub fn with_selection(molecule: &'m Molecule, selection: Selection) -> Self {
        Self {
            context: EvaluationContext::new(molecule, selection),
        }
    }

    pub fn from_context(context: EvaluationContext<'m>) -> Self {
        Self { context }
    }

    pub fn selection(&self) -> &Selection {
        self.context.selection()
    }

    pub fn matches(&mut self, atom: AtomIndex) -> bool {
        self.context.matches(atom)
    }

    /// Every selected atom, in ascending order.
    pub fn indices(&mut self) -> Vec<AtomIndex> {
        let count = self.context.molecule().atom_count();
        (0..count).filter(|&atom| self.matches(atom)).collect()
    }
}

/// Indices of the atoms of `molecule` matching `text`, ascending.
pub fn select(molecule: &Molecule, text: &str) -> Result<Vec<AtomIndex>> {
    Ok(Select::new(molecule, text)?.indices())
}

pub fn count(molecule: &Molecule, text: &str) -> Result<usize> {
    Ok(select(molecule, text)?.len())
}


// End of File
