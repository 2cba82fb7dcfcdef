// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::fmt;
use std::str::FromStr;

use crate::config::SelectionConfig;
use crate::error::{Result, SelectionError};
use crate::parser;
use crate::predicate::{Predicate, PredicateKind, PredicateRef};

/// A parsed selection.  Cloning shares the underlying tree.
#[derive(Debug, Clone)]
pub struct Selection {
    root: PredicateRef,
}

impl Selection {
    /// Parses `text`.  Empty text selects every atom.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, &SelectionConfig::default())
    }

    pub fn parse_with(text: &str, config: &SelectionConfig) -> Result<Self> {
        let root = parser::parse_with(text, config)?;
        log::debug!("parsed selection {text:?} as {}", root.to_canonical());
        Ok(Self { root })
    }

    pub fn from_predicate(root: PredicateRef) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &PredicateRef {
        &self.root
    }

    pub fn to_canonical(&self) -> String {
        self.root.to_canonical()
    }

    pub fn contains_predicate(&self, kind: PredicateKind) -> bool {
        self.root.contains(kind)
    }

    /// True when the selection is the match-everything constant.
    pub fn is_empty(&self) -> bool {
        matches!(self.root.as_ref(), Predicate::True)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            root: Predicate::all(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

impl FromStr for Selection {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}


// End of File
