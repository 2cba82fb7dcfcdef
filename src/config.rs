// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Tunables for parsing and evaluation, loadable from TOML:
//!
//! ```toml
//! distance_epsilon = 0.0001
//! max_parse_depth = 256
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Slack in Å added to every distance cutoff, so atoms sitting exactly on the radius are
    /// included despite floating point rounding.
    pub distance_epsilon: f32,
    /// Deepest nesting of parentheses and prefix operators the parser accepts.
    pub max_parse_depth: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            distance_epsilon: 1e-4,
            max_parse_depth: 256,
        }
    }
}

impl SelectionConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("loaded selection config from {}: {config:?}", path.as_ref().display());
        Ok(config)
    }
}


// End of File
