// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::io;

use thiserror::Error;

/// Everything that can go wrong before a selection exists.  Evaluating a parsed selection never
/// fails.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Malformed or unrecognized selection text.  `position` is a character offset into the
    /// original text.
    #[error("syntax error{}: {message}", position_suffix(*.position))]
    Syntax {
        message: String,
        position: Option<usize>,
    },

    /// The parser reached a state that well-formed or malformed input alike should never produce.
    #[error("internal parser error: {0}")]
    Internal(String),

    /// A recognized field whose value does not fit, e.g. an out-of-range residue number.
    #[error("invalid value {value:?} at offset {position}: {message}")]
    InvalidValue {
        value: String,
        message: String,
        position: usize,
    },

    /// A residue selector string that is not `NAME:NUMBER:ICODE:CHAIN`.
    #[error("invalid residue selector: {0}")]
    Selector(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn position_suffix(position: Option<usize>) -> String {
    position.map_or_else(String::new, |p| format!(" at offset {p}"))
}

impl SelectionError {
    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> Self {
        SelectionError::Syntax {
            message: message.into(),
            position: Some(position),
        }
    }

    /// The character offset the error refers to, when one is known.
    pub fn position(&self) -> Option<usize> {
        match self {
            SelectionError::Syntax { position, .. } => *position,
            SelectionError::InvalidValue { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// True for parser invariant violations as opposed to bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, SelectionError::Internal(_))
    }
}

pub type Result<T, E = SelectionError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_offsets() {
        let err = SelectionError::syntax("expected ')'", 7);
        assert_eq!(err.to_string(), "syntax error at offset 7: expected ')'");
        assert_eq!(err.position(), Some(7));

        let err = SelectionError::Syntax {
            message: "empty".into(),
            position: None,
        };
        assert_eq!(err.to_string(), "syntax error: empty");
        assert_eq!(err.position(), None);
    }

    #[test]
    fn internal_errors_are_distinguishable() {
        let err = SelectionError::Internal("operand stack underflow".into());
        assert!(err.is_internal());
        assert_eq!(err.position(), None);
        assert!(!SelectionError::syntax("x", 0).is_internal());
    }
}

// End of File
