// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! An on-demand scanner.  What a token is depends on the keyword in front of it (`name C*` is a
//! pattern, `resi 5-10` a range), so the parser asks for the kind of token it expects next
//! instead of reading from a pre-built token stream.  Positions are character offsets.

use crate::error::{Result, SelectionError};
use crate::predicate::is_pattern_char;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    And,
    Or,
    Not,
    Xor,
    Name,
    Resn,
    Resi,
    Chain,
    Elem,
    Index,
    Id,
    Alt,
    BFactor,
    Fragment,
    Protein,
    Ligand,
    Water,
    Solvent,
    Organic,
    Backbone,
    Sidechain,
    Metal,
    Heavy,
    Hydrogen,
    PolarHydrogen,
    NonpolarHydrogen,
    Helix,
    Sheet,
    Turn,
    Loop,
    Around,
    XAround,
    Beyond,
    ByRes,
    ByChain,
    All,
    None,
}

impl Keyword {
    /// Looks up a lowercased word, aliases included.
    fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "and" => Keyword::And,
            "or" => Keyword::Or,
            "not" => Keyword::Not,
            "xor" => Keyword::Xor,
            "name" => Keyword::Name,
            "resn" => Keyword::Resn,
            "resi" => Keyword::Resi,
            "chain" => Keyword::Chain,
            "elem" => Keyword::Elem,
            "index" => Keyword::Index,
            "id" => Keyword::Id,
            "alt" => Keyword::Alt,
            "b" | "bfactor" => Keyword::BFactor,
            "frag" | "fragment" => Keyword::Fragment,
            "protein" => Keyword::Protein,
            "ligand" => Keyword::Ligand,
            "water" => Keyword::Water,
            "solvent" => Keyword::Solvent,
            "organic" => Keyword::Organic,
            "backbone" | "bb" => Keyword::Backbone,
            "sidechain" | "sc" => Keyword::Sidechain,
            "metal" | "metals" => Keyword::Metal,
            "heavy" => Keyword::Heavy,
            "hydrogen" | "h" => Keyword::Hydrogen,
            "polar_hydrogen" | "polarh" => Keyword::PolarHydrogen,
            "nonpolar_hydrogen" | "apolarh" => Keyword::NonpolarHydrogen,
            "helix" => Keyword::Helix,
            "sheet" => Keyword::Sheet,
            "turn" => Keyword::Turn,
            "loop" => Keyword::Loop,
            "around" => Keyword::Around,
            "xaround" => Keyword::XAround,
            "beyond" => Keyword::Beyond,
            "byres" => Keyword::ByRes,
            "bychain" => Keyword::ByChain,
            "all" => Keyword::All,
            "none" => Keyword::None,
            _ => return None,
        };
        Some(keyword)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Not => "not",
            Keyword::Xor => "xor",
            Keyword::Name => "name",
            Keyword::Resn => "resn",
            Keyword::Resi => "resi",
            Keyword::Chain => "chain",
            Keyword::Elem => "elem",
            Keyword::Index => "index",
            Keyword::Id => "id",
            Keyword::Alt => "alt",
            Keyword::BFactor => "bfactor",
            Keyword::Fragment => "fragment",
            Keyword::Protein => "protein",
            Keyword::Ligand => "ligand",
            Keyword::Water => "water",
            Keyword::Solvent => "solvent",
            Keyword::Organic => "organic",
            Keyword::Backbone => "backbone",
            Keyword::Sidechain => "sidechain",
            Keyword::Metal => "metal",
            Keyword::Heavy => "heavy",
            Keyword::Hydrogen => "hydrogen",
            Keyword::PolarHydrogen => "polar_hydrogen",
            Keyword::NonpolarHydrogen => "nonpolar_hydrogen",
            Keyword::Helix => "helix",
            Keyword::Sheet => "sheet",
            Keyword::Turn => "turn",
            Keyword::Loop => "loop",
            Keyword::Around => "around",
            Keyword::XAround => "xaround",
            Keyword::Beyond => "beyond",
            Keyword::ByRes => "byres",
            Keyword::ByChain => "bychain",
            Keyword::All => "all",
            Keyword::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
}

pub(crate) struct Lexer {
    chars: Vec<char>,
    i: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Lexer {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            i: 0,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.i
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.i).copied()
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.i + n).copied()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.i += 1;
        }
        c
    }

    fn eat_while<F: Fn(char) -> bool>(&mut self, f: F) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if f(c) {
                s.push(c);
                self.i += 1;
            } else {
                break;
            }
        }
        s
    }

    pub(crate) fn skip_whitespace(&mut self) {
        self.eat_while(char::is_whitespace);
    }

    /// True once only whitespace remains.
    pub(crate) fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.peek().is_none()
    }

    /// Consumes `c` (after whitespace) if it is next.
    pub(crate) fn eat_char(&mut self, c: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(c) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    /// Consumes `s` (after whitespace) if it is next.
    pub(crate) fn eat_str(&mut self, s: &str) -> bool {
        self.skip_whitespace();
        let matches = s
            .chars()
            .enumerate()
            .all(|(n, c)| self.peek_nth(n) == Some(c));
        if matches {
            self.i += s.chars().count();
        }
        matches
    }

    /// The next word (a maximal run of alphanumerics and `_`) and the offset just past it,
    /// without consuming it.
    pub(crate) fn peek_word(&mut self) -> Option<(String, usize)> {
        self.skip_whitespace();
        let word: String = self.chars[self.i..]
            .iter()
            .take_while(|&&c| is_word_char(c))
            .collect();
        if word.is_empty() {
            None
        } else {
            let end = self.i + word.len();
            Some((word, end))
        }
    }

    /// The next word as a keyword, and the offset just past it, without consuming it.
    pub(crate) fn peek_keyword(&mut self) -> Option<(Keyword, usize)> {
        let (word, end) = self.peek_word()?;
        Keyword::from_word(&word.to_ascii_lowercase()).map(|keyword| (keyword, end))
    }

    pub(crate) fn advance_to(&mut self, end: usize) {
        self.i = end.min(self.chars.len());
    }

    /// A `name`/`resn` pattern: a double-quoted string taken verbatim, or a run of pattern
    /// characters.
    pub(crate) fn pattern(&mut self) -> Result<String> {
        self.skip_whitespace();
        let start = self.i;
        if self.peek() == Some('"') {
            self.i += 1;
            let text = self.eat_while(|c| c != '"');
            if self.bump() != Some('"') {
                return Err(SelectionError::syntax("unterminated string", start));
            }
            return Ok(text);
        }
        let text = self.eat_while(is_pattern_char);
        if text.is_empty() {
            return Err(SelectionError::syntax("expected a name pattern", start));
        }
        Ok(text)
    }

    /// A single alphanumeric character standing alone, as taken by `chain` and `alt`.
    pub(crate) fn single_char(&mut self, what: &str) -> Result<char> {
        self.skip_whitespace();
        let start = self.i;
        match self.peek() {
            Some(c) if c.is_ascii_alphanumeric() => {
                if self.peek_nth(1).is_some_and(is_word_char) {
                    return Err(SelectionError::syntax(
                        format!("{what} must be a single character"),
                        start,
                    ));
                }
                self.i += 1;
                Ok(c)
            }
            _ => Err(SelectionError::syntax(format!("expected a {what}"), start)),
        }
    }

    /// A run of ASCII letters, as taken by `elem`.
    pub(crate) fn letters(&mut self) -> String {
        self.skip_whitespace();
        self.eat_while(|c| c.is_ascii_alphabetic())
    }

    /// `-?digits`.  `None` (nothing consumed) if no integer starts here.
    pub(crate) fn integer(&mut self) -> Result<Option<i64>> {
        let start = self.i;
        let negative = self.peek() == Some('-');
        let first_digit = if negative { 1 } else { 0 };
        if !self.peek_nth(first_digit).is_some_and(|c| c.is_ascii_digit()) {
            return Ok(None);
        }
        if negative {
            self.i += 1;
        }
        let digits = self.eat_while(|c| c.is_ascii_digit());
        let text = if negative { format!("-{digits}") } else { digits };
        text.parse()
            .map(Some)
            .map_err(|e| SelectionError::InvalidValue {
                value: text,
                message: format!("{e}"),
                position: start,
            })
    }

    /// `-?digits(.digits)?` or `-?.digits`.  `None` (nothing consumed) if no number starts here.
    pub(crate) fn float(&mut self) -> Result<Option<f32>> {
        let start = self.i;
        let sign = usize::from(self.peek() == Some('-'));
        let starts_number = match self.peek_nth(sign) {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_nth(sign + 1).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        };
        if !starts_number {
            return Ok(None);
        }
        self.i += sign;
        let mut text = if sign == 1 { "-".to_string() } else { String::new() };
        text += &self.eat_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.i += 1;
            text.push('.');
            text += &self.eat_while(|c| c.is_ascii_digit());
        }
        text.parse()
            .map(Some)
            .map_err(|e| SelectionError::InvalidValue {
                value: text,
                message: format!("{e}"),
                position: start,
            })
    }

    /// `<`, `<=`, `>` or `>=`, after whitespace.
    pub(crate) fn comparison(&mut self) -> Option<CompareOp> {
        self.skip_whitespace();
        let op = match (self.peek(), self.peek_nth(1)) {
            (Some('<'), Some('=')) => CompareOp::Le,
            (Some('>'), Some('=')) => CompareOp::Ge,
            (Some('<'), _) => CompareOp::Lt,
            (Some('>'), _) => CompareOp::Gt,
            _ => return None,
        };
        self.i += if matches!(op, CompareOp::Le | CompareOp::Ge) { 2 } else { 1 };
        Some(op)
    }

    /// Consumes a range dash: `-` directly followed by the start of a number.
    pub(crate) fn range_dash(&mut self) -> bool {
        let continues = match self.peek_nth(1) {
            Some(c) if c.is_ascii_digit() || c == '.' => true,
            Some('-') => self.peek_nth(2).is_some_and(|c| c.is_ascii_digit() || c == '.'),
            _ => false,
        };
        if self.peek() == Some('-') && continues {
            self.i += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_whole_words() {
        let mut lexer = Lexer::new("  NAME CA");
        assert_eq!(lexer.peek_keyword(), Some((Keyword::Name, 6)));
        assert_eq!(Lexer::new("names").peek_keyword(), None);
        assert_eq!(
            Lexer::new("polar_hydrogen").peek_keyword(),
            Some((Keyword::PolarHydrogen, 14))
        );
        assert_eq!(Lexer::new("polarh").peek_keyword().map(|k| k.0), Some(Keyword::PolarHydrogen));
        assert_eq!(Lexer::new("(").peek_keyword(), None);
    }

    #[test]
    fn patterns() {
        let mut lexer = Lexer::new(" C5'+N*");
        assert_eq!(lexer.pattern().unwrap(), "C5'");
        assert!(lexer.eat_char('+'));
        assert_eq!(lexer.pattern().unwrap(), "N*");
        assert!(lexer.at_end());

        assert_eq!(Lexer::new("\"C A\"").pattern().unwrap(), "C A");
        assert_eq!(Lexer::new("\"CA").pattern().unwrap_err().position(), Some(0));
        assert!(Lexer::new(")").pattern().is_err());
    }

    #[test]
    fn numbers() {
        let mut lexer = Lexer::new("-5--1");
        assert_eq!(lexer.integer().unwrap(), Some(-5));
        assert!(lexer.range_dash());
        assert_eq!(lexer.integer().unwrap(), Some(-1));

        assert_eq!(Lexer::new("abc").integer().unwrap(), None);
        assert_eq!(Lexer::new("-").integer().unwrap(), None);
        assert!(matches!(
            Lexer::new("99999999999999999999").integer(),
            Err(SelectionError::InvalidValue { .. })
        ));

        assert_eq!(Lexer::new("2.5").float().unwrap(), Some(2.5));
        assert_eq!(Lexer::new(".5").float().unwrap(), Some(0.5));
        assert_eq!(Lexer::new("-3").float().unwrap(), Some(-3.0));
        assert_eq!(Lexer::new("x").float().unwrap(), None);

        let mut lexer = Lexer::new("4.");
        assert_eq!(lexer.float().unwrap(), Some(4.0));
        assert_eq!(lexer.peek(), Some('.'));
    }

    #[test]
    fn comparison_operators() {
        let mut lexer = Lexer::new(" <= 3");
        assert_eq!(lexer.comparison(), Some(CompareOp::Le));
        assert_eq!(lexer.position(), 3);
        assert_eq!(Lexer::new(">3").comparison(), Some(CompareOp::Gt));
        assert_eq!(Lexer::new("3").comparison(), None);
    }

    #[test]
    fn single_characters() {
        assert_eq!(Lexer::new(" A").single_char("chain id").unwrap(), 'A');
        assert_eq!(Lexer::new("A)").single_char("chain id").unwrap(), 'A');
        assert!(Lexer::new("AB").single_char("chain id").is_err());
        assert!(Lexer::new("").single_char("chain id").is_err());
    }
}

// End of File
