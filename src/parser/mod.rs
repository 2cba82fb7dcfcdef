// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Selection text to predicate tree.
//!
//! A Pratt parser.  `not` is a prefix operator binding tighter than every binary operator, and
//! the binary operators bind `and` > `or` > `xor`.  A run of the same binary operator at one
//! nesting level collapses into a single n-ary node with its operands in source order.
//! Distance and expansion keywords take their argument at prefix strength, so
//! `around 5 name CA and protein` means `(around 5 name CA) and protein`.

mod lexer;

use std::sync::Arc;

use periodic_table::Element;

use crate::config::SelectionConfig;
use crate::error::{Result, SelectionError};
use crate::predicate::{is_pattern_char, Comparison, NamePattern, Predicate, PredicateRef};
use lexer::{CompareOp, Keyword, Lexer};

/// Binding power of prefix operators and keyword arguments.
const NOT_BP: u8 = 40;

pub fn parse(text: &str) -> Result<PredicateRef> {
    parse_with(text, &SelectionConfig::default())
}

pub fn parse_with(text: &str, config: &SelectionConfig) -> Result<PredicateRef> {
    Parser::new(text, config).parse()
}

struct Parser<'c> {
    lexer: Lexer,
    config: &'c SelectionConfig,
    depth: usize,
}

impl<'c> Parser<'c> {
    fn new(text: &str, config: &'c SelectionConfig) -> Self {
        Self {
            lexer: Lexer::new(text),
            config,
            depth: 0,
        }
    }

    fn parse(&mut self) -> Result<PredicateRef> {
        if self.lexer.at_end() {
            return Ok(Predicate::all());
        }
        let root = self.parse_bp(0)?;
        if !self.lexer.at_end() {
            let at = self.lexer.position();
            let message = match self.lexer.peek() {
                Some(')') => "unmatched ')'".to_string(),
                Some(c) => format!("unexpected {c:?}"),
                None => "unexpected end of selection".to_string(),
            };
            return Err(SelectionError::syntax(message, at));
        }
        Ok(root)
    }

    // binding powers: (left_bp, right_bp)
    fn infix_binding_power(op: Keyword) -> Option<(u8, u8)> {
        match op {
            Keyword::And => Some((30, 31)),
            Keyword::Or => Some((20, 21)),
            Keyword::Xor => Some((10, 11)),
            _ => None,
        }
    }

    fn parse_bp(&mut self, min_bp: u8) -> Result<PredicateRef> {
        self.depth += 1;
        if self.depth > self.config.max_parse_depth {
            return Err(SelectionError::syntax(
                format!("selection nested deeper than {}", self.config.max_parse_depth),
                self.lexer.position(),
            ));
        }

        let mut lhs = self.parse_prefix()?;

        loop {
            let Some((op, end)) = self.lexer.peek_keyword() else {
                break;
            };
            let Some((lbp, rbp)) = Self::infix_binding_power(op) else {
                break;
            };
            if lbp < min_bp {
                break;
            }

            let mut operands = vec![lhs];
            self.lexer.advance_to(end);
            operands.push(self.parse_bp(rbp)?);
            while let Some((next, end)) = self.lexer.peek_keyword() {
                if next != op {
                    break;
                }
                self.lexer.advance_to(end);
                operands.push(self.parse_bp(rbp)?);
            }
            lhs = reduce(op, operands)?;
        }

        self.depth -= 1;
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<PredicateRef> {
        self.lexer.skip_whitespace();
        let start = self.lexer.position();

        if self.lexer.eat_char('(') {
            let inner = self.parse_bp(0)?;
            if !self.lexer.eat_char(')') {
                let at = self.lexer.position();
                let message = if self.lexer.peek().is_none() {
                    format!("unmatched '(' at offset {start}")
                } else {
                    "expected ')'".to_string()
                };
                return Err(SelectionError::syntax(message, at));
            }
            return Ok(inner);
        }

        if self.lexer.eat_str("//") {
            return self.parse_macro();
        }

        let Some((keyword, end)) = self.lexer.peek_keyword() else {
            let message = match (self.lexer.peek(), self.lexer.peek_word()) {
                (None, _) => "unexpected end of selection".to_string(),
                (Some(')'), _) => "unmatched ')'".to_string(),
                (_, Some((word, _))) => format!("unknown keyword {word:?}"),
                (Some(c), None) => format!("unexpected {c:?}"),
            };
            return Err(SelectionError::syntax(message, start));
        };
        self.lexer.advance_to(end);

        let node = match keyword {
            Keyword::And | Keyword::Or | Keyword::Xor => {
                return Err(SelectionError::syntax(
                    format!("expected a selection before '{}'", keyword.as_str()),
                    start,
                ));
            }
            Keyword::Not => Predicate::not(self.parse_bp(NOT_BP)?),
            Keyword::Name | Keyword::Resn => self.patterns(keyword)?,
            Keyword::Resi => Predicate::resi(self.int_test(keyword)?),
            Keyword::Index => Arc::new(Predicate::Index(self.int_test(keyword)?)),
            Keyword::Id => Arc::new(Predicate::Id(self.int_test(keyword)?)),
            Keyword::Fragment => Arc::new(Predicate::Fragment(self.int_test(keyword)?)),
            Keyword::BFactor => Arc::new(Predicate::BFactor(self.float_test(keyword)?)),
            Keyword::Chain => Predicate::chain(self.lexer.single_char("chain id")?),
            Keyword::Alt => Arc::new(Predicate::Alt(self.lexer.single_char("alternate location")?)),
            Keyword::Elem => Predicate::elem(self.element()?),
            Keyword::Protein => Arc::new(Predicate::Protein),
            Keyword::Ligand => Arc::new(Predicate::Ligand),
            Keyword::Water => Arc::new(Predicate::Water),
            Keyword::Solvent => Arc::new(Predicate::Solvent),
            Keyword::Organic => Arc::new(Predicate::Organic),
            Keyword::Backbone => Arc::new(Predicate::Backbone),
            Keyword::Sidechain => Arc::new(Predicate::Sidechain),
            Keyword::Metal => Arc::new(Predicate::Metal),
            Keyword::Heavy => Arc::new(Predicate::Heavy),
            Keyword::Hydrogen => Arc::new(Predicate::Hydrogen),
            Keyword::PolarHydrogen => Arc::new(Predicate::PolarHydrogen),
            Keyword::NonpolarHydrogen => Arc::new(Predicate::NonpolarHydrogen),
            Keyword::Helix => Arc::new(Predicate::Helix),
            Keyword::Sheet => Arc::new(Predicate::Sheet),
            Keyword::Turn => Arc::new(Predicate::Turn),
            Keyword::Loop => Arc::new(Predicate::Loop),
            Keyword::Around | Keyword::XAround | Keyword::Beyond => {
                let radius = self.radius(keyword)?;
                let reference = self.parse_bp(NOT_BP)?;
                match keyword {
                    Keyword::Around => Predicate::around(radius, reference),
                    Keyword::XAround => Predicate::xaround(radius, reference),
                    _ => Predicate::beyond(radius, reference),
                }
            }
            Keyword::ByRes => Predicate::byres(self.parse_bp(NOT_BP)?),
            Keyword::ByChain => Predicate::bychain(self.parse_bp(NOT_BP)?),
            Keyword::All => Predicate::all(),
            Keyword::None => Predicate::none(),
        };
        Ok(node)
    }

    /// `//chain/resi/name`, with `//` already consumed.  Every slot may be empty and trailing
    /// slots may be left off.
    fn parse_macro(&mut self) -> Result<PredicateRef> {
        let mut parts = Vec::new();

        if self.lexer.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            parts.push(Predicate::chain(self.lexer.single_char("chain id")?));
        }
        if self.lexer.peek() == Some('/') {
            self.lexer.bump();
            if self.lexer.peek().is_some_and(|c| c == '-' || c.is_ascii_digit()) {
                let first = self.integer(Keyword::Resi)?;
                let test = if self.lexer.range_dash() {
                    Comparison::Range(first, self.integer(Keyword::Resi)?)
                } else {
                    Comparison::Eq(first)
                };
                parts.push(Predicate::resi(test));
            }
            if self.lexer.peek() == Some('/') {
                self.lexer.bump();
                if self.lexer.peek().is_some_and(|c| c == '"' || is_pattern_char(c)) {
                    parts.push(self.patterns(Keyword::Name)?);
                }
            }
        }

        Ok(match parts.len() {
            0 => Predicate::all(),
            1 => parts.remove(0),
            _ => Predicate::and(parts),
        })
    }

    /// A `+`-separated list of patterns; two or more become an `or`.
    fn patterns(&mut self, keyword: Keyword) -> Result<PredicateRef> {
        let mut alternatives = Vec::new();
        loop {
            self.lexer.skip_whitespace();
            let at = self.lexer.position();
            let pattern = NamePattern::new(self.lexer.pattern()?).map_err(|e| {
                SelectionError::syntax(format!("invalid pattern: {}", e.msg), at + e.pos)
            })?;
            alternatives.push(Arc::new(match keyword {
                Keyword::Resn => Predicate::Resn(pattern),
                _ => Predicate::Name(pattern),
            }));
            if !self.lexer.eat_char('+') {
                break;
            }
        }
        Ok(if alternatives.len() == 1 {
            alternatives.remove(0)
        } else {
            Predicate::or(alternatives)
        })
    }

    fn int_test(&mut self, keyword: Keyword) -> Result<Comparison<i64>> {
        self.comparison(keyword, Self::integer)
    }

    fn float_test(&mut self, keyword: Keyword) -> Result<Comparison<f32>> {
        self.comparison(keyword, Self::number)
    }

    /// `V`, `< V`, `<= V`, `> V`, `>= V` or `V-W`.
    fn comparison<T>(
        &mut self,
        keyword: Keyword,
        value: fn(&mut Self, Keyword) -> Result<T>,
    ) -> Result<Comparison<T>> {
        if let Some(op) = self.lexer.comparison() {
            self.lexer.skip_whitespace();
            let v = value(self, keyword)?;
            return Ok(match op {
                CompareOp::Lt => Comparison::Lt(v),
                CompareOp::Le => Comparison::Le(v),
                CompareOp::Gt => Comparison::Gt(v),
                CompareOp::Ge => Comparison::Ge(v),
            });
        }
        self.lexer.skip_whitespace();
        let first = value(self, keyword)?;
        if self.lexer.range_dash() {
            let last = value(self, keyword)?;
            return Ok(Comparison::Range(first, last));
        }
        Ok(Comparison::Eq(first))
    }

    fn integer(&mut self, keyword: Keyword) -> Result<i64> {
        let at = self.lexer.position();
        self.lexer.integer()?.ok_or_else(|| {
            SelectionError::syntax(
                format!("expected an integer after '{}'", keyword.as_str()),
                at,
            )
        })
    }

    fn number(&mut self, keyword: Keyword) -> Result<f32> {
        let at = self.lexer.position();
        self.lexer.float()?.ok_or_else(|| {
            SelectionError::syntax(
                format!("expected a number after '{}'", keyword.as_str()),
                at,
            )
        })
    }

    fn radius(&mut self, keyword: Keyword) -> Result<f32> {
        self.lexer.skip_whitespace();
        let at = self.lexer.position();
        self.lexer.float()?.ok_or_else(|| {
            SelectionError::syntax(
                format!("expected a distance after '{}'", keyword.as_str()),
                at,
            )
        })
    }

    fn element(&mut self) -> Result<Element> {
        self.lexer.skip_whitespace();
        let at = self.lexer.position();
        let symbol = self.lexer.letters();
        if symbol.is_empty() || symbol.len() > 2 {
            return Err(SelectionError::syntax("expected an element symbol", at));
        }
        Element::from_symbol(&symbol)
            .ok_or_else(|| SelectionError::syntax(format!("unknown element {symbol:?}"), at))
    }
}

/// Combines the operands collected for one operator into a single node.
fn reduce(op: Keyword, mut operands: Vec<PredicateRef>) -> Result<PredicateRef> {
    match operands.len() {
        0 => Err(SelectionError::Internal(format!(
            "operand stack underflow applying '{}'",
            op.as_str()
        ))),
        1 => Ok(operands.remove(0)),
        _ => match op {
            Keyword::And => Ok(Predicate::and(operands)),
            Keyword::Or => Ok(Predicate::or(operands)),
            Keyword::Xor => Ok(Predicate::xor(operands)),
            other => Err(SelectionError::Internal(format!(
                "'{}' is not a binary operator",
                other.as_str()
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::PredicateKind;

    fn canonical(text: &str) -> String {
        parse(text).unwrap().to_canonical()
    }

    #[test]
    fn empty_input_selects_everything() {
        assert_eq!(parse("").unwrap().kind(), PredicateKind::True);
        assert_eq!(parse("   \t").unwrap().kind(), PredicateKind::True);
    }

    #[test]
    fn precedence() {
        assert_eq!(
            canonical("name A or name B and name C"),
            "((name B and name C) or name A)"
        );
        assert_eq!(
            canonical("name A xor name B or name C"),
            "((name B or name C) xor name A)"
        );
        assert_eq!(
            canonical("not name A and name B"),
            "(name B and not name A)"
        );
        assert_eq!(canonical("not not name A"), "not not name A");
    }

    #[test]
    fn operator_runs_flatten() {
        let tree = parse("name A and name B and name C").unwrap();
        assert_eq!(tree.kind(), PredicateKind::And);
        assert_eq!(tree.children().len(), 3);
        assert_eq!(tree.children()[0].to_canonical(), "name A");
        assert_eq!(tree.children()[2].to_canonical(), "name C");

        let tree = parse("(name A and name B) and (name C and name D)").unwrap();
        assert_eq!(tree.children().len(), 2);
    }

    #[test]
    fn keyword_arguments_bind_like_not() {
        assert_eq!(
            canonical("around 5 name CA and protein"),
            "(around 5 name CA and protein)"
        );
        assert_eq!(
            canonical("around 5 (name CA and protein)"),
            "around 5 (name CA and protein)"
        );
        assert_eq!(canonical("byres not water"), "byres not water");
        assert_eq!(
            canonical("bychain around 3.5 byres ligand"),
            "bychain around 3.5 byres ligand"
        );
    }

    #[test]
    fn leaves() {
        assert_eq!(canonical("NAME CA+CB"), "(name CA or name CB)");
        assert_eq!(canonical("resn \"A B\""), "resn \"A B\"");
        assert_eq!(canonical("resi >= -3"), "resi >= -3");
        assert_eq!(canonical("resi -5--1"), "resi -5--1");
        assert_eq!(canonical("b 10-20.5"), "bfactor 10-20.5");
        assert_eq!(canonical("b < 30.0"), "bfactor < 30");
        assert_eq!(canonical("frag 2"), "fragment 2");
        assert_eq!(canonical("elem fe"), "elem Fe");
        assert_eq!(canonical("alt A"), "alt A");
        assert_eq!(canonical("bb or sc"), "(backbone or sidechain)");
        assert_eq!(canonical("h or polarh or apolarh"), "(hydrogen or nonpolar_hydrogen or polar_hydrogen)");
        assert_eq!(canonical("metals"), "metal");
        assert_eq!(canonical("all or none"), "(all or none)");
    }

    #[test]
    fn hierarchical_macro() {
        assert_eq!(canonical("//A/10/CA"), "(chain A and name CA and resi 10)");
        assert_eq!(canonical("///CA"), "name CA");
        assert_eq!(canonical("//A//CA"), "(chain A and name CA)");
        assert_eq!(canonical("//A"), "chain A");
        assert_eq!(canonical("//B/5-9"), "(chain B and resi 5-9)");
        assert_eq!(canonical("//"), "all");
        assert_eq!(canonical("// and water"), "(all and water)");
    }

    #[test]
    fn syntax_errors_carry_offsets() {
        let position = |text: &str| parse(text).unwrap_err().position();
        assert_eq!(position("name"), Some(4));
        assert_eq!(position("names CA"), Some(0));
        assert_eq!(position("protein and"), Some(11));
        assert_eq!(position("(protein"), Some(8));
        assert_eq!(position("protein)"), Some(7));
        assert_eq!(position("resi x"), Some(5));
        assert_eq!(position("around name CA"), Some(7));
        assert_eq!(position("elem Xx"), Some(5));
        assert_eq!(position("chain AB"), Some(6));
        assert_eq!(position("and protein"), Some(0));
        assert_eq!(position("protein water"), Some(8));
    }

    #[test]
    fn oversized_integers_are_invalid_values() {
        assert!(matches!(
            parse("resi 99999999999999999999"),
            Err(SelectionError::InvalidValue { position: 5, .. })
        ));
    }

    #[test]
    fn nesting_is_bounded() {
        let config = SelectionConfig {
            max_parse_depth: 4,
            ..SelectionConfig::default()
        };
        assert!(parse_with("((water))", &config).is_ok());
        assert!(parse_with("((((((water))))))", &config).is_err());

        let deep = format!("{}water{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(parse(&deep).is_err());
    }

    #[test]
    fn reduce_rejects_empty_operand_lists() {
        let err = reduce(Keyword::And, Vec::new()).unwrap_err();
        assert!(err.is_internal());
        assert!(reduce(Keyword::Not, vec![Predicate::all(), Predicate::all()])
            .unwrap_err()
            .is_internal());
    }
}

// End of File
