//! Selector parsing and matching.
//!
//! Selectors pick the nodes a listener is interested in:
//!
//! ```text
//! list                               every list
//! list[ordered=false]                unordered lists
//! list[ordered=false] > listItem     items of unordered lists
//! blockquote code                    code anywhere inside a blockquote
//! list:exit                          lists, after their children were walked
//! ```
//!
//! Attribute names and literal kinds are checked against the node type's
//! schema when the selector is parsed, so a selector that parses can never
//! fail while a document is being walked.

use std::fmt;
use std::str::FromStr;

use mdstyle_ast::{AttrKind, AttrValue, Node, NodeType};

use crate::SelectorError;

/// When a listener fires relative to a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Before the children are walked.
    Enter,
    /// After every child has been walked.
    Exit,
}

/// A literal on the right-hand side of an attribute predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Literal {
    fn matches(&self, value: AttrValue<'_>) -> bool {
        match (self, value) {
            (Literal::Bool(a), AttrValue::Bool(b)) => *a == b,
            (Literal::Int(a), AttrValue::Int(b)) => *a == b,
            (Literal::Str(a), AttrValue::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// `[name=literal]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrPredicate {
    pub name: String,
    pub value: Literal,
}

/// A type name plus zero or more attribute predicates, e.g. `list[ordered=false]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    pub node_type: NodeType,
    pub predicates: Vec<AttrPredicate>,
}

impl Compound {
    /// Returns true if `node` has this type and satisfies every predicate.
    ///
    /// An absent optional attribute never satisfies a predicate.
    pub fn matches(&self, node: &Node<'_>) -> bool {
        node.node_type == self.node_type
            && self.predicates.iter().all(|p| {
                node.attribute(&p.name)
                    .is_some_and(|value| p.value.matches(value))
            })
    }
}

/// How a compound relates to the compound on its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A > B`: the parent matches `A`.
    Child,
    /// `A B`: some ancestor matches `A`.
    Descendant,
}

/// A parsed selector.
///
/// `compounds[i]` and `compounds[i + 1]` are joined by `combinators[i]`.
/// The last compound is the subject: the node a listener receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
    phase: Phase,
}

impl Selector {
    /// Parses a selector string.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(input).parse()
    }

    /// The phase this selector fires in.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The node type of the subject compound.
    #[inline]
    pub fn subject_type(&self) -> NodeType {
        // `parse` never produces an empty compound list.
        self.compounds
            .last()
            .map_or(NodeType::Root, |compound| compound.node_type)
    }

    /// Returns true if `node`, whose ancestors are given root-first, matches.
    ///
    /// The phase is not consulted here; listeners are indexed by phase
    /// before matching.
    pub fn matches(&self, node: &Node<'_>, ancestors: &[&Node<'_>]) -> bool {
        match self.compounds.len().checked_sub(1) {
            Some(last) => self.matches_from(last, node, ancestors),
            None => false,
        }
    }

    fn matches_from(&self, index: usize, node: &Node<'_>, ancestors: &[&Node<'_>]) -> bool {
        if !self.compounds[index].matches(node) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match self.combinators[index - 1] {
            Combinator::Child => match ancestors.split_last() {
                Some((parent, rest)) => self.matches_from(index - 1, parent, rest),
                None => false,
            },
            Combinator::Descendant => (0..ancestors.len())
                .rev()
                .any(|i| self.matches_from(index - 1, ancestors[i], &ancestors[..i])),
        }
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, compound) in self.compounds.iter().enumerate() {
            if i > 0 {
                match self.combinators[i - 1] {
                    Combinator::Child => f.write_str(" > ")?,
                    Combinator::Descendant => f.write_str(" ")?,
                }
            }
            write!(f, "{}", compound.node_type)?;
            for p in &compound.predicates {
                write!(f, "[{}={}]", p.name, p.value)?;
            }
        }
        if self.phase == Phase::Exit {
            f.write_str(":exit")?;
        }
        Ok(())
    }
}

struct SelectorParser<'s> {
    input: &'s str,
    pos: usize,
}

impl<'s> SelectorParser<'s> {
    fn new(input: &'s str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(mut self) -> Result<Selector, SelectorError> {
        self.skip_whitespace();
        if self.at_end() {
            return Err(SelectorError::Empty);
        }

        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        let mut phase = Phase::Enter;

        loop {
            if self.peek() == Some(':') {
                self.bump();
                let name = self.word();
                if name != "exit" {
                    return Err(SelectorError::UnknownPseudo(name.to_string()));
                }
                phase = Phase::Exit;
                self.skip_whitespace();
                if let Some(found) = self.peek() {
                    return Err(self.unexpected(found));
                }
                break;
            }

            let had_space = self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    combinators.push(Combinator::Child);
                }
                Some(_) if had_space => combinators.push(Combinator::Descendant),
                Some(found) => return Err(self.unexpected(found)),
            }

            if self.at_end() {
                return Err(SelectorError::UnexpectedEnd(self.input.to_string()));
            }
            compounds.push(self.compound()?);
        }

        Ok(Selector {
            compounds,
            combinators,
            phase,
        })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let name = self.word();
        if name.is_empty() {
            return Err(match self.peek() {
                Some(found) => self.unexpected(found),
                None => SelectorError::UnexpectedEnd(self.input.to_string()),
            });
        }
        let node_type: NodeType = name.parse()?;

        let mut predicates = Vec::new();
        while self.peek() == Some('[') {
            self.bump();
            predicates.push(self.predicate(node_type)?);
        }

        Ok(Compound {
            node_type,
            predicates,
        })
    }

    /// Parses `name=literal]`; the opening bracket is already consumed.
    fn predicate(&mut self, node_type: NodeType) -> Result<AttrPredicate, SelectorError> {
        self.skip_whitespace();
        let name = self.word();
        if name.is_empty() {
            return Err(self.unexpected_or_end());
        }
        let kind = node_type
            .attribute_kind(name)
            .ok_or_else(|| SelectorError::UnknownAttribute {
                node_type,
                attribute: name.to_string(),
            })?;

        self.skip_whitespace();
        self.expect('=')?;
        self.skip_whitespace();

        let (raw, quoted) = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                (self.quoted(quote)?, true)
            }
            Some(_) => (self.bare(), false),
            None => return Err(SelectorError::UnexpectedEnd(self.input.to_string())),
        };
        if raw.is_empty() && !quoted {
            return Err(self.unexpected_or_end());
        }

        self.skip_whitespace();
        self.expect(']')?;

        let value = coerce(raw, quoted, kind).ok_or_else(|| SelectorError::LiteralKind {
            node_type,
            attribute: name.to_string(),
            expected: kind,
            literal: raw.to_string(),
        })?;

        Ok(AttrPredicate {
            name: name.to_string(),
            value,
        })
    }

    fn quoted(&mut self, quote: char) -> Result<&'s str, SelectorError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == quote {
                let value = &self.input[start..self.pos];
                self.bump();
                return Ok(value);
            }
            self.bump();
        }
        Err(SelectorError::UnexpectedEnd(self.input.to_string()))
    }

    fn bare(&mut self) -> &'s str {
        self.take_while(|c| !c.is_whitespace() && !matches!(c, ']' | '[' | '"' | '\''))
    }

    fn word(&mut self) -> &'s str {
        self.take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'s str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.input[start..self.pos]
    }

    fn skip_whitespace(&mut self) -> bool {
        !self.take_while(char::is_whitespace).is_empty()
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            _ => Err(self.unexpected_or_end()),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::UnexpectedChar {
            selector: self.input.to_string(),
            offset: self.pos,
            found,
        }
    }

    fn unexpected_or_end(&self) -> SelectorError {
        match self.peek() {
            Some(found) => self.unexpected(found),
            None => SelectorError::UnexpectedEnd(self.input.to_string()),
        }
    }
}

/// Interprets a literal as `kind`. Quoted literals are always strings.
fn coerce(raw: &str, quoted: bool, kind: AttrKind) -> Option<Literal> {
    match (kind, quoted) {
        (AttrKind::Str, _) => Some(Literal::Str(raw.to_string())),
        (_, true) => None,
        (AttrKind::Bool, false) => match raw {
            "true" => Some(Literal::Bool(true)),
            "false" => Some(Literal::Bool(false)),
            _ => None,
        },
        (AttrKind::Int, false) => raw.parse().ok().map(Literal::Int),
    }
}
