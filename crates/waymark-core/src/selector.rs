#![forbid(unsafe_code)]

//! A small CSS selector subset.
//!
//! Supported: type (`div`), id (`#intro`), class (`.step`), attribute presence
//! (`[data-tour]`) and equality (`[data-tour="next"]`), compound selectors
//! (`button.primary#go`), descendant (`a b`) and child (`a > b`) combinators,
//! and selector lists (`a, b`). Anything else is rejected with a
//! [`SelectorError`], the same way a browser rejects a malformed selector.

use std::fmt;

use crate::document::ElementId;

/// Error produced when a selector string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector (or one entry of a list) was blank.
    Empty,
    /// A character that cannot start or continue a selector token.
    UnexpectedChar { ch: char, offset: usize },
    /// Input ended in the middle of a token.
    UnexpectedEnd,
    /// Valid CSS the subset does not implement (pseudo-classes, `+`, `~`).
    Unsupported(String),
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::UnexpectedChar { ch, offset } => {
                write!(f, "unexpected `{ch}` at offset {offset}")
            }
            Self::UnexpectedEnd => write!(f, "unexpected end of selector"),
            Self::Unsupported(what) => write!(f, "unsupported selector syntax: {what}"),
        }
    }
}

impl std::error::Error for SelectorError {}

/// Read access to a node tree, enough to evaluate a selector.
pub(crate) trait SelectorTree {
    fn tag(&self, node: ElementId) -> &str;
    fn has_class(&self, node: ElementId, class: &str) -> bool;
    fn attribute(&self, node: ElementId, name: &str) -> Option<&str>;
    fn parent(&self, node: ElementId) -> Option<ElementId>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrMatch {
    Exists(String),
    Equals(String, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches<T: SelectorTree + ?Sized>(&self, tree: &T, node: ElementId) -> bool {
        if let Some(tag) = &self.tag
            && tag != "*"
            && !tree.tag(node).eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && tree.attribute(node, "id") != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| tree.has_class(node, c)) {
            return false;
        }
        self.attrs.iter().all(|attr| match attr {
            AttrMatch::Exists(name) => tree.attribute(node, name).is_some(),
            AttrMatch::Equals(name, value) => tree.attribute(node, name) == Some(value.as_str()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One alternative of a selector list: compounds joined by combinators.
/// `links[i]` relates `compounds[i]` to `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    links: Vec<Combinator>,
}

impl Complex {
    fn matches<T: SelectorTree + ?Sized>(&self, tree: &T, node: ElementId) -> bool {
        let last = self.compounds.len() - 1;
        self.compounds[last].matches(tree, node) && self.matches_ancestors(tree, last, node)
    }

    /// `compounds[idx]` already matched `node`; check everything left of it.
    fn matches_ancestors<T: SelectorTree + ?Sized>(
        &self,
        tree: &T,
        idx: usize,
        node: ElementId,
    ) -> bool {
        if idx == 0 {
            return true;
        }
        let want = &self.compounds[idx - 1];
        match self.links[idx - 1] {
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|p| want.matches(tree, p) && self.matches_ancestors(tree, idx - 1, p)),
            Combinator::Descendant => {
                let mut cursor = tree.parent(node);
                while let Some(p) = cursor {
                    if want.matches(tree, p) && self.matches_ancestors(tree, idx - 1, p) {
                        return true;
                    }
                    cursor = tree.parent(p);
                }
                false
            }
        }
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    /// Parse `input`.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    pub(crate) fn matches<T: SelectorTree + ?Sized>(&self, tree: &T, node: ElementId) -> bool {
        self.alternatives.iter().any(|c| c.matches(tree, node))
    }
}

struct Parser<'a> {
    chars: Vec<(usize, char)>,
    pos: usize,
    input: &'a str,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().collect(),
            pos: 0,
            input,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map_or(self.input.len(), |&(o, _)| o)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar {
                ch,
                offset: self.offset(),
            },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_char(c)) {
            out.push(c);
            self.pos += 1;
        }
        if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.unexpected());
        }
        Ok(out)
    }

    fn parse_list(&mut self) -> Result<Selector, SelectorError> {
        let mut alternatives = Vec::new();
        loop {
            alternatives.push(self.parse_complex()?);
            match self.bump() {
                None => break,
                Some(',') => continue,
                Some(_) => {
                    self.pos -= 1;
                    return Err(self.unexpected());
                }
            }
        }
        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_ws();
        let mut compounds = vec![self.parse_compound()?];
        let mut links = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let link = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    Combinator::Child
                }
                Some(c @ ('+' | '~')) => {
                    return Err(SelectorError::Unsupported(format!("`{c}` combinator")));
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            links.push(link);
            compounds.push(self.parse_compound()?);
        }
        Ok(Complex { compounds, links })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                compound.tag = Some("*".into());
            }
            Some(c) if is_ident_char(c) => compound.tag = Some(self.ident()?),
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.parse_attr()?);
                }
                Some(':') => return Err(SelectorError::Unsupported("pseudo-class".into())),
                _ => break,
            }
        }
        if compound.is_empty() {
            return Err(match self.peek() {
                None | Some(',') if self.chars.iter().all(|(_, c)| c.is_whitespace() || *c == ',') => {
                    SelectorError::Empty
                }
                _ => self.unexpected(),
            });
        }
        Ok(compound)
    }

    fn parse_attr(&mut self) -> Result<AttrMatch, SelectorError> {
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();
        match self.bump() {
            Some(']') => Ok(AttrMatch::Exists(name)),
            Some('=') => {
                self.skip_ws();
                let value = match self.peek() {
                    Some(q @ ('"' | '\'')) => {
                        self.pos += 1;
                        let mut value = String::new();
                        loop {
                            match self.bump() {
                                Some(c) if c == q => break,
                                Some(c) => value.push(c),
                                None => return Err(SelectorError::UnexpectedEnd),
                            }
                        }
                        value
                    }
                    _ => self.ident()?,
                };
                self.skip_ws();
                match self.bump() {
                    Some(']') => Ok(AttrMatch::Equals(name, value)),
                    Some(_) => {
                        self.pos -= 1;
                        Err(self.unexpected())
                    }
                    None => Err(SelectorError::UnexpectedEnd),
                }
            }
            Some(_) => {
                self.pos -= 1;
                Err(self.unexpected())
            }
            None => Err(SelectorError::UnexpectedEnd),
        }
    }
}
