//! Compound CSS selectors.
//!
//! Only what the page scripts need: an optional tag, `#id`, any number of
//! `.class` parts and attribute filters (`[name]`, `[name="v"]`,
//! `[name^="v"]`). Combinators are rejected.

use std::fmt;
use std::str::FromStr;

use crate::dom::Element;
use crate::error::DomError;

/// An attribute filter inside `[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeFilter {
    /// `[name]`
    Present(String),
    /// `[name="value"]`
    Equals(String, String),
    /// `[name^="value"]`
    Prefix(String, String),
}

impl AttributeFilter {
    fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Present(name) => element.attr(name).is_some(),
            Self::Equals(name, value) => element.attr(name) == Some(value.as_str()),
            Self::Prefix(name, value) => element
                .attr(name)
                .is_some_and(|actual| actual.starts_with(value.as_str())),
        }
    }
}

/// A parsed compound selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeFilter>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, DomError> {
        Parser::new(input).parse()
    }

    /// Whether the element satisfies every part of the selector.
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag() != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| element.has_class(c))
            && self.attributes.iter().all(|f| f.matches(element))
    }
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, "{tag}")?;
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for filter in &self.attributes {
            match filter {
                AttributeFilter::Present(name) => write!(f, "[{name}]")?,
                AttributeFilter::Equals(name, value) => write!(f, "[{name}=\"{value}\"]")?,
                AttributeFilter::Prefix(name, value) => write!(f, "[{name}^=\"{value}\"]")?,
            }
        }
        Ok(())
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::InvalidSelector {
            selector: self.input.to_string(),
            reason: reason.into(),
        }
    }

    fn parse(mut self) -> Result<Selector, DomError> {
        if self.input.trim().is_empty() {
            return Err(self.error("empty selector"));
        }

        let mut selector = Selector::default();
        if self.peek().is_some_and(is_ident_char) {
            selector.tag = Some(self.ident("tag name")?.to_ascii_lowercase());
        }

        while let Some(c) = self.peek() {
            match c {
                '#' => {
                    self.bump();
                    if selector.id.is_some() {
                        return Err(self.error("more than one id"));
                    }
                    selector.id = Some(self.ident("id")?);
                }
                '.' => {
                    self.bump();
                    selector.classes.push(self.ident("class name")?);
                }
                '[' => {
                    self.bump();
                    selector.attributes.push(self.attribute()?);
                }
                c if c.is_whitespace() || matches!(c, '>' | '+' | '~' | ',') => {
                    return Err(self.error("combinators are not supported"));
                }
                other => return Err(self.error(format!("unexpected character `{other}`"))),
            }
        }

        Ok(selector)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn ident(&mut self, what: &str) -> Result<String, DomError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        if out.is_empty() {
            return Err(self.error(format!("expected {what}")));
        }
        Ok(out)
    }

    fn attribute(&mut self) -> Result<AttributeFilter, DomError> {
        let name = self.ident("attribute name")?;
        match self.bump() {
            Some(']') => Ok(AttributeFilter::Present(name)),
            Some('=') => {
                let value = self.attribute_value()?;
                Ok(AttributeFilter::Equals(name, value))
            }
            Some('^') => {
                if self.bump() != Some('=') {
                    return Err(self.error("expected `=` after `^`"));
                }
                let value = self.attribute_value()?;
                Ok(AttributeFilter::Prefix(name, value))
            }
            _ => Err(self.error("unterminated attribute filter")),
        }
    }

    fn attribute_value(&mut self) -> Result<String, DomError> {
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let mut out = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => break,
                        Some(c) => out.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
                out
            }
            _ => self.ident("attribute value")?,
        };
        if self.bump() != Some(']') {
            return Err(self.error("expected `]`"));
        }
        Ok(value)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound() {
        let sel = Selector::parse("button.send-btn[type=\"submit\"]").unwrap();
        assert_eq!(sel.to_string(), "button.send-btn[type=\"submit\"]");

        let button = Element::new("button")
            .with_class("send-btn")
            .with_attr("type", "submit");
        assert!(sel.matches(&button));
        assert!(!sel.matches(&Element::new("button").with_class("send-btn")));
    }

    #[test]
    fn test_prefix_filter() {
        let sel: Selector = "a[href^='#']".parse().unwrap();
        assert!(sel.matches(&Element::new("a").with_attr("href", "#features")));
        assert!(!sel.matches(&Element::new("a").with_attr("href", "/about")));
        assert!(!sel.matches(&Element::new("a")));
    }

    #[test]
    fn test_id_selector() {
        let sel = Selector::parse("#chatMessages").unwrap();
        assert!(sel.matches(&Element::new("div").with_id("chatMessages")));
        assert!(!sel.matches(&Element::new("div").with_id("chat")));
    }

    #[test]
    fn test_rejects_invalid() {
        for input in ["", "#", ".", "a b", "div > p", "[href", "a[href^x]", "#a#b", "a:hover"] {
            assert!(
                matches!(Selector::parse(input), Err(DomError::InvalidSelector { .. })),
                "{input:?} should be rejected"
            );
        }
    }
}
