//! Password strength scoring and the meter below `#password`.

use std::fmt;

use crate::dom::{Document, Element, NodeId};

/// Strength buckets shown by the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl Strength {
    /// Bucket for a score: ≤3 weak, ≤5 medium, above that strong.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=3 => Self::Weak,
            4..=5 => Self::Medium,
            _ => Self::Strong,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }

    /// State class added to the meter container.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score a password from 0 to 6.
///
/// One point each for length over 7 and over 11 characters, and one per
/// character class present: lowercase, uppercase, digit, symbol. Classes are
/// ASCII; anything outside `[a-zA-Z0-9]` counts as a symbol.
#[must_use]
pub fn score(password: &str) -> u8 {
    let length = password.chars().count();
    let checks = [
        length > 7,
        length > 11,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    checks.into_iter().map(u8::from).sum()
}

/// Classify a password; empty input has no label.
#[must_use]
pub fn classify(password: &str) -> Option<Strength> {
    if password.is_empty() {
        None
    } else {
        Some(Strength::from_score(score(password)))
    }
}

/// The meter elements inserted after the password input.
#[derive(Debug, Clone, Copy)]
pub struct StrengthMeter {
    container: NodeId,
    text: NodeId,
}

impl StrengthMeter {
    /// Insert the meter right after `input`.
    pub fn install(doc: &mut Document, input: NodeId) -> Self {
        let container = doc.insert_after(input, Element::new("div").with_class("password-strength"));
        doc.append(container, Element::new("div").with_class("password-strength-bar"));
        let text = doc.append(
            container,
            Element::new("div").with_class("password-strength-text"),
        );
        Self { container, text }
    }

    /// Reset the meter and show the bucket for `password`.
    pub fn update(&self, doc: &mut Document, password: &str) -> Option<Strength> {
        let strength = classify(password);
        doc[self.container].set_class_name("password-strength");
        doc[self.text].set_text(strength.map_or("", Strength::label));
        if let Some(strength) = strength {
            doc[self.container].add_class(strength.css_class());
        }
        strength
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn label_node(&self) -> NodeId {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_examples() {
        assert_eq!(score(""), 0);
        assert_eq!(score("abc"), 1);
        assert_eq!(score("abcABC123!"), 5);
        assert_eq!(score("abcABC123!xyz"), 6);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("abc"), Some(Strength::Weak));
        assert_eq!(classify("abcdefgh1"), Some(Strength::Weak));
        assert_eq!(classify("abcdEFG1"), Some(Strength::Medium));
        // Ten characters with all four classes scores 5; strong needs over 11.
        assert_eq!(classify("abcABC123!"), Some(Strength::Medium));
        assert_eq!(classify("abcABC123!xyz"), Some(Strength::Strong));
    }

    #[test]
    fn test_bucket_edges() {
        assert_eq!(Strength::from_score(3), Strength::Weak);
        assert_eq!(Strength::from_score(4), Strength::Medium);
        assert_eq!(Strength::from_score(5), Strength::Medium);
        assert_eq!(Strength::from_score(6), Strength::Strong);
    }

    #[test]
    fn test_non_ascii_counts_as_symbol() {
        assert_eq!(score("é"), 1);
        assert_eq!(score("aé"), 2);
    }

    #[test]
    fn test_meter_resets_state() {
        let mut doc = Document::new();
        let body = doc.body();
        let input = doc.append(body, Element::new("input").with_id("password"));
        let meter = StrengthMeter::install(&mut doc, input);

        meter.update(&mut doc, "abc");
        assert_eq!(doc[meter.container()].class_name(), "password-strength weak");
        assert_eq!(doc[meter.label_node()].text(), "Weak");

        meter.update(&mut doc, "");
        assert_eq!(doc[meter.container()].class_name(), "password-strength");
        assert_eq!(doc[meter.label_node()].text(), "");
    }
}
