//! English noun lemmatization for product types
//!
//! Reduces a product type to its singular dictionary form so "Strawberries"
//! and "Strawberry" land on the same vocabulary node. Rule-based: an
//! irregular table first, then ordered suffix rules applied to the tail of
//! the string (which also handles the last word of multi-word types like
//! "Chicken Breasts"). Lemmatization is idempotent: applying it to an
//! already-singular form is a no-op.

use std::collections::HashMap;

/// Rule-based English singularizer
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregulars: HashMap<&'static str, &'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    pub fn new() -> Self {
        // Irregular plurals and -ves words the suffix rules would mangle
        let irregulars: HashMap<&'static str, &'static str> = [
            ("leaves", "leaf"),
            ("loaves", "loaf"),
            ("halves", "half"),
            ("knives", "knife"),
            ("calves", "calf"),
            ("shelves", "shelf"),
            ("children", "child"),
            ("men", "man"),
            ("women", "woman"),
            ("mice", "mouse"),
            ("geese", "goose"),
            ("feet", "foot"),
            ("teeth", "tooth"),
            ("buses", "bus"),
            ("gases", "gas"),
            // -ies words whose singular ends in -ie, not -y
            ("cookies", "cookie"),
            ("brownies", "brownie"),
            ("veggies", "veggie"),
            ("smoothies", "smoothie"),
            // Zero-plural nouns: already their own lemma
            ("fish", "fish"),
            ("sheep", "sheep"),
            ("deer", "deer"),
            ("salmon", "salmon"),
            ("tuna", "tuna"),
            ("shrimp", "shrimp"),
            ("series", "series"),
            ("species", "species"),
        ]
        .into_iter()
        .collect();

        Self { irregulars }
    }

    /// Reduce a word (or the last word of a phrase) to its singular form
    pub fn lemmatize(&self, word: &str) -> String {
        let trimmed = word.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        // Suffix rules slice at byte offsets; non-ASCII types pass through
        if !trimmed.is_ascii() {
            return trimmed.to_string();
        }

        let lower = trimmed.to_lowercase();

        if let Some(&singular) = self.irregulars.get(lower.as_str()) {
            return match_case(trimmed, singular);
        }

        // Ordered suffix rules; first match wins
        if let Some(stem) = strip_suffix_ci(trimmed, "ies") {
            if stem.len() >= 2 {
                let y = if trimmed.ends_with("IES") { 'Y' } else { 'y' };
                return format!("{}{}", stem, y);
            }
        }
        for suffix in ["sses", "ches", "shes", "xes", "zes", "oes"] {
            if let Some(stem) = strip_suffix_ci(trimmed, suffix) {
                // Keep the consonant cluster, drop the "es"
                return format!("{}{}", stem, &trimmed[trimmed.len() - suffix.len()..trimmed.len() - 2]);
            }
        }
        if lower.ends_with('s')
            && !lower.ends_with("ss")
            && !lower.ends_with("us")
            && !lower.ends_with("is")
        {
            return trimmed[..trimmed.len() - 1].to_string();
        }

        trimmed.to_string()
    }
}

/// Strip a suffix case-insensitively, returning the untouched stem
fn strip_suffix_ci<'a>(word: &'a str, suffix: &str) -> Option<&'a str> {
    if word.len() >= suffix.len() + 1
        && word[word.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
    {
        Some(&word[..word.len() - suffix.len()])
    } else {
        None
    }
}

/// Apply the source word's leading capitalization to the replacement
fn match_case(source: &str, replacement: &str) -> String {
    let capitalized = source.chars().next().is_some_and(|c| c.is_uppercase());
    if capitalized {
        let mut chars = replacement.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    } else {
        replacement.to_string()
    }
}
