//! Named-entity recognition seam.
//!
//! The extractor only needs labelled surface spans, so any recognizer that can
//! produce [`Entity`] values in text order can be plugged in. Two are provided:
//!
//! - [`NoopRecognizer`]: finds nothing, leaving extraction to the keyword and
//!   regex fallbacks
//! - [`GazetteerRecognizer`]: dictionary lookup of Indian states and union
//!   territories, tagged as geo-political entities

use regex::Regex;

/// Entity categories, named after the OntoNotes labels the extractor reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityLabel {
    /// Geo-political entity (country, state, city).
    Gpe,
    /// Non-GPE location.
    Loc,
    Product,
    Org,
    /// Nationality, religious or political group.
    Norp,
    Other(String),
}

/// A recognized span of the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

pub trait EntityRecognizer: Send + Sync {
    /// Entities found in `text`, in order of appearance.
    fn recognize(&self, text: &str) -> Vec<Entity>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecognizer;

impl EntityRecognizer for NoopRecognizer {
    fn recognize(&self, _text: &str) -> Vec<Entity> {
        Vec::new()
    }
}

const INDIAN_REGIONS: &[&str] = &[
    "andaman and nicobar islands",
    "andhra pradesh",
    "arunachal pradesh",
    "assam",
    "bihar",
    "chandigarh",
    "chhattisgarh",
    "dadra and nagar haveli",
    "daman and diu",
    "delhi",
    "goa",
    "gujarat",
    "haryana",
    "himachal pradesh",
    "jammu and kashmir",
    "jharkhand",
    "karnataka",
    "kerala",
    "ladakh",
    "lakshadweep",
    "madhya pradesh",
    "maharashtra",
    "manipur",
    "meghalaya",
    "mizoram",
    "nagaland",
    "nct of delhi",
    "odisha",
    "puducherry",
    "punjab",
    "rajasthan",
    "sikkim",
    "tamil nadu",
    "telangana",
    "tripura",
    "uttar pradesh",
    "uttarakhand",
    "west bengal",
];

/// Whole-word dictionary recognizer.
///
/// Longer names win over their prefixes ("nct of delhi" over "delhi"), and
/// matching is case-insensitive. The surface text is returned as written.
#[derive(Debug, Clone)]
pub struct GazetteerRecognizer {
    pattern: Option<Regex>,
    label: EntityLabel,
}

impl GazetteerRecognizer {
    /// Recognizer for Indian states and union territories.
    pub fn indian_regions() -> Self {
        Self::new(INDIAN_REGIONS.iter().copied(), EntityLabel::Gpe)
    }

    /// Recognizer tagging every occurrence of `terms` with `label`.
    pub fn new<'a>(terms: impl IntoIterator<Item = &'a str>, label: EntityLabel) -> Self {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        // Regex alternation is leftmost-first, so longer names must come first.
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        terms.dedup();

        let pattern = if terms.is_empty() {
            None
        } else {
            let alternation = terms
                .iter()
                .map(|t| regex::escape(t).replace(' ', r"\s+"))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).ok()
        };

        Self { pattern, label }
    }
}

impl EntityRecognizer for GazetteerRecognizer {
    fn recognize(&self, text: &str) -> Vec<Entity> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        pattern
            .find_iter(text)
            .map(|m| Entity::new(m.as_str(), self.label.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_states_in_order() {
        let r = GazetteerRecognizer::indian_regions();
        let found = r.recognize("onion rate in tamil nadu vs karnataka");
        assert_eq!(
            found,
            vec![
                Entity::new("tamil nadu", EntityLabel::Gpe),
                Entity::new("karnataka", EntityLabel::Gpe),
            ]
        );
    }

    #[test]
    fn longest_name_wins() {
        let r = GazetteerRecognizer::indian_regions();
        let found = r.recognize("wheat price in nct of delhi");
        assert_eq!(found, vec![Entity::new("nct of delhi", EntityLabel::Gpe)]);
    }

    #[test]
    fn requires_whole_words() {
        let r = GazetteerRecognizer::indian_regions();
        assert!(r.recognize("goats and assamese tea").is_empty());
    }

    #[test]
    fn custom_terms_and_labels() {
        let r = GazetteerRecognizer::new(["Safal"], EntityLabel::Org);
        assert_eq!(
            r.recognize("banana at safal stores"),
            vec![Entity::new("safal", EntityLabel::Org)]
        );
        assert!(GazetteerRecognizer::new([], EntityLabel::Org).recognize("safal").is_empty());
    }

    #[test]
    fn noop_finds_nothing() {
        assert!(NoopRecognizer.recognize("tomato in karnataka").is_empty());
    }
}
