//! Question → (commodity, location, intent).
//!
//! Each field is filled by the first source that produces it:
//!
//! 1. named entities from the injected recognizer (last match per category wins)
//! 2. commodity keyword list (leftmost keyword wins)
//! 3. the phrase after the word "in" for the location
//!
//! Intent comes from [`INTENT_RULES`], an ordered keyword table evaluated
//! against the question as typed. The first rule that matches wins.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{ExtractedQuery, QueryIntent};
use crate::nlp::recognizer::{EntityLabel, EntityRecognizer, GazetteerRecognizer};

/// Commodities recognized without help from the entity recognizer.
pub const COMMODITY_KEYWORDS: [&str; 10] = [
    "tomato", "onion", "potato", "brinjal", "rice", "paddy", "wheat", "maize", "banana", "apple",
];

/// Intent keyword groups in priority order.
pub const INTENT_RULES: [(QueryIntent, &[&str]); 5] = [
    (
        QueryIntent::Trend,
        &["trend", "increase", "decrease", "last", "past", "month", "week", "year"],
    ),
    (QueryIntent::Highest, &["highest", "max", "top"]),
    (QueryIntent::Lowest, &["lowest", "min", "cheap"]),
    (QueryIntent::Average, &["average", "mean"]),
    (QueryIntent::Price, &["price", "rate", "value", "cost"]),
];

// A keyword must not continue a word ("price" never yields "rice"); anything may follow it.
static COMMODITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:^|[^a-z])({})", COMMODITY_KEYWORDS.join("|")))
        .expect("commodity keyword pattern is valid")
});

static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bin\s+([a-z ]+)").expect("location pattern is valid"));

// Case-sensitive substring groups, matching the question as typed.
static INTENT_RES: LazyLock<Vec<(QueryIntent, Regex)>> = LazyLock::new(|| {
    INTENT_RULES
        .iter()
        .map(|(intent, words)| {
            let pattern = words.join("|");
            (*intent, Regex::new(&pattern).expect("intent keyword pattern is valid"))
        })
        .collect()
});

/// Entity and intent extractor.
///
/// Extraction is a pure function of the question, the keyword tables and the
/// recognizer it was built with.
pub struct Extractor {
    recognizer: Box<dyn EntityRecognizer>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(GazetteerRecognizer::indian_regions())
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor").finish_non_exhaustive()
    }
}

impl Extractor {
    pub fn new(recognizer: impl EntityRecognizer + 'static) -> Self {
        Self {
            recognizer: Box::new(recognizer),
        }
    }

    pub fn extract(&self, question: &str) -> ExtractedQuery {
        let lowered = question.to_lowercase();

        let mut commodity: Option<String> = None;
        let mut location: Option<String> = None;

        for entity in self.recognizer.recognize(&lowered) {
            let text = entity.text.trim();
            if text.is_empty() {
                continue;
            }
            match entity.label {
                EntityLabel::Gpe | EntityLabel::Loc => location = Some(text.to_string()),
                EntityLabel::Product | EntityLabel::Org | EntityLabel::Norp => {
                    commodity = Some(text.to_string())
                }
                EntityLabel::Other(_) => {}
            }
        }

        if commodity.is_none() {
            commodity = keyword_commodity(&lowered);
        }
        if location.is_none() {
            location = trailing_location(&lowered);
        }

        let intent = classify_intent(question);
        debug!(?commodity, ?location, %intent, "Extracted query");

        ExtractedQuery {
            commodity,
            location,
            intent,
        }
    }
}

/// Leftmost commodity keyword in `text` that does not start mid-word.
pub fn keyword_commodity(text: &str) -> Option<String> {
    COMMODITY_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// The letters-and-spaces phrase following the first standalone "in".
pub fn trailing_location(lowered: &str) -> Option<String> {
    LOCATION_RE
        .captures(lowered)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// First matching intent group, or [`QueryIntent::Unknown`].
pub fn classify_intent(question: &str) -> QueryIntent {
    INTENT_RES
        .iter()
        .find(|(_, re)| re.is_match(question))
        .map(|(intent, _)| *intent)
        .unwrap_or(QueryIntent::Unknown)
}
