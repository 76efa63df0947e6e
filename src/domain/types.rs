//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - held in memory for the lifetime of a Q&A engine
//! - printed by the CLI or serialized to JSON (`samarth extract --json`)
//! - built directly in tests without touching the filesystem

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the cleaned monthly dataset.
///
/// One record exists per (state, district, market, commodity, month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub state: String,
    pub district: String,
    pub market: String,
    pub commodity: String,
    pub variety: Option<String>,
    /// First day of the aggregated month. `None` when the source value was
    /// absent or unparseable; such rows never take part in date-based queries.
    pub date: Option<NaiveDate>,
    /// Mean modal price for the month (₹/quintal).
    pub modal_price: f64,
}

/// A text field of a [`PriceRecord`] that filters can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    State,
    District,
    Market,
    Commodity,
}

impl PriceRecord {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::State => &self.state,
            Field::District => &self.district,
            Field::Market => &self.market,
            Field::Commodity => &self.commodity,
        }
    }
}

/// The in-memory dataset, read-only after load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<PriceRecord>,
}

impl Dataset {
    pub fn new(records: Vec<PriceRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest dated month in the dataset, if any.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.records.iter().filter_map(|r| r.date).max()
    }
}

/// The category of question being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryIntent {
    Price,
    Trend,
    Highest,
    Lowest,
    /// Routed to the price resolver (mean at the latest date).
    Average,
    Unknown,
}

impl QueryIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryIntent::Price => "price",
            QueryIntent::Trend => "trend",
            QueryIntent::Highest => "highest",
            QueryIntent::Lowest => "lowest",
            QueryIntent::Average => "average",
            QueryIntent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities and intent extracted from a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedQuery {
    pub commodity: Option<String>,
    pub location: Option<String>,
    pub intent: QueryIntent,
}

/// Which end of the per-market ranking the extreme resolver selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Highest,
    Lowest,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Highest => "highest",
            Direction::Lowest => "lowest",
        }
    }
}

/// Structured result of resolving a question.
///
/// Commodity/location are carried exactly as extracted; presentation rules
/// (title-casing, placeholders) live in `report`.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Price {
        commodity: Option<String>,
        location: Option<String>,
        price: f64,
        date: NaiveDate,
    },
    Trend {
        commodity: Option<String>,
        location: Option<String>,
        /// Chronological (date, modal price) points drawn on the chart.
        points: Vec<(NaiveDate, f64)>,
        chart: PathBuf,
    },
    Extreme {
        commodity: Option<String>,
        direction: Direction,
        market: String,
        price: f64,
    },
    NotFound {
        commodity: Option<String>,
        location: Option<String>,
    },
    NotUnderstood,
}
