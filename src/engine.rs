//! The question-answering engine shared by every front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! question -> extract -> dispatch -> resolve -> format
//!
//! Front-ends call [`QaEngine::answer`] (always a string) or
//! [`QaEngine::resolve`] (structured, with faults as `Err`).

use std::fmt;

use tracing::{debug, error, warn};

use crate::domain::{Answer, Dataset, Direction, EngineConfig, ExtractedQuery, PriceRecord, QueryIntent};
use crate::error::AppError;
use crate::io::chart::{ChartWriter, SvgChartWriter};
use crate::io::ingest::load_dataset;
use crate::nlp::Extractor;
use crate::query;
use crate::report::{INTERNAL_FAULT, format_answer};

pub struct QaEngine {
    dataset: Dataset,
    extractor: Extractor,
    charts: Box<dyn ChartWriter>,
}

impl fmt::Debug for QaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QaEngine")
            .field("records", &self.dataset.len())
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

impl QaEngine {
    pub fn new(dataset: Dataset, extractor: Extractor, charts: impl ChartWriter + 'static) -> Self {
        Self {
            dataset,
            extractor,
            charts: Box::new(charts),
        }
    }

    /// Engine bound to the current on-disk dataset, configured from the environment.
    pub fn open() -> Self {
        Self::from_config(&EngineConfig::from_env())
    }

    /// Load the dataset named by `config`.
    ///
    /// A missing or unreadable dataset is not fatal: the engine starts empty and
    /// every question resolves to "no data".
    pub fn from_config(config: &EngineConfig) -> Self {
        let dataset = match load_dataset(&config.dataset_path) {
            Ok(loaded) => {
                if loaded.dataset.is_empty() {
                    warn!("Dataset {} has no usable rows", config.dataset_path.display());
                }
                loaded.dataset
            }
            Err(e) => {
                warn!("{e}; answering from an empty dataset");
                Dataset::empty()
            }
        };
        Self::new(dataset, Extractor::default(), SvgChartWriter::new(&config.chart_path))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn extract(&self, question: &str) -> ExtractedQuery {
        self.extractor.extract(question)
    }

    /// Resolve a question to a structured answer.
    pub fn resolve(&self, question: &str) -> Result<Answer, AppError> {
        let ExtractedQuery {
            commodity,
            location,
            intent,
        } = self.extract(question);
        let commodity = commodity.as_deref();
        let location = location.as_deref();
        debug!(%intent, "Dispatching question");

        let answer = match intent {
            QueryIntent::Trend => query::trend(&self.dataset, commodity, location, self.charts.as_ref())?,
            QueryIntent::Highest => query::extreme(&self.dataset, commodity, Direction::Highest),
            QueryIntent::Lowest => query::extreme(&self.dataset, commodity, Direction::Lowest),
            QueryIntent::Price | QueryIntent::Average => query::price(&self.dataset, commodity, location),
            QueryIntent::Unknown => Answer::NotUnderstood,
        };
        Ok(answer)
    }

    /// Answer a question. Never fails; faults become an apology.
    pub fn answer(&self, question: &str) -> String {
        match self.resolve(question) {
            Ok(answer) => format_answer(&answer),
            Err(e) => {
                error!("Failed to answer {question:?}: {e}");
                INTERNAL_FAULT.to_string()
            }
        }
    }

    /// Most recent dataset rows related to a question, newest first.
    pub fn supporting_rows(&self, question: &str, limit: usize) -> Vec<&PriceRecord> {
        let q = self.extract(question);
        query::supporting_rows(&self.dataset, q.commodity.as_deref(), q.location.as_deref(), limit)
    }
}
