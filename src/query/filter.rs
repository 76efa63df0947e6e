//! Predicate-based record filtering.
//!
//! A [`RecordFilter`] is a conjunction of criteria. Each criterion is a
//! case-insensitive substring needle tested against one or more fields, any of
//! which may match.

use crate::domain::{Dataset, Field, PriceRecord};

#[derive(Debug, Clone)]
struct Criterion {
    needle: String,
    fields: Vec<Field>,
}

impl Criterion {
    fn matches(&self, record: &PriceRecord) -> bool {
        self.fields
            .iter()
            .any(|f| record.field(*f).to_lowercase().contains(&self.needle))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    criteria: Vec<Criterion>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `needle` in at least one of `fields`. `None` adds nothing.
    pub fn any_of(mut self, needle: Option<&str>, fields: &[Field]) -> Self {
        if let Some(needle) = needle {
            self.criteria.push(Criterion {
                needle: needle.to_lowercase(),
                fields: fields.to_vec(),
            });
        }
        self
    }

    pub fn matches(&self, record: &PriceRecord) -> bool {
        self.criteria.iter().all(|c| c.matches(record))
    }

    /// Matching records, in dataset order.
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Vec<&'a PriceRecord> {
        dataset.records().iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(state: &str, market: &str, commodity: &str) -> PriceRecord {
        PriceRecord {
            state: state.to_string(),
            district: String::new(),
            market: market.to_string(),
            commodity: commodity.to_string(),
            variety: None,
            date: None,
            modal_price: 1.0,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let ds = Dataset::new(vec![rec("A", "B", "C"), rec("D", "E", "F")]);
        assert_eq!(RecordFilter::new().apply(&ds).len(), 2);
        assert_eq!(RecordFilter::new().any_of(None, &[Field::State]).apply(&ds).len(), 2);
    }

    #[test]
    fn fields_or_criteria_and() {
        let ds = Dataset::new(vec![
            rec("Karnataka", "Bangalore", "Tomato"),
            rec("Karnataka", "Mysore", "Onion"),
            rec("Maharashtra", "Karnataka Gate", "Tomato"),
            rec("Kerala", "Kochi", "Tomato"),
        ]);
        let filter = RecordFilter::new()
            .any_of(Some("TOMATO"), &[Field::Commodity])
            .any_of(Some("karnataka"), &[Field::Market, Field::State]);

        let markets: Vec<&str> = filter.apply(&ds).iter().map(|r| r.market.as_str()).collect();
        assert_eq!(markets, vec!["Bangalore", "Karnataka Gate"]);
    }

    #[test]
    fn substring_semantics() {
        let ds = Dataset::new(vec![rec("Uttar Pradesh", "Agra", "Paddy(Dhan)(Common)")]);
        let filter = RecordFilter::new().any_of(Some("paddy"), &[Field::Commodity]);
        assert_eq!(filter.apply(&ds).len(), 1);
    }
}
