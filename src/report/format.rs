//! Formatted terminal output: answers and supporting-row tables.
//!
//! We keep formatting code in one place so resolvers stay free of
//! presentation concerns and output changes are localized.

use crate::domain::{Answer, PriceRecord};

pub const COMMODITY_PLACEHOLDER: &str = "commodity";
pub const LOCATION_PLACEHOLDER: &str = "India";

pub const NOT_UNDERSTOOD: &str = "Sorry, I couldn't understand your question clearly. Please rephrase it.";
pub const INTERNAL_FAULT: &str = "Sorry, something went wrong while answering your question.";

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
///
/// `"tamil nadu"` -> `"Tamil Nadu"`, `"paddy(dhan)"` -> `"Paddy(Dhan)"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Title-cased commodity, or the generic placeholder.
pub fn display_commodity(commodity: Option<&str>) -> String {
    commodity
        .map(title_case)
        .unwrap_or_else(|| COMMODITY_PLACEHOLDER.to_string())
}

/// Title-cased location, or the national placeholder.
pub fn display_location(location: Option<&str>) -> String {
    location
        .map(title_case)
        .unwrap_or_else(|| LOCATION_PLACEHOLDER.to_string())
}

pub fn fmt_rupees(v: f64) -> String {
    format!("₹{v:.2}")
}

/// Render a resolver result as the user-facing answer.
pub fn format_answer(answer: &Answer) -> String {
    match answer {
        Answer::Price {
            commodity,
            location,
            price,
            date,
            ..
        } => format!(
            "The latest average modal price of {} in {} is {} (as of {date}).",
            display_commodity(commodity.as_deref()),
            display_location(location.as_deref()),
            fmt_rupees(*price),
        ),
        Answer::Trend {
            commodity,
            location,
            points,
            chart,
        } => format!(
            "Price trend for {} in {} generated ({} {}, chart saved to {}).",
            display_commodity(commodity.as_deref()),
            display_location(location.as_deref()),
            points.len(),
            if points.len() == 1 { "point" } else { "points" },
            chart.display(),
        ),
        Answer::Extreme {
            commodity,
            direction,
            market,
            price,
        } => format!(
            "The {} average modal price for {} is in {market}, with {}.",
            direction.as_str(),
            display_commodity(commodity.as_deref()),
            fmt_rupees(*price),
        ),
        Answer::NotFound { commodity, location } => format!(
            "No data found for {} in {}.",
            commodity.as_deref().unwrap_or(COMMODITY_PLACEHOLDER),
            location.as_deref().unwrap_or(LOCATION_PLACEHOLDER),
        ),
        Answer::NotUnderstood => NOT_UNDERSTOOD.to_string(),
    }
}

/// Render supporting rows as a fixed-width table.
pub fn format_supporting_rows(rows: &[&PriceRecord]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<8} {:<18} {:<18} {:<20} {:<18} {:>12}",
            "date", "state", "district", "market", "commodity", "modal_price"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<8} {:-<18} {:-<18} {:-<20} {:-<18} {:-<12}",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        let date = r
            .date
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(
            format!(
                "{:<8} {:<18} {:<18} {:<20} {:<18} {:>12.2}",
                date,
                truncate(&r.state, 18),
                truncate(&r.district, 18),
                truncate(&r.market, 20),
                truncate(&r.commodity, 18),
                r.modal_price,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Direction;

    #[test]
    fn title_case_matches_word_runs() {
        assert_eq!(title_case("tamil nadu"), "Tamil Nadu");
        assert_eq!(title_case("BANGALORE"), "Bangalore");
        assert_eq!(title_case("paddy(dhan)(common)"), "Paddy(Dhan)(Common)");
        assert_eq!(title_case("o'neil 2nd"), "O'Neil 2Nd");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn price_answer() {
        let answer = Answer::Price {
            commodity: Some("tomato".to_string()),
            location: Some("bangalore".to_string()),
            price: 30.0,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        assert_eq!(
            format_answer(&answer),
            "The latest average modal price of Tomato in Bangalore is ₹30.00 (as of 2024-02-01)."
        );
    }

    #[test]
    fn price_answer_placeholders() {
        let answer = Answer::Price {
            commodity: None,
            location: None,
            price: 1234.567,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert_eq!(
            format_answer(&answer),
            "The latest average modal price of commodity in India is ₹1234.57 (as of 2024-03-01)."
        );
    }

    #[test]
    fn trend_answer_names_entities_and_chart() {
        let answer = Answer::Trend {
            commodity: Some("onion".to_string()),
            location: Some("nashik".to_string()),
            points: vec![(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1.0)],
            chart: PathBuf::from("data/trend.svg"),
        };
        assert_eq!(
            format_answer(&answer),
            "Price trend for Onion in Nashik generated (1 point, chart saved to data/trend.svg)."
        );
    }

    #[test]
    fn extreme_answer() {
        let answer = Answer::Extreme {
            commodity: Some("potato".to_string()),
            direction: Direction::Highest,
            market: "Azadpur".to_string(),
            price: 1520.0,
        };
        assert_eq!(
            format_answer(&answer),
            "The highest average modal price for Potato is in Azadpur, with ₹1520.00."
        );
    }

    #[test]
    fn not_found_is_verbatim() {
        let answer = Answer::NotFound {
            commodity: Some("onion".to_string()),
            location: Some("Pune".to_string()),
        };
        assert_eq!(format_answer(&answer), "No data found for onion in Pune.");
        let bare = Answer::NotFound { commodity: None, location: None };
        assert_eq!(format_answer(&bare), "No data found for commodity in India.");
    }

    #[test]
    fn supporting_table_layout() {
        let rec = PriceRecord {
            state: "Karnataka".to_string(),
            district: "Bangalore".to_string(),
            market: "Binny Mill (F&V), Bangalore".to_string(),
            commodity: "Tomato".to_string(),
            variety: None,
            date: NaiveDate::from_ymd_opt(2024, 2, 1),
            modal_price: 1650.0,
        };
        let table = format_supporting_rows(&[&rec]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date"));
        assert!(lines[2].starts_with("2024-02"));
        assert!(lines[2].contains("Binny Mill (F&V), B."));
        assert!(lines[2].ends_with("1650.00"));
    }
}
