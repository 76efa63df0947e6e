//! Deterministic dataset queries behind each intent.
//!
//! Resolvers only ever borrow the dataset. A query that matches nothing yields
//! [`Answer::NotFound`]; `Err` is reserved for faults (the trend chart write).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Answer, Dataset, Direction, Field, PriceRecord};
use crate::error::AppError;
use crate::io::chart::ChartWriter;
use crate::query::filter::RecordFilter;
use crate::report::{display_commodity, display_location};

/// Number of most recent rows drawn on a trend chart.
pub const TREND_WINDOW: usize = 12;

fn by_commodity_and_place(commodity: Option<&str>, location: Option<&str>) -> RecordFilter {
    RecordFilter::new()
        .any_of(commodity, &[Field::Commodity])
        .any_of(location, &[Field::Market, Field::State])
}

fn not_found(commodity: Option<&str>, location: Option<&str>) -> Answer {
    Answer::NotFound {
        commodity: commodity.map(str::to_string),
        location: location.map(str::to_string),
    }
}

/// Mean modal price across the rows at the latest date present.
pub fn price(dataset: &Dataset, commodity: Option<&str>, location: Option<&str>) -> Answer {
    let rows = by_commodity_and_place(commodity, location).apply(dataset);

    let Some(latest) = rows.iter().filter_map(|r| r.date).max() else {
        return not_found(commodity, location);
    };

    let at_latest: Vec<f64> = rows
        .iter()
        .filter(|r| r.date == Some(latest))
        .map(|r| r.modal_price)
        .collect();
    let mean = at_latest.iter().sum::<f64>() / at_latest.len() as f64;
    debug!("Price over {} rows at {latest}", at_latest.len());

    Answer::Price {
        commodity: commodity.map(str::to_string),
        location: location.map(str::to_string),
        price: mean,
        date: latest,
    }
}

/// Chart the [`TREND_WINDOW`] most recent rows and report where the chart went.
pub fn trend(
    dataset: &Dataset,
    commodity: Option<&str>,
    location: Option<&str>,
    charts: &dyn ChartWriter,
) -> Result<Answer, AppError> {
    let mut dated: Vec<(NaiveDate, f64)> = by_commodity_and_place(commodity, location)
        .apply(dataset)
        .into_iter()
        .filter_map(|r| r.date.map(|d| (d, r.modal_price)))
        .collect();

    if dated.is_empty() {
        return Ok(not_found(commodity, location));
    }

    // Stable: rows sharing a date keep dataset order.
    dated.sort_by_key(|(d, _)| *d);
    let points = dated.split_off(dated.len().saturating_sub(TREND_WINDOW));

    let title = format!(
        "{} Price Trend in {}",
        display_commodity(commodity),
        display_location(location)
    );
    let chart = charts.write_trend(&title, &points)?;

    Ok(Answer::Trend {
        commodity: commodity.map(str::to_string),
        location: location.map(str::to_string),
        points,
        chart,
    })
}

/// Market with the highest or lowest mean modal price, nationally.
///
/// Location is deliberately not a parameter: this always ranks every market.
pub fn extreme(dataset: &Dataset, commodity: Option<&str>, direction: Direction) -> Answer {
    let rows = RecordFilter::new()
        .any_of(commodity, &[Field::Commodity])
        .apply(dataset);

    // Sorted by market name; ties keep the first market in that order.
    let mut per_market: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in &rows {
        let entry = per_market.entry(r.market.as_str()).or_insert((0.0, 0));
        entry.0 += r.modal_price;
        entry.1 += 1;
    }

    let mut best: Option<(&str, f64)> = None;
    for (market, (sum, n)) in per_market {
        let mean = sum / n as f64;
        let better = match (best, direction) {
            (None, _) => true,
            (Some((_, b)), Direction::Highest) => mean > b,
            (Some((_, b)), Direction::Lowest) => mean < b,
        };
        if better {
            best = Some((market, mean));
        }
    }

    match best {
        Some((market, price)) => Answer::Extreme {
            commodity: commodity.map(str::to_string),
            direction,
            market: market.to_string(),
            price,
        },
        None => not_found(commodity, None),
    }
}

/// Most recent rows for a commodity/location, newest first.
///
/// Location matches market, state or district. Undated rows sort last.
pub fn supporting_rows<'a>(
    dataset: &'a Dataset,
    commodity: Option<&str>,
    location: Option<&str>,
    limit: usize,
) -> Vec<&'a PriceRecord> {
    let mut rows = RecordFilter::new()
        .any_of(commodity, &[Field::Commodity])
        .any_of(location, &[Field::Market, Field::State, Field::District])
        .apply(dataset);
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows.truncate(limit);
    rows
}
