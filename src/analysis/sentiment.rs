//! Public-concern index built from per-keyword search-interest series.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::config::CountryConfig;
use crate::models::DataPoint;

/// Mean interest across the country's concern keywords, per date.
///
/// Keywords missing from `by_keyword` are skipped. A date averages only the
/// keywords that have a value on it. Returns an empty series when none of
/// the country's keywords are present.
pub fn concern_index(country: &CountryConfig, by_keyword: &HashMap<String, Vec<DataPoint>>) -> Vec<DataPoint> {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for keyword in &country.concern_keywords {
        let Some(series) = by_keyword.get(keyword) else {
            tracing::debug!(country = %country.name, keyword = %keyword, "no interest series for keyword");
            continue;
        };
        for dp in series.iter().filter(|dp| dp.value.is_finite()) {
            let entry = sums.entry(dp.date()).or_insert((0.0, 0));
            entry.0 += dp.value;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(date, (sum, n))| DataPoint::on_date(date, sum / n as f64))
        .collect()
}
