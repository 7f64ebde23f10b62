use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl DataPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Midnight-UTC point for a calendar date.
    pub fn on_date(date: NaiveDate, value: f64) -> Self {
        Self {
            timestamp: date.and_time(NaiveTime::MIN).and_utc(),
            value,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Daily closing prices for one ticker, ascending by date, one point per date.
#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<DataPoint>,
}

impl PriceSeries {
    /// Builds a series from raw provider quotes.
    ///
    /// Quotes are sorted by date; when a date appears twice the later quote
    /// wins (intraday snapshot vs. settled close). Non-finite and
    /// non-positive prices are dropped since no return can be taken over them.
    pub fn new(symbol: impl Into<String>, raw: Vec<DataPoint>) -> Self {
        let symbol = symbol.into();
        let mut by_date: BTreeMap<NaiveDate, DataPoint> = BTreeMap::new();
        let mut dropped = 0usize;

        let mut raw = raw;
        raw.sort_by_key(|dp| dp.timestamp);

        for dp in raw {
            if !dp.value.is_finite() || dp.value <= 0.0 {
                dropped += 1;
                continue;
            }
            by_date.insert(dp.date(), dp);
        }

        if dropped > 0 {
            tracing::warn!(symbol = %symbol, dropped, "dropped invalid price quotes");
        }

        Self {
            symbol,
            points: by_date.into_values().collect(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&DataPoint> {
        self.points.last()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|dp| dp.value).collect()
    }
}

/// Daily simple returns, keyed by the later of the two dates.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnSeries {
    points: Vec<DataPoint>,
}

impl ReturnSeries {
    /// Assumes `points` are already date-ascending with unique dates.
    pub fn from_points(points: Vec<DataPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|dp| dp.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|dp| dp.date()).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A per-date statistic that is absent until its window is full.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Value of the final entry, if defined.
pub fn latest_defined(stats: &[RollingPoint]) -> Option<f64> {
    stats.last().and_then(|p| p.value)
}
