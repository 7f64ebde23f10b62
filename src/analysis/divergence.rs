//! Equity vs FX return divergence.
//!
//! The spread between the equity ETF's daily return and the FX rate's daily
//! return is normalised against its own trailing mean and standard deviation.
//! Large absolute z-scores mean the two legs have drifted apart more than
//! usual; the classifier decides what counts as "large".

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::analysis::statistics;
use crate::models::{DataPoint, ReturnSeries, RollingPoint};

#[derive(Debug, Clone, Serialize)]
pub struct DivergencePoint {
    pub date: NaiveDate,
    pub spread: f64,
    pub zscore: Option<f64>,
}

/// Inner-joins two return series on date and takes `equity - fx`.
pub fn return_spread(equity: &ReturnSeries, fx: &ReturnSeries) -> Vec<DataPoint> {
    let fx_map: HashMap<NaiveDate, f64> = fx
        .points()
        .iter()
        .map(|dp| (dp.date(), dp.value))
        .collect();

    equity
        .points()
        .iter()
        .filter_map(|dp| {
            fx_map
                .get(&dp.date())
                .map(|fx_ret| DataPoint::new(dp.timestamp, dp.value - fx_ret))
        })
        .collect()
}

/// Rolling z-score of the equity/FX return spread.
pub fn calculate_divergence(
    equity: &ReturnSeries,
    fx: &ReturnSeries,
    window: usize,
) -> Vec<DivergencePoint> {
    let spread = return_spread(equity, fx);
    let zscores: Vec<RollingPoint> = statistics::rolling_zscore(&spread, window);

    spread
        .iter()
        .zip(zscores)
        .map(|(dp, z)| DivergencePoint {
            date: z.date,
            spread: dp.value,
            zscore: z.value,
        })
        .collect()
}

pub fn latest_zscore(points: &[DivergencePoint]) -> Option<f64> {
    points.last().and_then(|p| p.zscore)
}
