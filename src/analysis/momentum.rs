use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::statistics;
use crate::models::ReturnSeries;

/// Trailing window for cumulative return and short-side volatility.
pub const MOMENTUM_WINDOW: usize = 5;
/// Trailing window for the long-side volatility in the ratio.
pub const LONG_VOL_WINDOW: usize = 20;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MomentumPoint {
    pub date: NaiveDate,
    /// Sum of the trailing 5 daily returns
    pub momentum: Option<f64>,
    /// std(trailing 5) / std(trailing 20)
    pub volatility_ratio: Option<f64>,
}

/// Cumulative return over the last `MOMENTUM_WINDOW` returns.
pub fn cumulative_return(window: &[f64]) -> f64 {
    window.iter().sum()
}

/// Short/long realized volatility ratio. Annualization cancels out.
pub fn volatility_ratio(short_window: &[f64], long_window: &[f64]) -> Option<f64> {
    let short = statistics::sample_std(short_window)?;
    let long = statistics::sample_std(long_window)?;

    if long < statistics::ZERO_STD_EPSILON {
        return None;
    }
    Some(short / long)
}

pub fn calculate_momentum(returns: &ReturnSeries) -> Vec<MomentumPoint> {
    let values = returns.values();

    returns
        .dates()
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let seen = i + 1;
            let momentum = (seen >= MOMENTUM_WINDOW)
                .then(|| cumulative_return(&values[seen - MOMENTUM_WINDOW..seen]));
            let volatility_ratio = if seen >= LONG_VOL_WINDOW {
                volatility_ratio(
                    &values[seen - MOMENTUM_WINDOW..seen],
                    &values[seen - LONG_VOL_WINDOW..seen],
                )
            } else {
                None
            };

            MomentumPoint { date, momentum, volatility_ratio }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataPoint;

    fn returns(values: &[f64]) -> ReturnSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ReturnSeries::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| DataPoint::on_date(start + chrono::Duration::days(i as i64), *v))
                .collect(),
        )
    }

    #[test]
    fn test_cumulative_return_sums_window() {
        let m = cumulative_return(&[0.01, 0.02, 0.005, 0.015, 0.01]);
        assert!((m - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_volatility_ratio_example() {
        // Short std 0.02 against long std 0.04 -> 0.5
        let short = [0.02, -0.02, 0.02, -0.02, 0.0];
        assert!((statistics::sample_std(&short).unwrap() - 0.02).abs() < 1e-12);

        // 20 alternating +-a with zero mean: std^2 = 20 a^2 / 19
        let a = (0.04f64 * 0.04 * 19.0 / 20.0).sqrt();
        let long: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { a } else { -a }).collect();
        assert!((statistics::sample_std(&long).unwrap() - 0.04).abs() < 1e-12);

        let ratio = volatility_ratio(&short, &long).unwrap();
        assert!((ratio - 0.5).abs() < 1e-9);

        assert_eq!(volatility_ratio(&[0.01; 5], &[0.01; 20]), None);
    }

    #[test]
    fn test_momentum_definedness() {
        let values: Vec<f64> = (0..25).map(|i| if i % 2 == 0 { 0.01 } else { -0.005 }).collect();
        let out = calculate_momentum(&returns(&values));

        assert_eq!(out.len(), 25);
        assert!(out[..4].iter().all(|p| p.momentum.is_none()));
        assert!(out[4..].iter().all(|p| p.momentum.is_some()));
        assert!(out[..19].iter().all(|p| p.volatility_ratio.is_none()));
        assert!(out[19..].iter().all(|p| p.volatility_ratio.is_some()));

        // Last five: idx 20..24 -> 0.01, -0.005, 0.01, -0.005, 0.01
        let last = out.last().unwrap().momentum.unwrap();
        assert!((last - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_short_series_has_no_momentum() {
        let out = calculate_momentum(&returns(&[0.01, 0.02]));
        assert!(out.iter().all(|p| p.momentum.is_none() && p.volatility_ratio.is_none()));
    }
}
