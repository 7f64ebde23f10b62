use serde::Serialize;

use crate::analysis::statistics;
use crate::models::{DataPoint, PriceSeries, ReturnSeries, RollingPoint};

/// Trading days per year, used to annualize daily volatility.
pub const TRADING_DAYS: f64 = 252.0;

/// Daily simple returns: r_i = p_i / p_{i-1} - 1, dated on p_i.
pub fn calculate_returns(prices: &PriceSeries) -> ReturnSeries {
    let points = prices
        .points()
        .windows(2)
        .map(|w| DataPoint::new(w[1].timestamp, w[1].value / w[0].value - 1.0))
        .collect();

    ReturnSeries::from_points(points)
}

/// Returns and trailing realized volatility for one instrument.
#[derive(Debug, Clone, Serialize)]
pub struct VolatilityProfile {
    pub returns: ReturnSeries,
    pub volatility: Vec<RollingPoint>,
}

impl VolatilityProfile {
    pub fn latest_volatility(&self) -> Option<f64> {
        self.volatility.last().and_then(|p| p.value)
    }
}

/// Realized volatility over a trailing window of returns.
#[derive(Debug, Clone, Copy)]
pub struct VolatilityCalculator {
    pub window: usize,
    /// Multiplier applied to the daily sample std (sqrt(252) annualizes)
    pub annualization: f64,
}

impl VolatilityCalculator {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            annualization: TRADING_DAYS.sqrt(),
        }
    }

    /// Unscaled daily volatility.
    pub fn daily(window: usize) -> Self {
        Self {
            window,
            annualization: 1.0,
        }
    }

    /// Entry i is defined iff i >= window - 1. A window below 2 leaves
    /// everything undefined since a sample std needs two observations.
    pub fn rolling(&self, returns: &ReturnSeries) -> Vec<RollingPoint> {
        if self.window < 2 {
            return statistics::rolling(returns.points(), 0, |_| None);
        }

        let scale = self.annualization;
        statistics::rolling(returns.points(), self.window, |w| {
            statistics::sample_std(w).map(|s| s * scale)
        })
    }

    pub fn profile(&self, prices: &PriceSeries) -> VolatilityProfile {
        let returns = calculate_returns(prices);
        let volatility = self.rolling(&returns);

        if volatility.iter().all(|p| p.value.is_none()) {
            tracing::debug!(
                symbol = prices.symbol(),
                prices = prices.len(),
                window = self.window,
                "not enough history for realized volatility"
            );
        }

        VolatilityProfile { returns, volatility }
    }
}
