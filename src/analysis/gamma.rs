//! Event-gamma model inputs.
//!
//! There is no options data feed, so implied volatility is estimated. The
//! estimator is a trait so a real implied-vol source can replace the
//! realized-vol proxy without touching the classifier.

use serde::Serialize;

use crate::analysis::momentum::{LONG_VOL_WINDOW, MOMENTUM_WINDOW};
use crate::analysis::returns::TRADING_DAYS;
use crate::analysis::statistics;
use crate::models::ReturnSeries;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct VolEstimate {
    /// Annualized vol the market is assumed to be pricing now
    pub current: f64,
    /// Annualized reference level `current` is compared against
    pub baseline: f64,
}

impl VolEstimate {
    /// current / baseline; `None` on a flat baseline.
    pub fn cheapness_ratio(&self) -> Option<f64> {
        if self.baseline < statistics::ZERO_STD_EPSILON {
            return None;
        }
        Some(self.current / self.baseline)
    }
}

pub trait ImpliedVolEstimator: Send + Sync {
    fn name(&self) -> &str;

    fn estimate(&self, returns: &ReturnSeries) -> Option<VolEstimate>;
}

/// Uses short-window realized vol as a stand-in for implied vol and
/// long-window realized vol as its baseline.
#[derive(Debug, Clone, Copy)]
pub struct RealizedVolProxy {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for RealizedVolProxy {
    fn default() -> Self {
        Self {
            short_window: MOMENTUM_WINDOW,
            long_window: LONG_VOL_WINDOW,
        }
    }
}

impl ImpliedVolEstimator for RealizedVolProxy {
    fn name(&self) -> &str {
        "realized-vol-proxy"
    }

    fn estimate(&self, returns: &ReturnSeries) -> Option<VolEstimate> {
        let values = returns.values();
        if values.len() < self.short_window.max(self.long_window) || self.short_window < 2 {
            return None;
        }

        let annualize = TRADING_DAYS.sqrt();
        let short = statistics::sample_std(&values[values.len() - self.short_window..])?;
        let long = statistics::sample_std(&values[values.len() - self.long_window..])?;

        Some(VolEstimate {
            current: short * annualize,
            baseline: long * annualize,
        })
    }
}
