use once_cell::sync::Lazy;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

use crate::error::{DashboardError, Result};

// ============================================================================
// INSTRUMENT CATALOG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryConfig {
    pub name: String,
    /// US-listed broad equity ETF
    pub equity_ticker: String,
    /// USD/local FX rate
    pub fx_ticker: String,
    /// Local-currency equity index
    pub local_index_ticker: String,
    /// Search terms for the public-concern sentiment tracker
    pub concern_keywords: Vec<String>,
}

impl CountryConfig {
    pub fn tickers(&self) -> [&str; 3] {
        [&self.equity_ticker, &self.fx_ticker, &self.local_index_ticker]
    }
}

macro_rules! country {
    ($name:expr, $eq:expr, $fx:expr, $local:expr, [$($kw:expr),*]) => {
        CountryConfig {
            name: $name.to_string(),
            equity_ticker: $eq.to_string(),
            fx_ticker: $fx.to_string(),
            local_index_ticker: $local.to_string(),
            concern_keywords: vec![$($kw.to_string()),*],
        }
    };
}

static COUNTRIES: Lazy<Vec<CountryConfig>> = Lazy::new(|| {
    vec![
        country!("Brazil", "EWZ", "BRL=X", "^BVSP", ["inflação", "desemprego", "Lula"]),
        country!("Mexico", "EWW", "MXN=X", "^MXX", ["inflacion", "nearshoring", "amlo"]),
        country!("Chile", "ECH", "CLP=X", "^IPSA", ["inflacion", "litio", "Boric"]),
        country!("Argentina", "ARGT", "ARS=X", "^MERV", ["inflacion", "dolar", "milei"]),
        country!("Peru", "EPU", "PEN=X", "^SPBLPGPT", ["inflacion", "corrupcion", "Boluarte"]),
    ]
});

pub struct Catalog;

impl Catalog {
    pub fn countries() -> &'static [CountryConfig] {
        &COUNTRIES
    }

    /// Case-insensitive lookup by country name.
    pub fn get(name: &str) -> Result<&'static CountryConfig> {
        COUNTRIES
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| DashboardError::UnknownCountry(name.to_string()))
    }

    pub fn names() -> Vec<&'static str> {
        COUNTRIES.iter().map(|c| c.name.as_str()).collect()
    }
}

// ============================================================================
// SIGNAL THRESHOLDS
// ============================================================================

/// Fixed model thresholds. Built once; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalThresholds {
    /// |z| above this flags an equity/FX divergence
    pub divergence_zscore: f64,
    /// 5-day return (fraction) above +x is bullish, below -x bearish
    pub momentum_return: f64,
    /// An event this many days out or closer counts as imminent
    pub event_horizon_days: i64,
    /// Implied vol below this fraction of its baseline counts as cheap
    pub cheap_vol_ratio: f64,
    /// Concern z-score above this is "high public concern"
    pub concern_zscore: f64,
}

pub static THRESHOLDS: Lazy<SignalThresholds> = Lazy::new(|| SignalThresholds {
    divergence_zscore: 2.0,
    momentum_return: 0.02,
    event_horizon_days: 30,
    cheap_vol_ratio: 1.0,
    concern_zscore: 1.5,
});

// ============================================================================
// RUNTIME SETTINGS
// ============================================================================

pub const LOOKBACK_RANGE: (u32, u32) = (30, 365);
pub const VOL_WINDOW_RANGE: (usize, usize) = (5, 30);

pub const DEFAULT_COUNTRY: &str = "Brazil";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;
pub const DEFAULT_VOL_WINDOW: usize = 10;
pub const DEFAULT_ZSCORE_WINDOW: usize = 20;
pub const DEFAULT_FETCH_DELAY_MS: u64 = 250;

/// User-adjustable controls, seeded from the environment (and `.env`).
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSettings {
    pub country: String,
    pub lookback_days: u32,
    pub volatility_window: usize,
    pub zscore_window: usize,
    /// Base pause between provider requests; 0 disables throttling
    pub fetch_delay_ms: u64,
    /// Extra calendar events (local JSON path or http(s) URL)
    pub events_source: Option<String>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            volatility_window: DEFAULT_VOL_WINDOW,
            zscore_window: DEFAULT_ZSCORE_WINDOW,
            fetch_delay_ms: DEFAULT_FETCH_DELAY_MS,
            events_source: None,
        }
    }
}

fn env_str(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env_str(name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl DashboardSettings {
    /// Reads `LATAM_*` variables, loading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            country: env_str("LATAM_COUNTRY").unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            lookback_days: env_parse("LATAM_LOOKBACK_DAYS", DEFAULT_LOOKBACK_DAYS),
            volatility_window: env_parse("LATAM_VOL_WINDOW", DEFAULT_VOL_WINDOW),
            zscore_window: env_parse("LATAM_ZSCORE_WINDOW", DEFAULT_ZSCORE_WINDOW),
            fetch_delay_ms: env_parse("LATAM_FETCH_DELAY_MS", DEFAULT_FETCH_DELAY_MS),
            events_source: env_str("LATAM_EVENTS_FILE"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Catalog::get(&self.country)?;

        let (lo, hi) = LOOKBACK_RANGE;
        if !(lo..=hi).contains(&self.lookback_days) {
            return Err(DashboardError::InvalidSetting {
                name: "lookback_days",
                value: self.lookback_days.to_string(),
                reason: format!("must be within {lo}..={hi}"),
            });
        }

        let (lo, hi) = VOL_WINDOW_RANGE;
        if !(lo..=hi).contains(&self.volatility_window) {
            return Err(DashboardError::InvalidSetting {
                name: "volatility_window",
                value: self.volatility_window.to_string(),
                reason: format!("must be within {lo}..={hi}"),
            });
        }

        if self.zscore_window < 2 {
            return Err(DashboardError::InvalidSetting {
                name: "zscore_window",
                value: self.zscore_window.to_string(),
                reason: "a standard deviation needs at least 2 observations".to_string(),
            });
        }

        Ok(())
    }

    pub fn events_path(&self) -> Option<PathBuf> {
        self.events_source
            .as_ref()
            .filter(|s| !s.starts_with("http://") && !s.starts_with("https://"))
            .map(PathBuf::from)
    }
}
