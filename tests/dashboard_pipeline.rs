use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use latam_macro_lib::analysis::signals::{DirectionalSignal, OpportunitySignal};
use latam_macro_lib::config::{CountryConfig, DashboardSettings};
use latam_macro_lib::core::orchestrator::DashboardPipeline;
use latam_macro_lib::error::{DashboardError, Result};
use latam_macro_lib::fetcher::SeriesFetcher;
use latam_macro_lib::models::{DataPoint, PriceSeries};
use latam_macro_lib::trackers::{Tracker, TrackerKind, TrackerReading, TrackerSet};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct StaticFetcher {
    series: HashMap<String, Vec<f64>>,
}

impl StaticFetcher {
    fn new() -> Self {
        Self { series: HashMap::new() }
    }

    fn with(mut self, symbol: &str, prices: Vec<f64>) -> Self {
        self.series.insert(symbol.to_string(), prices);
        self
    }
}

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

#[async_trait]
impl SeriesFetcher for StaticFetcher {
    fn name(&self) -> &str {
        "Static"
    }

    async fn fetch_series(&self, symbol: &str, _lookback_days: u32) -> Result<PriceSeries> {
        let prices = self
            .series
            .get(symbol)
            .ok_or_else(|| DashboardError::unavailable(symbol, "unknown ticker"))?;

        let points = prices
            .iter()
            .enumerate()
            .map(|(i, p)| DataPoint::on_date(start_date() + chrono::Duration::days(i as i64), *p))
            .collect();
        Ok(PriceSeries::new(symbol, points))
    }
}

struct SeriesTracker {
    values: Vec<f64>,
}

#[async_trait]
impl Tracker for SeriesTracker {
    fn kind(&self) -> TrackerKind {
        TrackerKind::Sentiment
    }

    fn name(&self) -> &str {
        "Fixture concern index"
    }

    async fn reading(&self, _country: &CountryConfig) -> TrackerReading {
        TrackerReading::Series(
            self.values
                .iter()
                .enumerate()
                .map(|(i, v)| DataPoint::on_date(start_date() + chrono::Duration::days(i as i64), *v))
                .collect(),
        )
    }
}

/// Compounds `returns` from a starting price.
fn prices_from_returns(start: f64, returns: &[f64]) -> Vec<f64> {
    let mut out = vec![start];
    for r in returns {
        let last = *out.last().unwrap();
        out.push(last * (1.0 + r));
    }
    out
}

/// 59 returns: noisy then a quiet final week.
fn equity_prices() -> Vec<f64> {
    let mut returns: Vec<f64> = (0..54).map(|i| if i % 2 == 0 { 0.02 } else { -0.018 }).collect();
    returns.extend([0.001, -0.001, 0.001, -0.001, 0.001]);
    prices_from_returns(30.0, &returns)
}

fn fx_prices(n: usize) -> Vec<f64> {
    let returns: Vec<f64> = (0..n - 1).map(|i| 0.004 * ((i as f64) * 0.7).sin()).collect();
    prices_from_returns(5.0, &returns)
}

fn brazil_settings() -> DashboardSettings {
    DashboardSettings {
        country: "Brazil".into(),
        lookback_days: 90,
        volatility_window: 10,
        zscore_window: 20,
        fetch_delay_ms: 0,
        events_source: None,
    }
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn full_fetcher() -> StaticFetcher {
    StaticFetcher::new()
        .with("EWZ", equity_prices())
        .with("BRL=X", fx_prices(60))
        .with("^BVSP", prices_from_returns(120_000.0, &[0.003; 59]))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_full_render() {
    let pipeline = DashboardPipeline::new(Box::new(full_fetcher()));
    let snap = pipeline.render(&brazil_settings(), as_of()).await.unwrap();

    assert!(snap.issues.is_empty(), "{:?}", snap.issues);
    assert_eq!(snap.history.len(), 60);
    assert_eq!(snap.overview.observations, 60);
    assert!(!snap.overview.local_index_fallback);

    assert!(snap.overview.equity_volatility.is_some());
    assert!(snap.overview.fx_volatility.is_some());
    assert!(snap.divergence.zscore.is_some());
    assert_ne!(snap.divergence.signal, DirectionalSignal::InsufficientData);

    // Quiet last week: +0.1% net, neutral
    let m = snap.momentum.five_day_return.unwrap();
    assert!((m - 0.001).abs() < 1e-12);
    assert_eq!(snap.momentum.signal, DirectionalSignal::Neutral);
    assert!(snap.momentum.volatility_ratio.unwrap() < 1.0);

    // Runoff 8 days out with compressed vol
    let event = snap.gamma.next_event.as_ref().unwrap();
    assert_eq!(event.days_until, 8);
    assert_eq!(snap.gamma.estimator, "realized-vol-proxy");
    assert_eq!(snap.gamma.signal, OpportunitySignal::Opportunity);

    // Placeholder trackers only
    assert_eq!(snap.trackers.len(), 3);
    assert!(snap
        .trackers
        .iter()
        .all(|t| matches!(t.reading, TrackerReading::NotImplemented)));
    assert_eq!(snap.sentiment.signal, DirectionalSignal::InsufficientData);

    // First row has no return; later rows line up with prices
    assert!(snap.history[0].equity_return.is_none());
    let r1 = snap.history[1].equity_return.unwrap();
    assert!((r1 - (snap.history[1].equity_price / snap.history[0].equity_price - 1.0)).abs() < 1e-12);
}

#[tokio::test]
async fn test_missing_fx_degrades_to_no_signal() {
    let fetcher = StaticFetcher::new()
        .with("EWZ", equity_prices())
        .with("^BVSP", prices_from_returns(120_000.0, &[0.003; 59]));

    let pipeline = DashboardPipeline::new(Box::new(fetcher));
    let snap = pipeline.render(&brazil_settings(), as_of()).await.unwrap();

    assert!(snap.issues.iter().any(|i| i.contains("BRL=X")));
    assert!(snap.history.is_empty());
    assert_eq!(snap.overview.equity_price, None);
    assert_eq!(snap.divergence.signal, DirectionalSignal::InsufficientData);
    assert_eq!(snap.momentum.signal, DirectionalSignal::InsufficientData);
    assert_eq!(snap.gamma.signal, OpportunitySignal::InsufficientData);
}

#[tokio::test]
async fn test_local_index_falls_back_to_equity() {
    let fetcher = StaticFetcher::new()
        .with("EWZ", equity_prices())
        .with("BRL=X", fx_prices(60))
        .with("^BVSP", vec![100.0, 101.0, 102.0]);

    let pipeline = DashboardPipeline::new(Box::new(fetcher));
    let snap = pipeline.render(&brazil_settings(), as_of()).await.unwrap();

    assert!(snap.overview.local_index_fallback);
    assert_eq!(snap.overview.local_price, snap.overview.equity_price);
    assert!(snap.issues.is_empty());
}

#[tokio::test]
async fn test_short_history_reports_insufficient_data() {
    let fetcher = StaticFetcher::new()
        .with("EWZ", prices_from_returns(30.0, &[0.01, -0.02, 0.015, 0.0, 0.01, -0.01, 0.02, 0.01, -0.005]))
        .with("BRL=X", fx_prices(10))
        .with("^BVSP", prices_from_returns(120_000.0, &[0.003; 9]));

    let pipeline = DashboardPipeline::new(Box::new(fetcher));
    let snap = pipeline.render(&brazil_settings(), as_of()).await.unwrap();

    assert_eq!(snap.history.len(), 10);
    assert!(snap.issues.iter().any(|i| i.contains("insufficient history")));
    assert_eq!(snap.overview.equity_volatility, None);
    assert_eq!(snap.divergence.signal, DirectionalSignal::InsufficientData);
    assert_eq!(snap.gamma.signal, OpportunitySignal::InsufficientData);
    // Five-day momentum only needs five returns
    assert_ne!(snap.momentum.signal, DirectionalSignal::InsufficientData);
}

#[tokio::test]
async fn test_equity_jump_flags_bearish_divergence() {
    let mut returns: Vec<f64> = (0..58).map(|i| 0.003 * ((i as f64) * 1.3).sin()).collect();
    returns.push(0.10);

    let fetcher = StaticFetcher::new()
        .with("EWZ", prices_from_returns(30.0, &returns))
        .with("BRL=X", fx_prices(60))
        .with("^BVSP", prices_from_returns(120_000.0, &[0.003; 59]));

    let pipeline = DashboardPipeline::new(Box::new(fetcher));
    let snap = pipeline.render(&brazil_settings(), as_of()).await.unwrap();

    assert!(snap.divergence.zscore.unwrap() > 2.0);
    assert_eq!(snap.divergence.signal, DirectionalSignal::Bearish);
    assert_eq!(snap.divergence.action, "Short equities, long FX");
    assert_eq!(snap.momentum.signal, DirectionalSignal::Bullish);
}

#[tokio::test]
async fn test_no_event_within_horizon() {
    let pipeline = DashboardPipeline::new(Box::new(full_fetcher()));
    let far = NaiveDate::from_ymd_opt(2031, 1, 1).unwrap();
    let snap = pipeline.render(&brazil_settings(), far).await.unwrap();

    assert!(snap.gamma.next_event.is_none());
    assert_eq!(snap.gamma.signal, OpportunitySignal::NoOpportunity);
}

#[tokio::test]
async fn test_sentiment_tracker_series_is_classified() {
    let mut concern: Vec<f64> = (0..30).map(|i| 50.0 + (i % 3) as f64).collect();
    concern.push(90.0);

    let trackers = TrackerSet::placeholders().with(Box::new(SeriesTracker { values: concern }));
    let pipeline = DashboardPipeline::new(Box::new(full_fetcher())).with_trackers(trackers);
    let snap = pipeline.render(&brazil_settings(), as_of()).await.unwrap();

    assert!(snap.sentiment.concern_zscore.unwrap() > 1.5);
    assert_eq!(snap.sentiment.signal, DirectionalSignal::Bearish);
    assert_eq!(snap.sentiment.action, "High Public Concern");
}

#[tokio::test]
async fn test_invalid_settings_are_errors() {
    let pipeline = DashboardPipeline::new(Box::new(full_fetcher()));

    let unknown = DashboardSettings { country: "Atlantis".into(), ..brazil_settings() };
    assert!(matches!(
        pipeline.render(&unknown, as_of()).await,
        Err(DashboardError::UnknownCountry(_))
    ));

    let bad_window = DashboardSettings { volatility_window: 2, ..brazil_settings() };
    assert!(matches!(
        pipeline.render(&bad_window, as_of()).await,
        Err(DashboardError::InvalidSetting { .. })
    ));
}

#[tokio::test]
async fn test_render_is_deterministic() {
    let pipeline = DashboardPipeline::new(Box::new(full_fetcher()));
    let a = pipeline.render(&brazil_settings(), as_of()).await.unwrap();
    let b = pipeline.render(&brazil_settings(), as_of()).await.unwrap();

    assert_eq!(a.divergence.zscore, b.divergence.zscore);
    assert_eq!(a.divergence.signal, b.divergence.signal);
    assert_eq!(a.momentum.signal, b.momentum.signal);
    assert_eq!(a.gamma.signal, b.gamma.signal);
}

#[tokio::test]
async fn test_snapshot_serializes_to_json() {
    let pipeline = DashboardPipeline::new(Box::new(full_fetcher()));
    let snap = pipeline.render(&brazil_settings(), as_of()).await.unwrap();

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["country"]["equity_ticker"], "EWZ");
    assert_eq!(json["gamma"]["signal"], "opportunity");
    assert_eq!(json["trackers"][0]["reading"]["status"], "not_implemented");
}
