use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::analysis::divergence::{self, DivergencePoint};
use crate::analysis::gamma::{ImpliedVolEstimator, RealizedVolProxy};
use crate::analysis::momentum::{self, MomentumPoint};
use crate::analysis::returns::{VolatilityCalculator, VolatilityProfile};
use crate::analysis::signals::{self, DirectionalSignal, OpportunitySignal};
use crate::analysis::statistics;
use crate::config::{Catalog, CountryConfig, DashboardSettings, SignalThresholds, THRESHOLDS};
use crate::core::rate_limiter::RateLimiter;
use crate::core::timeseries::{self, MultiAlignedData};
use crate::error::{DashboardError, Result};
use crate::fetcher::calendar::{EventCalendar, UpcomingEvent};
use crate::fetcher::SeriesFetcher;
use crate::models::{latest_defined, PriceSeries};
use crate::trackers::{TrackerKind, TrackerReading, TrackerSet, TrackerStatus};

/// A local index with this many points or fewer is replaced by the equity ETF.
const MIN_LOCAL_INDEX_POINTS: usize = 5;

// ============================================================================
// SNAPSHOT TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub equity_price: f64,
    pub fx_price: f64,
    pub local_price: f64,
    pub equity_return: Option<f64>,
    pub fx_return: Option<f64>,
    pub spread_zscore: Option<f64>,
    pub equity_volatility: Option<f64>,
    pub fx_volatility: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketOverview {
    pub equity_price: Option<f64>,
    pub fx_price: Option<f64>,
    pub local_price: Option<f64>,
    pub equity_volatility: Option<f64>,
    pub fx_volatility: Option<f64>,
    pub local_volatility: Option<f64>,
    /// True when the local index column is a copy of the equity ETF
    pub local_index_fallback: bool,
    pub observations: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DivergenceReport {
    pub spread: Option<f64>,
    pub zscore: Option<f64>,
    pub signal: DirectionalSignal,
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MomentumReport {
    pub five_day_return: Option<f64>,
    pub volatility_ratio: Option<f64>,
    pub signal: DirectionalSignal,
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GammaReport {
    pub next_event: Option<UpcomingEvent>,
    pub estimator: String,
    pub implied_vol: Option<f64>,
    pub baseline_vol: Option<f64>,
    pub cheapness_ratio: Option<f64>,
    pub signal: OpportunitySignal,
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentReport {
    pub concern_zscore: Option<f64>,
    pub signal: DirectionalSignal,
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub country: CountryConfig,
    pub settings: DashboardSettings,
    pub as_of: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub overview: MarketOverview,
    pub history: Vec<HistoryRow>,
    pub divergence: DivergenceReport,
    pub momentum: MomentumReport,
    pub gamma: GammaReport,
    pub sentiment: SentimentReport,
    pub trackers: Vec<TrackerStatus>,
    /// Data problems met during this render; each one degrades some signal to "no data"
    pub issues: Vec<String>,
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct DashboardPipeline {
    fetcher: Box<dyn SeriesFetcher>,
    calendar: EventCalendar,
    trackers: TrackerSet,
    estimator: Box<dyn ImpliedVolEstimator>,
    thresholds: SignalThresholds,
    limiter: RateLimiter,
}

impl DashboardPipeline {
    pub fn new(fetcher: Box<dyn SeriesFetcher>) -> Self {
        Self {
            fetcher,
            calendar: EventCalendar::placeholder(),
            trackers: TrackerSet::placeholders(),
            estimator: Box::new(RealizedVolProxy::default()),
            thresholds: (*THRESHOLDS).clone(),
            limiter: RateLimiter::new(0),
        }
    }

    pub fn with_calendar(mut self, calendar: EventCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_trackers(mut self, trackers: TrackerSet) -> Self {
        self.trackers = trackers;
        self
    }

    pub fn with_estimator(mut self, estimator: Box<dyn ImpliedVolEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_rate_limit(mut self, base_ms: u64) -> Self {
        self.limiter = RateLimiter::new(base_ms);
        self
    }

    /// Fetch failures are recorded in `issues` and yield `None`.
    async fn fetch_or_note(
        &self,
        symbol: &str,
        lookback_days: u32,
        issues: &mut Vec<String>,
    ) -> Option<PriceSeries> {
        match self.fetcher.fetch_series(symbol, lookback_days).await {
            Ok(series) if !series.is_empty() => Some(series),
            Ok(_) => {
                let err = DashboardError::unavailable(symbol, "empty series");
                tracing::warn!(error = %err, "fetch returned nothing");
                issues.push(err.to_string());
                None
            }
            Err(err) => {
                tracing::warn!(source = self.fetcher.name(), error = %err, "fetch failed");
                issues.push(err.to_string());
                None
            }
        }
    }

    /// One fetch-compute-classify pass for the selected country.
    ///
    /// Only invalid settings are errors. Missing data degrades the affected
    /// models to `InsufficientData`.
    pub async fn render(&self, settings: &DashboardSettings, as_of: NaiveDate) -> Result<DashboardSnapshot> {
        settings.validate()?;
        let country = Catalog::get(&settings.country)?;
        let mut issues = Vec::new();

        tracing::info!(
            country = %country.name,
            lookback = settings.lookback_days,
            vol_window = settings.volatility_window,
            "rendering dashboard"
        );

        // 1. Fetch
        let equity = self.fetch_or_note(&country.equity_ticker, settings.lookback_days, &mut issues).await;
        self.limiter.wait().await;
        let fx = self.fetch_or_note(&country.fx_ticker, settings.lookback_days, &mut issues).await;
        self.limiter.wait().await;
        let local = self.fetch_or_note(&country.local_index_ticker, settings.lookback_days, &mut issues).await;

        // 2. Align on the equity calendar
        let local = local.filter(|s| s.len() > MIN_LOCAL_INDEX_POINTS);
        let local_index_fallback = local.is_none();
        if local_index_fallback {
            tracing::info!(ticker = %country.local_index_ticker, "local index unusable, falling back to equity ETF");
        }

        let rows: Vec<MultiAlignedData> = match (&equity, &fx) {
            (Some(eq), Some(fx)) => {
                let local_points = local.as_ref().unwrap_or(eq).points();
                timeseries::align_series_multi(eq.points(), &[fx.points(), local_points])
            }
            _ => Vec::new(),
        };

        let required = settings.zscore_window.max(settings.volatility_window) + 1;
        if !rows.is_empty() && rows.len() < required {
            issues.push(
                DashboardError::InsufficientHistory { required, got: rows.len() }.to_string(),
            );
        }

        let equity_prices = timeseries::column(&country.equity_ticker, &rows, 0);
        let fx_prices = timeseries::column(&country.fx_ticker, &rows, 1);
        let local_prices = timeseries::column(&country.local_index_ticker, &rows, 2);

        // 3. Calculators
        let vol = VolatilityCalculator::new(settings.volatility_window);
        let equity_profile = vol.profile(&equity_prices);
        let fx_profile = vol.profile(&fx_prices);
        let local_profile = vol.profile(&local_prices);

        let spread = divergence::calculate_divergence(
            &equity_profile.returns,
            &fx_profile.returns,
            settings.zscore_window,
        );
        let momentum_series = momentum::calculate_momentum(&equity_profile.returns);
        let vol_estimate = self.estimator.estimate(&equity_profile.returns);

        // 4. Trackers
        let trackers = self.trackers.poll_all(country).await;

        // 5. Classify
        let divergence = self.divergence_report(&spread);
        let momentum = self.momentum_report(&momentum_series);

        let next_event = self.calendar.next_event(&country.name, as_of);
        let cheapness_ratio = vol_estimate.and_then(|e| e.cheapness_ratio());
        let gamma_signal = signals::classify_gamma(
            next_event.as_ref().map(|e| e.days_until),
            cheapness_ratio,
            &self.thresholds,
        );
        let gamma = GammaReport {
            next_event,
            estimator: self.estimator.name().to_string(),
            implied_vol: vol_estimate.map(|e| e.current),
            baseline_vol: vol_estimate.map(|e| e.baseline),
            cheapness_ratio,
            signal: gamma_signal,
            action: signals::gamma_action(gamma_signal).to_string(),
        };

        let sentiment = self.sentiment_report(&trackers, settings.zscore_window);

        let overview = MarketOverview {
            equity_price: equity_prices.latest().map(|dp| dp.value),
            fx_price: fx_prices.latest().map(|dp| dp.value),
            local_price: local_prices.latest().map(|dp| dp.value),
            equity_volatility: equity_profile.latest_volatility(),
            fx_volatility: fx_profile.latest_volatility(),
            local_volatility: local_profile.latest_volatility(),
            local_index_fallback,
            observations: rows.len(),
        };

        let history = build_history(&rows, &equity_profile, &fx_profile, &spread);

        Ok(DashboardSnapshot {
            country: country.clone(),
            settings: settings.clone(),
            as_of,
            generated_at: Utc::now(),
            overview,
            history,
            divergence,
            momentum,
            gamma,
            sentiment,
            trackers,
            issues,
        })
    }

    fn divergence_report(&self, spread: &[DivergencePoint]) -> DivergenceReport {
        let zscore = divergence::latest_zscore(spread);
        let signal = signals::classify_divergence(zscore, &self.thresholds);
        DivergenceReport {
            spread: spread.last().map(|p| p.spread),
            zscore,
            signal,
            action: signals::divergence_action(signal).to_string(),
        }
    }

    fn momentum_report(&self, series: &[MomentumPoint]) -> MomentumReport {
        let last = series.last();
        let five_day_return = last.and_then(|p| p.momentum);
        let signal = signals::classify_momentum(five_day_return, &self.thresholds);
        MomentumReport {
            five_day_return,
            volatility_ratio: last.and_then(|p| p.volatility_ratio),
            signal,
            action: signals::momentum_action(signal).to_string(),
        }
    }

    fn sentiment_report(&self, trackers: &[TrackerStatus], window: usize) -> SentimentReport {
        let concern_zscore = trackers
            .iter()
            .find(|t| t.kind == TrackerKind::Sentiment)
            .and_then(|t| match &t.reading {
                TrackerReading::Series(points) => {
                    latest_defined(&statistics::rolling_zscore(points, window))
                }
                _ => None,
            });

        let signal = signals::classify_sentiment(concern_zscore, &self.thresholds);
        SentimentReport {
            concern_zscore,
            signal,
            action: signals::sentiment_action(signal).to_string(),
        }
    }
}

/// Row i pairs with returns/spread index i - 1; all are keyed on the same dates.
fn build_history(
    rows: &[MultiAlignedData],
    equity: &VolatilityProfile,
    fx: &VolatilityProfile,
    spread: &[DivergencePoint],
) -> Vec<HistoryRow> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let r = i.checked_sub(1);
            HistoryRow {
                date: row.date,
                equity_price: row.values[0],
                fx_price: row.values[1],
                local_price: row.values[2],
                equity_return: r.and_then(|j| equity.returns.points().get(j)).map(|dp| dp.value),
                fx_return: r.and_then(|j| fx.returns.points().get(j)).map(|dp| dp.value),
                spread_zscore: r.and_then(|j| spread.get(j)).and_then(|p| p.zscore),
                equity_volatility: r.and_then(|j| equity.volatility.get(j)).and_then(|p| p.value),
                fx_volatility: r.and_then(|j| fx.volatility.get(j)).and_then(|p| p.value),
            }
        })
        .collect()
}
