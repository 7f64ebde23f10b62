//! Latam macro dashboard CLI.
//!
//! Every flag falls back to its `LATAM_*` environment variable (see
//! `DashboardSettings::from_env`), then to the built-in default.

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;

use latam_macro_lib::commands::dashboard;
use latam_macro_lib::config::DashboardSettings;
use latam_macro_lib::core::orchestrator::DashboardPipeline;
use latam_macro_lib::fetcher::calendar::EventCalendar;
use latam_macro_lib::fetcher::yahoo::YahooFetcher;
use latam_macro_lib::trackers::TrackerSet;

#[derive(Parser, Debug)]
#[command(
    name = "latam-dashboard",
    version,
    about = "Equity/FX divergence, momentum and event-gamma signals for Latam markets"
)]
struct Cli {
    /// Country to analyse (see --list)
    #[arg(long, short)]
    country: Option<String>,

    /// Lookback period in days
    #[arg(long, value_parser = clap::value_parser!(u32).range(30..=365))]
    lookback: Option<u32>,

    /// Volatility calculation window in days
    #[arg(long, value_parser = clap::value_parser!(u64).range(5..=30))]
    vol_window: Option<u64>,

    /// Calendar date used for event proximity (YYYY-MM-DD, default today)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Emit the snapshot as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print the instrument catalog and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    latam_macro_lib::init_tracing();
    let cli = Cli::parse();

    if cli.list {
        print!("{}", dashboard::render_catalog());
        return Ok(());
    }

    let mut settings = DashboardSettings::from_env();
    if let Some(country) = cli.country {
        settings.country = country;
    }
    if let Some(lookback) = cli.lookback {
        settings.lookback_days = lookback;
    }
    if let Some(window) = cli.vol_window {
        settings.volatility_window = window as usize;
    }
    settings.validate().context("invalid dashboard settings")?;

    let calendar = EventCalendar::load(settings.events_source.as_deref()).await;
    let pipeline = DashboardPipeline::new(Box::new(YahooFetcher::new()))
        .with_calendar(calendar)
        .with_trackers(TrackerSet::placeholders())
        .with_rate_limit(settings.fetch_delay_ms);

    let as_of = cli.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let snapshot = pipeline.render(&settings, as_of).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", dashboard::render_text(&snapshot));
    }

    Ok(())
}
