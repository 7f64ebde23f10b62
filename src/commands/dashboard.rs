use std::fmt::Write;

use crate::config::Catalog;
use crate::core::orchestrator::DashboardSnapshot;
use crate::trackers::TrackerReading;

const SPARK_TICKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 60;

/// Text sparkline of the last `width` values.
pub fn sparkline(values: &[f64], width: usize) -> String {
    let tail = &values[values.len().saturating_sub(width)..];
    let (min, max) = tail
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));

    let span = max - min;
    tail.iter()
        .map(|v| {
            if span <= 0.0 || !span.is_finite() {
                SPARK_TICKS[SPARK_TICKS.len() / 2]
            } else {
                let idx = ((v - min) / span * (SPARK_TICKS.len() - 1) as f64).round() as usize;
                SPARK_TICKS[idx.min(SPARK_TICKS.len() - 1)]
            }
        })
        .collect()
}

fn opt(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map(f).unwrap_or_else(|| "N/A".to_string())
}

fn pct(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

pub fn render_catalog() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} | {:<8} | {:<8} | {:<10}", "Country", "Equity", "FX", "Local Index");
    let _ = writeln!(out, "{}", "-".repeat(48));
    for c in Catalog::countries() {
        let _ = writeln!(
            out,
            "{:<12} | {:<8} | {:<8} | {:<10}",
            c.name, c.equity_ticker, c.fx_ticker, c.local_index_ticker
        );
    }
    out
}

pub fn render_text(snap: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let c = &snap.country;
    let o = &snap.overview;

    let _ = writeln!(out, "🌎 Latam Macro Trading Dashboard");
    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(
        out,
        "Country: {}  |  Lookback: {}d  |  Vol window: {}d  |  As of: {}",
        c.name, snap.settings.lookback_days, snap.settings.volatility_window, snap.as_of
    );

    // Market overview
    let _ = writeln!(out, "\n📈 Market Overview - {}", c.name);
    let _ = writeln!(out, "{}", "-".repeat(70));
    if snap.history.is_empty() {
        let _ = writeln!(out, "Not enough data for price chart.");
    } else {
        let equity: Vec<f64> = snap.history.iter().map(|r| r.equity_price).collect();
        let fx: Vec<f64> = snap.history.iter().map(|r| r.fx_price).collect();
        let _ = writeln!(out, "{:<10} {}", c.equity_ticker, sparkline(&equity, SPARK_WIDTH));
        let _ = writeln!(out, "{:<10} {}", c.fx_ticker, sparkline(&fx, SPARK_WIDTH));
    }

    let _ = writeln!(out, "\n📊 Key Metrics");
    let _ = writeln!(out, "{:<22} | {:>12}", "Metric", "Value");
    let _ = writeln!(out, "{}", "-".repeat(37));
    let _ = writeln!(out, "{:<22} | {:>12}", "Equity ETF", opt(o.equity_price, |v| format!("${v:.2}")));
    let _ = writeln!(out, "{:<22} | {:>12}", "FX Rate", opt(o.fx_price, |v| format!("{v:.4}")));
    let local_label = if o.local_index_fallback { "Local Index (ETF)" } else { "Local Index" };
    let _ = writeln!(out, "{:<22} | {:>12}", local_label, opt(o.local_price, |v| format!("{v:.2}")));
    let _ = writeln!(out, "{:<22} | {:>12}", "Equity Volatility", opt(o.equity_volatility, pct));
    let _ = writeln!(out, "{:<22} | {:>12}", "FX Volatility", opt(o.fx_volatility, pct));
    let _ = writeln!(out, "{:<22} | {:>12}", "Observations", o.observations);

    // Models
    let _ = writeln!(out, "\n{:<22} | {:<26} | {:<12} | {}", "Model", "Statistic", "Signal", "Action");
    let _ = writeln!(out, "{}", "-".repeat(90));

    let d = &snap.divergence;
    let _ = writeln!(
        out,
        "{:<22} | {:<26} | {:<12} | {}",
        "🔄 FX/Equity Spread",
        format!("z = {}", opt(d.zscore, |v| format!("{v:.2}"))),
        d.signal.label(),
        d.action
    );

    let m = &snap.momentum;
    let _ = writeln!(
        out,
        "{:<22} | {:<26} | {:<12} | {}",
        "⚡️ Momentum (5d)",
        format!(
            "{} / vol ratio {}",
            opt(m.five_day_return, |v| format!("{:+.2}%", v * 100.0)),
            opt(m.volatility_ratio, |v| format!("{v:.2}"))
        ),
        m.signal.label(),
        m.action
    );

    let g = &snap.gamma;
    let event = g
        .next_event
        .as_ref()
        .map(|e| format!("{} in {}d", e.event.name, e.days_until))
        .unwrap_or_else(|| "no event".to_string());
    let _ = writeln!(
        out,
        "{:<22} | {:<26} | {:<12} | {}",
        "🎯 Event Gamma",
        format!("vol ratio {}", opt(g.cheapness_ratio, |v| format!("{v:.2}"))),
        g.signal.label(),
        format!("{} ({event}, {})", g.action, g.estimator)
    );

    let s = &snap.sentiment;
    let _ = writeln!(
        out,
        "{:<22} | {:<26} | {:<12} | {}",
        "📊 Sentiment",
        format!("concern z = {}", opt(s.concern_zscore, |v| format!("{v:.2}"))),
        s.signal.label(),
        s.action
    );

    // Trackers
    let _ = writeln!(out, "\n🛰  Trackers");
    for t in &snap.trackers {
        let status = match &t.reading {
            TrackerReading::NotImplemented => "not yet implemented".to_string(),
            TrackerReading::Unavailable(reason) => format!("unavailable ({reason})"),
            TrackerReading::Series(points) => format!("{} observations", points.len()),
        };
        let _ = writeln!(out, "  - {:<32} {}", t.name, status);
    }

    if !snap.issues.is_empty() {
        let _ = writeln!(out, "\n⚠️  Data issues");
        for issue in &snap.issues {
            let _ = writeln!(out, "  - {issue}");
        }
    }

    let _ = writeln!(out, "\n{}", "-".repeat(70));
    let _ = writeln!(
        out,
        "Data from Yahoo Finance. Last updated: {}",
        snap.generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    out
}
