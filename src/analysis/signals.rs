use serde::Serialize;

use crate::config::SignalThresholds;

// =============================================================================
// SIGNAL CLASSIFIER
// Maps model statistics onto fixed thresholds. Every function here is pure:
// same inputs, same label, and a missing statistic always yields
// `InsufficientData`.
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DirectionalSignal {
    Bullish,
    Bearish,
    Neutral,
    InsufficientData,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OpportunitySignal {
    Opportunity,
    Monitor,
    NoOpportunity,
    InsufficientData,
}

impl DirectionalSignal {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bullish => "BULLISH",
            Self::Bearish => "BEARISH",
            Self::Neutral => "NEUTRAL",
            Self::InsufficientData => "NO DATA",
        }
    }
}

impl OpportunitySignal {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Opportunity => "OPPORTUNITY",
            Self::Monitor => "MONITOR",
            Self::NoOpportunity => "NONE",
            Self::InsufficientData => "NO DATA",
        }
    }
}

// =============================================================================
// PER-MODEL CLASSIFIERS
// =============================================================================

/// FX/equity spread: a stretched positive spread means equities ran ahead of
/// the currency (fade equities), a stretched negative one the reverse.
pub fn classify_divergence(zscore: Option<f64>, t: &SignalThresholds) -> DirectionalSignal {
    match zscore {
        Some(z) if !z.is_finite() => DirectionalSignal::InsufficientData,
        Some(z) if z > t.divergence_zscore => DirectionalSignal::Bearish,
        Some(z) if z < -t.divergence_zscore => DirectionalSignal::Bullish,
        Some(_) => DirectionalSignal::Neutral,
        None => DirectionalSignal::InsufficientData,
    }
}

pub fn divergence_action(signal: DirectionalSignal) -> &'static str {
    match signal {
        DirectionalSignal::Bearish => "Short equities, long FX",
        DirectionalSignal::Bullish => "Long equities, short FX",
        DirectionalSignal::Neutral => "No divergence",
        DirectionalSignal::InsufficientData => "Not enough data",
    }
}

/// 5-day momentum against a symmetric return band.
pub fn classify_momentum(momentum: Option<f64>, t: &SignalThresholds) -> DirectionalSignal {
    match momentum {
        Some(m) if !m.is_finite() => DirectionalSignal::InsufficientData,
        Some(m) if m > t.momentum_return => DirectionalSignal::Bullish,
        Some(m) if m < -t.momentum_return => DirectionalSignal::Bearish,
        Some(_) => DirectionalSignal::Neutral,
        None => DirectionalSignal::InsufficientData,
    }
}

pub fn momentum_action(signal: DirectionalSignal) -> &'static str {
    match signal {
        DirectionalSignal::Bullish => "Positive Momentum",
        DirectionalSignal::Bearish => "Negative Momentum",
        DirectionalSignal::Neutral => "Neutral",
        DirectionalSignal::InsufficientData => "Not enough data",
    }
}

/// Gamma: cheap implied vol ahead of an imminent binary event.
///
/// `days_to_event` is `None` when the calendar has nothing upcoming for the
/// country; `vol_ratio` is the implied-vol estimate over its baseline.
pub fn classify_gamma(
    days_to_event: Option<i64>,
    vol_ratio: Option<f64>,
    t: &SignalThresholds,
) -> OpportunitySignal {
    let ratio = match vol_ratio {
        Some(r) if r.is_finite() => r,
        _ => return OpportunitySignal::InsufficientData,
    };

    let imminent = matches!(days_to_event, Some(d) if (0..=t.event_horizon_days).contains(&d));

    if !imminent {
        OpportunitySignal::NoOpportunity
    } else if ratio < t.cheap_vol_ratio {
        OpportunitySignal::Opportunity
    } else {
        OpportunitySignal::Monitor
    }
}

pub fn gamma_action(signal: OpportunitySignal) -> &'static str {
    match signal {
        OpportunitySignal::Opportunity => "Event ahead with cheap vol: consider buying gamma",
        OpportunitySignal::Monitor => "Event ahead, vol not cheap",
        OpportunitySignal::NoOpportunity => "No event within horizon",
        OpportunitySignal::InsufficientData => "Not enough data",
    }
}

/// Public-concern sentiment. Only the upside is a signal.
pub fn classify_sentiment(concern_zscore: Option<f64>, t: &SignalThresholds) -> DirectionalSignal {
    match concern_zscore {
        Some(z) if !z.is_finite() => DirectionalSignal::InsufficientData,
        Some(z) if z > t.concern_zscore => DirectionalSignal::Bearish,
        Some(_) => DirectionalSignal::Neutral,
        None => DirectionalSignal::InsufficientData,
    }
}

pub fn sentiment_action(signal: DirectionalSignal) -> &'static str {
    match signal {
        DirectionalSignal::Bearish => "High Public Concern",
        DirectionalSignal::InsufficientData => "Not enough data",
        _ => "Normal Concern",
    }
}
