use async_trait::async_trait;
use serde::Serialize;

use crate::config::CountryConfig;
use crate::models::DataPoint;

pub mod placeholder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerKind {
    Polling,
    Cds,
    Sentiment,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum TrackerReading {
    /// No integration exists yet for this tracker.
    NotImplemented,
    /// Integration exists but produced nothing this cycle.
    Unavailable(String),
    Series(Vec<DataPoint>),
}

#[async_trait]
pub trait Tracker: Send + Sync {
    fn kind(&self) -> TrackerKind;

    fn name(&self) -> &str;

    async fn reading(&self, country: &CountryConfig) -> TrackerReading;
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackerStatus {
    pub kind: TrackerKind,
    pub name: String,
    pub reading: TrackerReading,
}

/// The set of auxiliary trackers a dashboard render consults.
pub struct TrackerSet {
    trackers: Vec<Box<dyn Tracker>>,
}

impl TrackerSet {
    pub fn new(trackers: Vec<Box<dyn Tracker>>) -> Self {
        Self { trackers }
    }

    pub fn empty() -> Self {
        Self { trackers: Vec::new() }
    }

    /// Polling, CDS and sentiment, none of them wired to a source yet.
    pub fn placeholders() -> Self {
        use placeholder::PlaceholderTracker;

        Self::new(vec![
            Box::new(PlaceholderTracker::new(TrackerKind::Polling, "Election polling")),
            Box::new(PlaceholderTracker::new(TrackerKind::Cds, "Sovereign CDS 5Y")),
            Box::new(PlaceholderTracker::new(TrackerKind::Sentiment, "Public concern (search trends)")),
        ])
    }

    /// Replaces any tracker of the same kind.
    pub fn with(mut self, tracker: Box<dyn Tracker>) -> Self {
        let kind = tracker.kind();
        self.trackers.retain(|t| t.kind() != kind);
        self.trackers.push(tracker);
        self
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    pub async fn poll_all(&self, country: &CountryConfig) -> Vec<TrackerStatus> {
        let mut out = Vec::with_capacity(self.trackers.len());
        for tracker in &self.trackers {
            let reading = tracker.reading(country).await;
            if let TrackerReading::Unavailable(reason) = &reading {
                tracing::warn!(tracker = tracker.name(), country = %country.name, %reason, "tracker unavailable");
            }
            out.push(TrackerStatus {
                kind: tracker.kind(),
                name: tracker.name().to_string(),
                reading,
            });
        }
        out
    }
}

impl Default for TrackerSet {
    fn default() -> Self {
        Self::placeholders()
    }
}
