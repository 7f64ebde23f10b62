use async_trait::async_trait;

use super::{Tracker, TrackerKind, TrackerReading};
use crate::config::CountryConfig;

pub struct PlaceholderTracker {
    kind: TrackerKind,
    name: String,
}

impl PlaceholderTracker {
    pub fn new(kind: TrackerKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl Tracker for PlaceholderTracker {
    fn kind(&self) -> TrackerKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn reading(&self, _country: &CountryConfig) -> TrackerReading {
        TrackerReading::NotImplemented
    }
}
