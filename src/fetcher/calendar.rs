//! Scheduled binary events per country.
//!
//! There is no live calendar integration: the built-in list is a static
//! placeholder. Extra events can be merged from a JSON file or URL holding an
//! array of `CalendarEvent`.

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Election,
    MonetaryPolicy,
    Fiscal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub country: String,
    pub date: NaiveDate,
    pub name: String,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingEvent {
    pub event: CalendarEvent,
    pub days_until: i64,
}

#[derive(Debug, Clone, Default)]
pub struct EventCalendar {
    events: Vec<CalendarEvent>,
}

fn ev(country: &str, y: i32, m: u32, d: u32, name: &str, kind: EventKind) -> Option<CalendarEvent> {
    Some(CalendarEvent {
        country: country.to_string(),
        date: NaiveDate::from_ymd_opt(y, m, d)?,
        name: name.to_string(),
        kind,
    })
}

impl EventCalendar {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        let mut cal = Self { events };
        cal.events.sort_by_key(|e| e.date);
        cal
    }

    /// Built-in placeholder schedule.
    pub fn placeholder() -> Self {
        use EventKind::*;

        let events = [
            ev("Brazil", 2026, 10, 25, "Presidential runoff", Election),
            ev("Brazil", 2026, 11, 4, "Copom rate decision", MonetaryPolicy),
            ev("Brazil", 2026, 12, 9, "Copom rate decision", MonetaryPolicy),
            ev("Mexico", 2026, 11, 12, "Banxico rate decision", MonetaryPolicy),
            ev("Mexico", 2026, 12, 17, "Banxico rate decision", MonetaryPolicy),
            ev("Chile", 2026, 10, 28, "BCCh rate decision", MonetaryPolicy),
            ev("Chile", 2026, 12, 16, "BCCh rate decision", MonetaryPolicy),
            ev("Argentina", 2026, 11, 15, "Budget bill vote", Fiscal),
            ev("Argentina", 2026, 12, 10, "IMF program review", Fiscal),
            ev("Peru", 2026, 11, 12, "BCRP rate decision", MonetaryPolicy),
            ev("Peru", 2026, 12, 10, "BCRP rate decision", MonetaryPolicy),
        ];

        Self::new(events.into_iter().flatten().collect())
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn merge(&mut self, extra: Vec<CalendarEvent>) {
        self.events.extend(extra);
        self.events.sort_by_key(|e| e.date);
        self.events.dedup();
    }

    /// Soonest event for `country` on or after `as_of`.
    pub fn next_event(&self, country: &str, as_of: NaiveDate) -> Option<UpcomingEvent> {
        self.upcoming(country, as_of).into_iter().next()
    }

    /// All events for `country` on or after `as_of`, soonest first.
    pub fn upcoming(&self, country: &str, as_of: NaiveDate) -> Vec<UpcomingEvent> {
        self.events
            .iter()
            .filter(|e| e.country.eq_ignore_ascii_case(country) && e.date >= as_of)
            .map(|e| UpcomingEvent {
                event: e.clone(),
                days_until: (e.date - as_of).num_days(),
            })
            .collect()
    }

    pub fn from_json_str(json: &str) -> Result<Vec<CalendarEvent>> {
        serde_json::from_str(json).map_err(|e| DashboardError::Calendar(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Vec<CalendarEvent>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Calendar(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub async fn fetch_json(url: &str) -> anyhow::Result<Vec<CalendarEvent>> {
        let client = reqwest::Client::new();
        let resp = client.get(url).send().await.context("calendar request failed")?;

        if !resp.status().is_success() {
            return Err(anyhow!("Calendar source error: {}", resp.status()));
        }

        let events: Vec<CalendarEvent> = resp.json().await?;
        Ok(events)
    }

    /// Placeholder schedule plus whatever `source` (path or URL) provides.
    /// A broken source is logged and skipped.
    pub async fn load(source: Option<&str>) -> Self {
        let mut cal = Self::placeholder();

        let Some(source) = source else {
            return cal;
        };

        let extra = if source.starts_with("http://") || source.starts_with("https://") {
            Self::fetch_json(source).await.map_err(|e| e.to_string())
        } else {
            Self::from_json_file(Path::new(source)).map_err(|e| e.to_string())
        };

        match extra {
            Ok(events) => {
                tracing::info!(source, count = events.len(), "merged calendar events");
                cal.merge(events);
            }
            Err(e) => tracing::warn!(source, error = %e, "ignoring calendar source"),
        }

        cal
    }
}
