use crate::error::{DashboardError, Result};
use crate::models::{DataPoint, PriceSeries};
use super::SeriesFetcher;
use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
use yahoo_finance_api as yahoo;
use time::OffsetDateTime;

/// Local hour from which a bar is read as the next day's session.
///
/// `gmtoffset` is the exchange's offset today, so bars from the other side of
/// a DST change are off by an hour and a midnight stamp lands at 23:00.
const LATE_STAMP_HOUR: u32 = 22;

/// Trading date of a daily bar, in the exchange's local calendar.
///
/// Yahoo stamps daily bars at the session start in exchange time. FX pairs
/// trade on London time, so a summer bar for Tuesday carries a Monday 23:00
/// UTC timestamp.
pub fn session_date(epoch: i64, gmtoffset: i32) -> Option<NaiveDate> {
    let offset = FixedOffset::east_opt(gmtoffset)?;
    let local = Utc.timestamp_opt(epoch, 0).single()?.with_timezone(&offset);
    if local.hour() >= LATE_STAMP_HOUR {
        local.date_naive().succ_opt()
    } else {
        Some(local.date_naive())
    }
}

pub struct YahooFetcher;

impl YahooFetcher {
    pub fn new() -> Self {
        YahooFetcher
    }
}

impl Default for YahooFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeriesFetcher for YahooFetcher {
    fn name(&self) -> &str {
        "Yahoo"
    }

    async fn fetch_series(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| DashboardError::unavailable(symbol, format!("failed to init Yahoo connector: {e}")))?;

        // Yahoo API uses the 'time' crate instead of 'chrono'
        let now = OffsetDateTime::now_utc();
        let start = now - time::Duration::days(i64::from(lookback_days));

        tracing::debug!(symbol, lookback_days, "requesting Yahoo quote history");

        let resp = provider
            .get_quote_history(symbol, start, now)
            .await
            .map_err(|e| DashboardError::unavailable(symbol, format!("Yahoo API error: {e}")))?;

        let quotes = resp
            .quotes()
            .map_err(|e| DashboardError::unavailable(symbol, format!("failed to parse Yahoo quotes: {e}")))?;

        let gmtoffset = match resp.metadata() {
            Ok(meta) => meta.gmtoffset,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "no exchange metadata, dating bars in UTC");
                0
            }
        };

        // Points sit at midnight UTC of the exchange-local date so every
        // ticker shares one calendar during alignment.
        let data_points: Vec<DataPoint> = quotes
            .iter()
            .filter_map(|quote| {
                session_date(quote.timestamp as i64, gmtoffset)
                    .map(|date| DataPoint::on_date(date, quote.close))
            })
            .collect();

        let series = PriceSeries::new(symbol, data_points);
        if series.is_empty() {
            return Err(DashboardError::unavailable(symbol, "no data returned"));
        }

        tracing::info!(symbol, points = series.len(), "fetched price series");
        Ok(series)
    }
}
