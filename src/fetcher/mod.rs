use async_trait::async_trait;
use crate::error::Result;
use crate::models::PriceSeries;

pub mod yahoo;
pub mod calendar;

#[async_trait]
pub trait SeriesFetcher: Send + Sync {
    fn name(&self) -> &str;

    /// Daily closes for `symbol` covering the last `lookback_days` calendar days.
    /// An empty response is a `DataUnavailable` error, never an empty series.
    async fn fetch_series(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries>;
}
