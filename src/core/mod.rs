pub mod timeseries;
pub mod rate_limiter;
pub mod orchestrator;
