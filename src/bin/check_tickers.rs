use latam_macro_lib::config::Catalog;
use latam_macro_lib::fetcher::yahoo::YahooFetcher;
use latam_macro_lib::fetcher::SeriesFetcher;
use latam_macro_lib::core::rate_limiter::RateLimiter;

/// Downloads one month of every configured ticker and prints the first rows.
#[tokio::main]
async fn main() {
    latam_macro_lib::init_tracing();

    let fetcher = YahooFetcher::new();
    let limiter = RateLimiter::new(500);

    println!("🔍 Diagnostic - {} countries", Catalog::countries().len());

    for country in Catalog::countries() {
        for ticker in country.tickers() {
            println!("\nTesting ticker: {} ({})", ticker, country.name);
            println!("{:<12} | {:>12}", "Date", "Close");
            println!("{}", "-".repeat(27));

            match fetcher.fetch_series(ticker, 30).await {
                Ok(series) => {
                    for dp in series.points().iter().take(5) {
                        println!("{:<12} | {:>12.4}", dp.date().to_string(), dp.value);
                    }
                    println!("... {} rows", series.len());
                }
                Err(e) => println!("❌ {}", e),
            }

            limiter.wait().await;
        }
    }
    println!("\nDone.");
}
