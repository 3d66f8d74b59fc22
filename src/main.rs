use coinfalcon::core::config::ExchangeConfig;
use coinfalcon::core::traits::MarketDataSource;
use coinfalcon::exchanges::coinfalcon::build_connector;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    #[cfg(feature = "env-file")]
    let config = ExchangeConfig::from_env_file("COINFALCON");
    #[cfg(not(feature = "env-file"))]
    let config = ExchangeConfig::from_env("COINFALCON");

    // Public endpoints work without credentials
    let config = config.unwrap_or_else(|e| {
        warn!("No CoinFalcon credentials ({}), using public endpoints only", e);
        ExchangeConfig::read_only()
    });

    let coinfalcon = build_connector(config)?;

    println!("Fetching markets...");
    let markets = coinfalcon.fetch_markets().await?;
    println!("Found {} markets", markets.len());
    for market in markets.iter().take(5) {
        println!(
            "Market: {} ({} -> {}), amount precision {:?}, price precision {:?}",
            market.symbol, market.base, market.quote, market.precision.amount, market.precision.price
        );
    }

    if let Some(market) = markets.first() {
        match coinfalcon.fetch_ticker(&market.symbol).await {
            Ok(ticker) => println!(
                "{} last {:?}, 24h change {:?}, volume {:?}",
                market.symbol, ticker.last, ticker.change, ticker.quote_volume
            ),
            Err(e) => warn!("Error fetching ticker: {}", e),
        }
    }

    Ok(())
}
