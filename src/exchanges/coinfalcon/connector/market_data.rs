use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::parsing::{iso8601, parse_order_book};
use crate::core::traits::MarketDataSource;
use crate::core::types::{Market, OrderBook, Ticker, Trade};
use crate::exchanges::coinfalcon::{conversions, rest::CoinfalconRest};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::instrument;

/// CoinFalcon public market data
#[derive(Debug)]
pub struct MarketData<R: RestClient> {
    rest: CoinfalconRest<R>,
}

impl<R: RestClient + Clone> MarketData<R> {
    pub fn new(rest: &CoinfalconRest<R>) -> Self {
        Self { rest: rest.clone() }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> MarketDataSource for MarketData<R> {
    #[instrument(skip(self), fields(exchange = "coinfalcon"))]
    async fn fetch_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        let raw = self.rest.get_markets().await?;
        Ok(conversions::parse_markets(&raw))
    }

    /// There is no single-ticker endpoint, so this reads the full snapshot
    #[instrument(skip(self), fields(exchange = "coinfalcon"))]
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, ExchangeError> {
        let mut tickers = self.fetch_tickers(None).await?;
        tickers.remove(symbol).ok_or_else(|| {
            ExchangeError::BadSymbol(format!("coinfalcon has no ticker for {}", symbol))
        })
    }

    #[instrument(skip(self), fields(exchange = "coinfalcon"))]
    async fn fetch_tickers(
        &self,
        symbols: Option<&[&str]>,
    ) -> Result<BTreeMap<String, Ticker>, ExchangeError> {
        let index = self.rest.load_markets().await?;
        let raw = self.rest.get_markets().await?;
        let timestamp = self.rest.milliseconds();

        let mut tickers: BTreeMap<String, Ticker> = raw
            .iter()
            .map(|entry| conversions::parse_ticker(entry, &index, timestamp))
            .filter_map(|ticker| ticker.symbol.clone().map(|symbol| (symbol, ticker)))
            .collect();

        if let Some(symbols) = symbols {
            tickers.retain(|symbol, _| symbols.contains(&symbol.as_str()));
        }

        Ok(tickers)
    }

    /// Always requests the full level-3 book; `limit` is not applied
    #[instrument(skip(self), fields(exchange = "coinfalcon"))]
    async fn fetch_order_book(
        &self,
        symbol: &str,
        _limit: Option<u32>,
    ) -> Result<OrderBook, ExchangeError> {
        let index = self.rest.load_markets().await?;
        let market_id = index.market_id(symbol)?;
        let data = self.rest.get_order_book(market_id).await?;

        Ok(parse_order_book(
            &data,
            Some(symbol.to_string()),
            None,
            "bids",
            "asks",
            "price",
            "size",
        ))
    }

    #[instrument(skip(self), fields(exchange = "coinfalcon"))]
    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let index = self.rest.load_markets().await?;
        let market = index.market(symbol)?;
        let raw = self.rest.get_market_trades(&market.id, iso8601(since)).await?;

        Ok(conversions::parse_trades(&raw, market, since, limit))
    }
}
