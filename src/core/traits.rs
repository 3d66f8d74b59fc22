use crate::core::{
    describe::ExchangeDescriptor,
    errors::ExchangeError,
    types::{Balances, Market, Order, OrderBook, OrderRequest, Ticker, Trade},
};
use async_trait::async_trait;
use std::collections::BTreeMap;

#[async_trait]
pub trait MarketDataSource {
    /// Get all available markets/trading pairs
    async fn fetch_markets(&self) -> Result<Vec<Market>, ExchangeError>;

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, ExchangeError>;

    /// Tickers keyed by unified symbol, optionally restricted to `symbols`
    async fn fetch_tickers(
        &self,
        symbols: Option<&[&str]>,
    ) -> Result<BTreeMap<String, Ticker>, ExchangeError>;

    async fn fetch_order_book(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<OrderBook, ExchangeError>;

    /// Public trade history. `since` is epoch milliseconds.
    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Place a new order
    async fn create_order(&self, order: OrderRequest) -> Result<Order, ExchangeError>;

    async fn cancel_order(&self, id: &str, symbol: Option<&str>) -> Result<Order, ExchangeError>;

    async fn fetch_order(&self, id: &str, symbol: Option<&str>) -> Result<Order, ExchangeError>;

    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn fetch_balance(&self) -> Result<Balances, ExchangeError>;

    /// The account's own fills. Fails with `ArgumentsRequired` when `symbol` is `None`.
    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError>;
}

// Composite trait for callers that need the whole exchange surface
pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo {
    /// Static capability descriptor
    fn describe(&self) -> &ExchangeDescriptor;

    /// Current time in milliseconds
    fn nonce(&self) -> i64;
}
