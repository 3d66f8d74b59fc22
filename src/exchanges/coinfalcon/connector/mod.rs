use crate::core::describe::ExchangeDescriptor;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{RestClient, SignedRequest};
use crate::core::markets::MarketIndex;
use crate::core::traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer};
use crate::core::types::{Balances, Market, Order, OrderBook, OrderRequest, Ticker, Trade};
use crate::exchanges::coinfalcon::describe::describe;
use crate::exchanges::coinfalcon::endpoints::{Endpoint, Params};
use crate::exchanges::coinfalcon::rest::CoinfalconRest;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use trading::Trading;

/// CoinFalcon connector that composes all sub-trait implementations
pub struct CoinfalconConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: Account<R>,
    rest: CoinfalconRest<R>,
    descriptor: ExchangeDescriptor,
}

impl<R: RestClient + Clone + Send + Sync> CoinfalconConnector<R> {
    pub fn new(rest: CoinfalconRest<R>) -> Result<Self, ExchangeError> {
        Ok(Self {
            market: MarketData::new(&rest),
            trading: Trading::new(&rest),
            account: Account::new(&rest),
            rest,
            descriptor: describe()?,
        })
    }

    /// Load and cache the market list; later calls reuse it
    pub async fn load_markets(&self) -> Result<Arc<MarketIndex>, ExchangeError> {
        self.rest.load_markets().await
    }

    /// The request that would be sent for `endpoint` with `params`
    pub fn sign(&self, endpoint: Endpoint, params: &Params) -> Result<SignedRequest, ExchangeError> {
        self.rest.sign(endpoint, params)
    }

    pub fn rest(&self) -> &CoinfalconRest<R> {
        &self.rest
    }
}

impl<R: RestClient> std::fmt::Debug for CoinfalconConnector<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinfalconConnector")
            .field("rest", &self.rest)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> MarketDataSource for CoinfalconConnector<R> {
    async fn fetch_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        self.market.fetch_markets().await
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, ExchangeError> {
        self.market.fetch_ticker(symbol).await
    }

    async fn fetch_tickers(
        &self,
        symbols: Option<&[&str]>,
    ) -> Result<BTreeMap<String, Ticker>, ExchangeError> {
        self.market.fetch_tickers(symbols).await
    }

    async fn fetch_order_book(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<OrderBook, ExchangeError> {
        self.market.fetch_order_book(symbol, limit).await
    }

    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.market.fetch_trades(symbol, since, limit).await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> OrderPlacer for CoinfalconConnector<R> {
    async fn create_order(&self, order: OrderRequest) -> Result<Order, ExchangeError> {
        self.trading.create_order(order).await
    }

    async fn cancel_order(&self, id: &str, symbol: Option<&str>) -> Result<Order, ExchangeError> {
        self.trading.cancel_order(id, symbol).await
    }

    async fn fetch_order(&self, id: &str, symbol: Option<&str>) -> Result<Order, ExchangeError> {
        self.trading.fetch_order(id, symbol).await
    }

    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.trading.fetch_open_orders(symbol, since, limit).await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> AccountInfo for CoinfalconConnector<R> {
    async fn fetch_balance(&self) -> Result<Balances, ExchangeError> {
        self.account.fetch_balance().await
    }

    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.account.fetch_my_trades(symbol, since, limit).await
    }
}

impl<R: RestClient + Clone + Send + Sync> ExchangeConnector for CoinfalconConnector<R> {
    fn describe(&self) -> &ExchangeDescriptor {
        &self.descriptor
    }

    fn nonce(&self) -> i64 {
        self.rest.nonce()
    }
}
