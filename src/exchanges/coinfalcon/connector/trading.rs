use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::parsing::iso8601;
use crate::core::precision::{amount_to_precision, price_to_precision};
use crate::core::traits::OrderPlacer;
use crate::core::types::{Order, OrderRequest, OrderType};
use crate::exchanges::coinfalcon::{
    conversions,
    rest::CoinfalconRest,
    types::{CoinfalconOrderRequest, CoinfalconOrdersQuery, OPEN_ORDER_STATUSES},
};
use async_trait::async_trait;
use tracing::instrument;

/// CoinFalcon order management
#[derive(Debug)]
pub struct Trading<R: RestClient> {
    rest: CoinfalconRest<R>,
}

impl<R: RestClient + Clone> Trading<R> {
    pub fn new(rest: &CoinfalconRest<R>) -> Self {
        Self { rest: rest.clone() }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> OrderPlacer for Trading<R> {
    #[instrument(skip(self), fields(exchange = "coinfalcon", symbol = %order.symbol))]
    async fn create_order(&self, order: OrderRequest) -> Result<Order, ExchangeError> {
        let index = self.rest.load_markets().await?;
        let market = index.market(&order.symbol)?;

        // size and price must be sent as strings
        let price = match order.order_type {
            OrderType::Limit => {
                let price = order.price.ok_or_else(|| {
                    ExchangeError::ArgumentsRequired(
                        "coinfalcon create_order() requires a price for limit orders".to_string(),
                    )
                })?;
                Some(price_to_precision(price, market.precision.price))
            }
            OrderType::Market => None,
        };

        let request = CoinfalconOrderRequest {
            market: market.id.clone(),
            size: amount_to_precision(order.amount, market.precision.amount),
            order_type: order.side.as_str().to_string(),
            price,
            operation_type: format!("{}_order", order.order_type.as_str()),
        };

        let raw = self.rest.create_order(&request).await?;
        Ok(conversions::parse_order(&raw, Some(market), &index))
    }

    /// The order is parsed against the market for `symbol`, which is resolved
    /// once the cancellation has been sent.
    #[instrument(skip(self), fields(exchange = "coinfalcon"))]
    async fn cancel_order(&self, id: &str, symbol: Option<&str>) -> Result<Order, ExchangeError> {
        let index = self.rest.load_markets().await?;
        let raw = self.rest.cancel_order(id).await?;

        let market = match symbol {
            Some(symbol) => index.market(symbol)?,
            None => {
                return Err(ExchangeError::BadSymbol(
                    "coinfalcon cancel_order() needs a symbol to parse the canceled order"
                        .to_string(),
                ))
            }
        };
        Ok(conversions::parse_order(&raw, Some(market), &index))
    }

    /// `symbol` is not needed: the order payload names its own market
    #[instrument(skip(self), fields(exchange = "coinfalcon"))]
    async fn fetch_order(&self, id: &str, _symbol: Option<&str>) -> Result<Order, ExchangeError> {
        let index = self.rest.load_markets().await?;
        let raw = self.rest.get_user_order(id).await?;
        Ok(conversions::parse_order(&raw, None, &index))
    }

    /// The exchange has no open-only filter; statuses are filtered locally
    #[instrument(skip(self), fields(exchange = "coinfalcon"))]
    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        let index = self.rest.load_markets().await?;
        let market = symbol.map(|s| index.market(s)).transpose()?;

        let query = CoinfalconOrdersQuery {
            market: market.map(|m| m.id.clone()),
            since_time: iso8601(since),
        };
        let raw = self.rest.get_user_orders(&query).await?;
        let open = conversions::filter_open(raw, &OPEN_ORDER_STATUSES);

        Ok(conversions::parse_orders(&open, market, &index, since, limit))
    }
}
