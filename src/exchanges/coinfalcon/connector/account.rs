use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::parsing::{iso8601, parse_balance};
use crate::core::traits::AccountInfo;
use crate::core::types::{Balances, Trade};
use crate::exchanges::coinfalcon::{conversions, rest::CoinfalconRest, types::CoinfalconTradesQuery};
use async_trait::async_trait;
use tracing::instrument;

/// CoinFalcon account balances and fills
#[derive(Debug)]
pub struct Account<R: RestClient> {
    rest: CoinfalconRest<R>,
}

impl<R: RestClient + Clone> Account<R> {
    pub fn new(rest: &CoinfalconRest<R>) -> Self {
        Self { rest: rest.clone() }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> AccountInfo for Account<R> {
    #[instrument(skip(self), fields(exchange = "coinfalcon"))]
    async fn fetch_balance(&self) -> Result<Balances, ExchangeError> {
        self.rest.load_markets().await?;
        let response = self.rest.get_user_accounts().await?;
        let accounts = conversions::parse_accounts(&response);
        Ok(parse_balance(response, accounts))
    }

    #[instrument(skip(self), fields(exchange = "coinfalcon"))]
    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let symbol = symbol.ok_or_else(|| {
            ExchangeError::ArgumentsRequired(
                "coinfalcon fetch_my_trades() requires a symbol argument".to_string(),
            )
        })?;

        let index = self.rest.load_markets().await?;
        let market = index.market(symbol)?;
        let query = CoinfalconTradesQuery {
            market: market.id.clone(),
            start_time: iso8601(since),
            limit,
        };
        let raw = self.rest.get_user_trades(&query).await?;

        Ok(conversions::parse_trades(&raw, market, since, limit))
    }
}
