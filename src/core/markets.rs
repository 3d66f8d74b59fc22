use crate::core::errors::ExchangeError;
use crate::core::types::Market;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Map an exchange currency id onto its unified code.
///
/// Codes are upper-cased; a handful of legacy tickers are renamed to the code
/// the rest of the market uses.
pub fn safe_currency_code(currency_id: Option<&str>) -> Option<String> {
    let code = currency_id?.to_uppercase();
    let code = match code.as_str() {
        "XBT" => "BTC".to_string(),
        "BCC" | "BCHABC" => "BCH".to_string(),
        "DRK" => "DASH".to_string(),
        "BCHSV" => "BSV".to_string(),
        _ => code,
    };
    Some(code)
}

/// Markets indexed by unified symbol and by exchange id
#[derive(Debug, Clone, Default)]
pub struct MarketIndex {
    markets: Vec<Market>,
    by_symbol: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl MarketIndex {
    pub fn new(markets: Vec<Market>) -> Self {
        let mut by_symbol = HashMap::with_capacity(markets.len());
        let mut by_id = HashMap::with_capacity(markets.len());
        for (idx, market) in markets.iter().enumerate() {
            by_symbol.insert(market.symbol.clone(), idx);
            by_id.insert(market.id.clone(), idx);
        }
        Self {
            markets,
            by_symbol,
            by_id,
        }
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.markets.iter().map(|m| m.symbol.as_str())
    }

    /// Look up a market by unified symbol
    pub fn market(&self, symbol: &str) -> Result<&Market, ExchangeError> {
        self.by_symbol
            .get(symbol)
            .map(|&idx| &self.markets[idx])
            .ok_or_else(|| {
                ExchangeError::BadSymbol(format!("coinfalcon does not have market symbol {}", symbol))
            })
    }

    pub fn market_id(&self, symbol: &str) -> Result<&str, ExchangeError> {
        self.market(symbol).map(|m| m.id.as_str())
    }

    pub fn market_by_id(&self, market_id: &str) -> Option<&Market> {
        self.by_id.get(market_id).map(|&idx| &self.markets[idx])
    }

    /// Resolve a unified symbol for a raw market id.
    ///
    /// Known ids map to their cached symbol. Unknown ids are split on
    /// `delimiter` into base and quote codes, or returned unchanged when that
    /// is not possible. `market` is only used when there is no id at all.
    pub fn safe_symbol(
        &self,
        market_id: Option<&str>,
        market: Option<&Market>,
        delimiter: Option<&str>,
    ) -> Option<String> {
        let Some(market_id) = market_id else {
            return market.map(|m| m.symbol.clone());
        };

        if let Some(known) = self.market_by_id(market_id) {
            return Some(known.symbol.clone());
        }

        if let Some(delimiter) = delimiter {
            let parts: Vec<&str> = market_id.split(delimiter).collect();
            if let [base, quote] = parts.as_slice() {
                let base = safe_currency_code(Some(*base))?;
                let quote = safe_currency_code(Some(*quote))?;
                return Some(format!("{}/{}", base, quote));
            }
        }

        Some(market_id.to_string())
    }
}

/// Lazily loaded, shared market index
#[derive(Debug, Default)]
pub struct MarketCache {
    cell: OnceCell<Arc<MarketIndex>>,
}

impl MarketCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached index, running `loader` on first use.
    ///
    /// Concurrent callers wait on the same load. A failed load leaves the
    /// cache empty so the next call retries.
    pub async fn get_or_load<F, Fut>(&self, loader: F) -> Result<Arc<MarketIndex>, ExchangeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Market>, ExchangeError>>,
    {
        self.cell
            .get_or_try_init(|| async move {
                let markets = loader().await?;
                debug!(count = markets.len(), "Loaded markets");
                Ok::<_, ExchangeError>(Arc::new(MarketIndex::new(markets)))
            })
            .await
            .cloned()
    }

    pub fn get(&self) -> Option<Arc<MarketIndex>> {
        self.cell.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MarketLimits, MarketPrecision};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn market(id: &str, base: &str, quote: &str) -> Market {
        Market {
            id: id.to_string(),
            symbol: format!("{}/{}", base, quote),
            base: base.to_string(),
            quote: quote.to_string(),
            base_id: base.to_string(),
            quote_id: quote.to_string(),
            active: true,
            precision: MarketPrecision::default(),
            limits: MarketLimits::default(),
            info: Value::Null,
        }
    }

    #[test]
    fn test_safe_currency_code_aliases() {
        assert_eq!(safe_currency_code(Some("xbt")).as_deref(), Some("BTC"));
        assert_eq!(safe_currency_code(Some("BCHSV")).as_deref(), Some("BSV"));
        assert_eq!(safe_currency_code(Some("eth")).as_deref(), Some("ETH"));
        assert_eq!(safe_currency_code(None), None);
    }

    #[test]
    fn test_market_lookup() {
        let index = MarketIndex::new(vec![market("BTC-EUR", "BTC", "EUR")]);
        assert_eq!(index.market_id("BTC/EUR").unwrap(), "BTC-EUR");
        assert!(index.market_by_id("BTC-EUR").is_some());
        assert!(matches!(
            index.market("ETH/EUR"),
            Err(ExchangeError::BadSymbol(_))
        ));
    }

    #[test]
    fn test_safe_symbol_precedence() {
        let btc = market("BTC-EUR", "BTC", "EUR");
        let eth = market("ETH-EUR", "ETH", "EUR");
        let index = MarketIndex::new(vec![btc.clone()]);

        // cached id beats the explicit market
        assert_eq!(
            index.safe_symbol(Some("BTC-EUR"), Some(&eth), Some("-")).as_deref(),
            Some("BTC/EUR")
        );
        assert_eq!(
            index.safe_symbol(Some("xbt-usd"), None, Some("-")).as_deref(),
            Some("BTC/USD")
        );
        assert_eq!(
            index.safe_symbol(Some("WEIRD"), None, Some("-")).as_deref(),
            Some("WEIRD")
        );
        assert_eq!(
            index.safe_symbol(None, Some(&eth), Some("-")).as_deref(),
            Some("ETH/EUR")
        );
        assert_eq!(index.safe_symbol(None, None, Some("-")), None);
    }

    #[tokio::test]
    async fn test_cache_loads_once() {
        let cache = MarketCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let index = cache
                .get_or_load(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![market("BTC-EUR", "BTC", "EUR")])
                })
                .await
                .unwrap();
            assert_eq!(index.markets().len(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_retries_after_failure() {
        let cache = MarketCache::new();
        let failed = cache
            .get_or_load(|| async { Err(ExchangeError::NetworkError("down".to_string())) })
            .await;
        assert!(failed.is_err());
        assert!(cache.get().is_none());

        let loaded = cache
            .get_or_load(|| async { Ok(vec![market("BTC-EUR", "BTC", "EUR")]) })
            .await
            .unwrap();
        assert_eq!(loaded.symbols().collect::<Vec<_>>(), vec!["BTC/EUR"]);
    }
}
