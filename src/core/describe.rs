use crate::core::errors::ExchangeError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Recursively merge `overlay` into `base`.
///
/// Objects merge key by key; for every other value the overlay replaces the base.
pub fn deep_extend(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_extend(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}

/// Framework-wide defaults every exchange descriptor is merged onto
pub fn base_descriptor() -> Value {
    json!({
        "id": null,
        "name": null,
        "countries": [],
        "rateLimit": 2000,
        "version": null,
        "has": {
            "cancelOrder": false,
            "createOrder": false,
            "fetchBalance": false,
            "fetchClosedOrders": false,
            "fetchMarkets": false,
            "fetchMyTrades": false,
            "fetchOHLCV": false,
            "fetchOpenOrders": false,
            "fetchOrder": false,
            "fetchOrderBook": false,
            "fetchTicker": false,
            "fetchTickers": false,
            "fetchTrades": false,
            "withdraw": false
        },
        "urls": {
            "logo": null,
            "api": null,
            "www": null,
            "doc": null,
            "fees": null,
            "referral": null
        },
        "api": {},
        "fees": {
            "trading": {
                "tierBased": false,
                "percentage": true,
                "maker": "0.001",
                "taker": "0.001"
            }
        },
        "precision": {
            "amount": null,
            "price": null
        }
    })
}

/// Capability flags advertised to the dispatcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Capabilities {
    pub cancel_order: bool,
    pub create_order: bool,
    pub fetch_balance: bool,
    pub fetch_closed_orders: bool,
    pub fetch_markets: bool,
    pub fetch_my_trades: bool,
    #[serde(rename = "fetchOHLCV")]
    pub fetch_ohlcv: bool,
    pub fetch_open_orders: bool,
    pub fetch_order: bool,
    pub fetch_order_book: bool,
    pub fetch_ticker: bool,
    pub fetch_tickers: bool,
    pub fetch_trades: bool,
    pub withdraw: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeUrls {
    pub logo: Option<String>,
    pub api: Option<String>,
    pub www: Option<String>,
    pub doc: Option<String>,
    pub fees: Option<String>,
    pub referral: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingFees {
    pub tier_based: bool,
    pub percentage: bool,
    pub maker: Decimal,
    pub taker: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fees {
    pub trading: TradingFees,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPrecision {
    pub amount: Option<u32>,
    pub price: Option<u32>,
}

/// Endpoint paths grouped as `api[namespace][verb] = [path, ...]`
pub type ApiPaths = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Static description of an exchange, after merging with [`base_descriptor`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeDescriptor {
    pub id: String,
    pub name: String,
    pub countries: Vec<String>,
    /// Minimum delay between requests, in milliseconds
    pub rate_limit: u64,
    pub version: String,
    pub has: Capabilities,
    pub urls: ExchangeUrls,
    pub api: ApiPaths,
    pub fees: Fees,
    pub precision: DefaultPrecision,
}

impl ExchangeDescriptor {
    /// Merge exchange-specific overrides onto the framework defaults
    pub fn from_overrides(overrides: Value) -> Result<Self, ExchangeError> {
        serde_json::from_value(deep_extend(base_descriptor(), overrides)).map_err(|e| {
            ExchangeError::ConfigurationError(format!("Invalid exchange descriptor: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_extend_merges_nested_objects() {
        let base = json!({"a": {"x": 1, "y": 2}, "b": [1, 2], "c": "keep"});
        let overlay = json!({"a": {"y": 3, "z": 4}, "b": [9]});
        let merged = deep_extend(base, overlay);
        assert_eq!(
            merged,
            json!({"a": {"x": 1, "y": 3, "z": 4}, "b": [9], "c": "keep"})
        );
    }

    #[test]
    fn test_deep_extend_scalar_replaces_object() {
        let merged = deep_extend(json!({"a": {"x": 1}}), json!({"a": null}));
        assert_eq!(merged, json!({"a": null}));
    }

    #[test]
    fn test_from_overrides_keeps_defaults() {
        let descriptor = ExchangeDescriptor::from_overrides(json!({
            "id": "test",
            "name": "Test",
            "version": "v2",
            "has": {"fetchMarkets": true},
            "fees": {"trading": {"taker": "0.002"}}
        }))
        .unwrap();

        assert_eq!(descriptor.rate_limit, 2000);
        assert!(descriptor.has.fetch_markets);
        assert!(!descriptor.has.fetch_trades);
        assert_eq!(descriptor.fees.trading.taker, Decimal::new(2, 3));
        assert_eq!(descriptor.fees.trading.maker, Decimal::new(1, 3));
        assert!(descriptor.precision.amount.is_none());
    }

    #[test]
    fn test_from_overrides_requires_identity() {
        let err = ExchangeDescriptor::from_overrides(json!({})).unwrap_err();
        assert!(matches!(err, ExchangeError::ConfigurationError(_)));
    }
}
