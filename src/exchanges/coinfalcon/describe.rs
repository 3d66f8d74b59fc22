use crate::core::describe::ExchangeDescriptor;
use crate::core::errors::ExchangeError;
use crate::exchanges::coinfalcon::endpoints::Endpoint;
use serde_json::json;

pub const EXCHANGE_ID: &str = "coinfalcon";
pub const API_URL: &str = "https://coinfalcon.com";
pub const API_VERSION: &str = "v1";

/// CoinFalcon's descriptor merged over the framework defaults
pub fn describe() -> Result<ExchangeDescriptor, ExchangeError> {
    let api = serde_json::to_value(Endpoint::api_paths())?;

    ExchangeDescriptor::from_overrides(json!({
        "id": EXCHANGE_ID,
        "name": "CoinFalcon",
        "countries": ["GB"],
        "rateLimit": 1000,
        "version": API_VERSION,
        "has": {
            "cancelOrder": true,
            "createOrder": true,
            "fetchBalance": true,
            "fetchMarkets": true,
            "fetchMyTrades": true,
            "fetchOpenOrders": true,
            "fetchOrder": true,
            "fetchOrderBook": true,
            "fetchTicker": true,
            "fetchTickers": true,
            "fetchTrades": true
        },
        "urls": {
            "logo": "https://user-images.githubusercontent.com/1294454/41822275-ed982188-77f5-11e8-92bb-496bcd14ca52.jpg",
            "api": API_URL,
            "www": "https://coinfalcon.com",
            "doc": "https://docs.coinfalcon.com",
            "fees": "https://coinfalcon.com/fees",
            "referral": "https://coinfalcon.com/?ref=CFJSVGTUPASB"
        },
        "api": api,
        "fees": {
            "trading": {
                "tierBased": true,
                "maker": "0.0",
                // tiered, starting at 0.2%
                "taker": "0.002"
            }
        },
        "precision": {
            "amount": 8,
            "price": 8
        }
    }))
}
