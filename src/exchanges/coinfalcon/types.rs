use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every CoinFalcon payload is wrapped in `{"data": ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct CoinfalconResponse<T> {
    pub data: Option<T>,
}

/// Body of `POST user/orders`. Amounts and prices travel as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinfalconOrderRequest {
    pub market: String,
    pub size: String,
    /// `buy` or `sell`
    pub order_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// `limit_order` or `market_order`
    pub operation_type: String,
}

/// Query of `GET user/trades`
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoinfalconTradesQuery {
    pub market: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Query of `GET user/orders`
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoinfalconOrdersQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_time: Option<String>,
}

/// Raw statuses that still rest on the book
pub const OPEN_ORDER_STATUSES: [&str; 3] = ["pending", "open", "partially_filled"];

/// Order book depth requested from `markets/{market}/orders`
pub const ORDER_BOOK_LEVEL: &str = "3";

pub type RawEntries = Vec<Value>;
