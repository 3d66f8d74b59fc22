use crate::core::describe::ApiPaths;
use crate::core::parsing::value_to_string;
use reqwest::Method;
use serde_json::{Map, Value};

/// Request parameters: path placeholders plus query or body fields
pub type Params = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Api {
    Public,
    Private,
}

impl Api {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// Every CoinFalcon REST route this connector calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Markets,
    MarketOrders,
    MarketTrades,
    UserAccounts,
    UserOrders,
    UserOrder,
    UserTrades,
    CreateOrder,
    CancelOrder,
}

impl Endpoint {
    pub const ALL: [Self; 9] = [
        Self::Markets,
        Self::MarketOrders,
        Self::MarketTrades,
        Self::UserAccounts,
        Self::UserOrders,
        Self::UserOrder,
        Self::UserTrades,
        Self::CreateOrder,
        Self::CancelOrder,
    ];

    pub const fn api(self) -> Api {
        match self {
            Self::Markets | Self::MarketOrders | Self::MarketTrades => Api::Public,
            _ => Api::Private,
        }
    }

    pub fn method(self) -> Method {
        match self {
            Self::CreateOrder => Method::POST,
            Self::CancelOrder => Method::DELETE,
            _ => Method::GET,
        }
    }

    /// Path template relative to `/api/{version}/`
    pub const fn path(self) -> &'static str {
        match self {
            Self::Markets => "markets",
            Self::MarketOrders => "markets/{market}/orders",
            Self::MarketTrades => "markets/{market}/trades",
            Self::UserAccounts => "user/accounts",
            Self::UserOrders | Self::CreateOrder => "user/orders",
            Self::UserOrder | Self::CancelOrder => "user/orders/{id}",
            Self::UserTrades => "user/trades",
        }
    }

    /// Group the route table as `api[namespace][verb] = [path, ...]`
    pub fn api_paths() -> ApiPaths {
        let mut paths = ApiPaths::new();
        for endpoint in Self::ALL {
            paths
                .entry(endpoint.api().as_str().to_string())
                .or_default()
                .entry(endpoint.method().as_str().to_lowercase())
                .or_default()
                .push(endpoint.path().to_string());
        }
        paths
    }
}

/// Names of the `{placeholders}` in a path template
pub fn extract_params(path: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        names.push(&rest[start + 1..start + len]);
        rest = &rest[start + len + 1..];
    }
    names
}

/// Substitute `{placeholders}` with values from `params`
pub fn implode_params(path: &str, params: &Params) -> String {
    let mut result = path.to_string();
    for name in extract_params(path) {
        if let Some(value) = params.get(name).and_then(value_to_string) {
            result = result.replace(&format!("{{{}}}", name), &value);
        }
    }
    result
}

/// `params` without the entries consumed by the path template
pub fn omit_path_params(path: &str, params: &Params) -> Params {
    let used = extract_params(path);
    params
        .iter()
        .filter(|(key, _)| !used.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => Params::new(),
        }
    }

    #[test]
    fn test_implode_and_omit() {
        let p = params(json!({"market": "BTC-EUR", "level": "3"}));
        let path = Endpoint::MarketOrders.path();
        assert_eq!(extract_params(path), vec!["market"]);
        assert_eq!(implode_params(path, &p), "markets/BTC-EUR/orders");

        let query = omit_path_params(path, &p);
        assert_eq!(query.len(), 1);
        assert_eq!(query.get("level"), Some(&json!("3")));
    }

    #[test]
    fn test_api_paths_table() {
        let paths = Endpoint::api_paths();
        assert_eq!(
            paths["public"]["get"],
            vec!["markets", "markets/{market}/orders", "markets/{market}/trades"]
        );
        assert_eq!(
            paths["private"]["get"],
            vec!["user/accounts", "user/orders", "user/orders/{id}", "user/trades"]
        );
        assert_eq!(paths["private"]["post"], vec!["user/orders"]);
        assert_eq!(paths["private"]["delete"], vec!["user/orders/{id}"]);
    }

    #[test]
    fn test_routing() {
        assert_eq!(Endpoint::CancelOrder.method(), Method::DELETE);
        assert_eq!(Endpoint::CreateOrder.api(), Api::Private);
        assert_eq!(Endpoint::MarketTrades.api(), Api::Public);
    }
}
