use crate::core::errors::ExchangeError;
use crate::core::kernel::{Clock, RestClient, SignedRequest, Signer};
use crate::core::markets::{MarketCache, MarketIndex};
use crate::core::parsing::value_to_string;
use crate::exchanges::coinfalcon::conversions;
use crate::exchanges::coinfalcon::describe::{API_URL, API_VERSION};
use crate::exchanges::coinfalcon::endpoints::{
    implode_params, omit_path_params, Api, Endpoint, Params,
};
use crate::exchanges::coinfalcon::types::{
    CoinfalconOrderRequest, CoinfalconOrdersQuery, CoinfalconResponse, CoinfalconTradesQuery,
    RawEntries, ORDER_BOOK_LEVEL,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Map an HTTP status onto the error taxonomy. Statuses below 400 pass.
pub fn handle_errors(code: u16, body: &str) -> Result<(), ExchangeError> {
    if code < 400 {
        return Ok(());
    }
    Err(match code {
        401 => ExchangeError::AuthError(body.to_string()),
        429 => ExchangeError::RateLimitExceeded(body.to_string()),
        _ => ExchangeError::ApiError {
            code: i32::from(code),
            message: body.to_string(),
        },
    })
}

/// Null values are skipped; arrays and objects have no query-string form
fn urlencode(query: &Params) -> Result<String, ExchangeError> {
    let mut pairs: Vec<(&str, String)> = Vec::with_capacity(query.len());
    for (key, value) in query {
        if value.is_array() || value.is_object() {
            return Err(ExchangeError::InvalidParameters(format!(
                "Query parameter '{}' must be a scalar, got {}",
                key, value
            )));
        }
        if let Some(value) = value_to_string(value) {
            pairs.push((key.as_str(), value));
        }
    }
    serde_urlencoded::to_string(pairs)
        .map_err(|e| ExchangeError::SerializationError(format!("Failed to encode query: {}", e)))
}

fn to_params<T: Serialize>(value: &T) -> Result<Params, ExchangeError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ExchangeError::SerializationError(format!(
            "Expected an object of request parameters, got {}",
            other
        ))),
    }
}

fn single(key: &str, value: impl Into<Value>) -> Params {
    let mut params = Params::new();
    params.insert(key.to_string(), value.into());
    params
}

fn data<T: DeserializeOwned>(response: Value) -> Result<Option<T>, ExchangeError> {
    serde_json::from_value::<CoinfalconResponse<T>>(response)
        .map(|r| r.data)
        .map_err(|e| {
            ExchangeError::InvalidResponseFormat(format!("Unexpected CoinFalcon payload: {}", e))
        })
}

/// Like [`data`], but a payload without `data` is malformed
fn required_data<T: DeserializeOwned>(response: Value, endpoint: Endpoint) -> Result<T, ExchangeError> {
    data(response)?.ok_or_else(|| {
        ExchangeError::InvalidResponseFormat(format!(
            "CoinFalcon {} response has no data",
            endpoint.path()
        ))
    })
}

/// CoinFalcon REST API client: request signing, error mapping and the
/// typed endpoint calls shared by the connector components.
pub struct CoinfalconRest<R: RestClient> {
    client: R,
    signer: Option<Arc<dyn Signer>>,
    clock: Arc<dyn Clock>,
    base_url: String,
    markets: Arc<MarketCache>,
}

impl<R: RestClient + Clone> Clone for CoinfalconRest<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            signer: self.signer.clone(),
            clock: self.clock.clone(),
            base_url: self.base_url.clone(),
            markets: self.markets.clone(),
        }
    }
}

impl<R: RestClient> std::fmt::Debug for CoinfalconRest<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinfalconRest")
            .field("base_url", &self.base_url)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: RestClient> CoinfalconRest<R> {
    pub fn new(
        client: R,
        signer: Option<Arc<dyn Signer>>,
        clock: Arc<dyn Clock>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            client,
            signer,
            clock,
            base_url: base_url.unwrap_or_else(|| API_URL.to_string()),
            markets: Arc::new(MarketCache::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current time in milliseconds
    pub fn nonce(&self) -> i64 {
        self.clock.milliseconds()
    }

    pub fn milliseconds(&self) -> i64 {
        self.clock.milliseconds()
    }

    /// Build the wire request for `endpoint`.
    ///
    /// Path placeholders are filled from `params`; the remaining entries go
    /// into the query string, or into a JSON body for private non-GET calls.
    /// Private calls without credentials fail before anything is sent.
    pub fn sign(&self, endpoint: Endpoint, params: &Params) -> Result<SignedRequest, ExchangeError> {
        let path = endpoint.path();
        let method = endpoint.method();
        let mut request_path = format!("/api/{}/{}", API_VERSION, implode_params(path, params));
        let query = omit_path_params(path, params);

        let signer = match endpoint.api() {
            Api::Public => None,
            Api::Private => Some(self.signer.as_ref().ok_or_else(|| {
                ExchangeError::AuthError(
                    "coinfalcon requires apiKey and secret credentials for private endpoints"
                        .to_string(),
                )
            })?),
        };

        let body = if signer.is_some() && method != Method::GET {
            Some(serde_json::to_string(&query)?)
        } else {
            if !query.is_empty() {
                request_path.push('?');
                request_path.push_str(&urlencode(&query)?);
            }
            None
        };

        let url = format!("{}{}", self.base_url, request_path);
        let mut request = SignedRequest::new(method.clone(), url);

        if let Some(signer) = signer {
            let headers =
                signer.sign_request(method.as_str(), &request_path, body.as_deref(), self.clock.seconds())?;
            request = request.with_headers(headers);
        }
        if let Some(body) = body {
            request = request.with_body(body);
        }

        Ok(request)
    }

    /// Sign, send and decode one call
    #[instrument(skip(self, params), fields(exchange = "coinfalcon"))]
    pub async fn request(&self, endpoint: Endpoint, params: Params) -> Result<Value, ExchangeError> {
        let request = self.sign(endpoint, &params)?;
        let response = self.client.send(&request).await?;

        if let Err(err) = handle_errors(response.status, &response.body) {
            warn!(status = response.status, "CoinFalcon request failed: {}", err);
            return Err(err);
        }

        serde_json::from_str(&response.body).map_err(|e| {
            ExchangeError::InvalidResponseFormat(format!("Failed to parse JSON response: {}", e))
        })
    }

    /// Markets are fetched once and shared by every clone of this client
    pub async fn load_markets(&self) -> Result<Arc<MarketIndex>, ExchangeError> {
        self.markets
            .get_or_load(|| async {
                let raw = self.get_markets().await?;
                Ok(conversions::parse_markets(&raw))
            })
            .await
    }

    pub async fn get_markets(&self) -> Result<RawEntries, ExchangeError> {
        let response = self.request(Endpoint::Markets, Params::new()).await?;
        required_data(response, Endpoint::Markets)
    }

    pub async fn get_order_book(&self, market_id: &str) -> Result<Value, ExchangeError> {
        let mut params = single("market", market_id);
        params.insert("level".to_string(), json!(ORDER_BOOK_LEVEL));
        let response = self.request(Endpoint::MarketOrders, params).await?;
        Ok(data(response)?.unwrap_or_else(|| json!({})))
    }

    /// `since` is an ISO 8601 timestamp
    pub async fn get_market_trades(
        &self,
        market_id: &str,
        since: Option<String>,
    ) -> Result<RawEntries, ExchangeError> {
        let mut params = single("market", market_id);
        if let Some(since) = since {
            params.insert("since".to_string(), Value::String(since));
        }
        let response = self.request(Endpoint::MarketTrades, params).await?;
        Ok(data(response)?.unwrap_or_default())
    }

    /// The full response, kept as the balance's raw payload
    pub async fn get_user_accounts(&self) -> Result<Value, ExchangeError> {
        let response = self.request(Endpoint::UserAccounts, Params::new()).await?;
        if !response.get("data").is_some_and(Value::is_array) {
            return Err(ExchangeError::InvalidResponseFormat(
                "CoinFalcon user/accounts response has no data array".to_string(),
            ));
        }
        Ok(response)
    }

    pub async fn get_user_trades(
        &self,
        query: &CoinfalconTradesQuery,
    ) -> Result<RawEntries, ExchangeError> {
        let response = self.request(Endpoint::UserTrades, to_params(query)?).await?;
        Ok(data(response)?.unwrap_or_default())
    }

    pub async fn get_user_orders(
        &self,
        query: &CoinfalconOrdersQuery,
    ) -> Result<RawEntries, ExchangeError> {
        let response = self.request(Endpoint::UserOrders, to_params(query)?).await?;
        Ok(data(response)?.unwrap_or_default())
    }

    pub async fn get_user_order(&self, id: &str) -> Result<Value, ExchangeError> {
        let response = self.request(Endpoint::UserOrder, single("id", id)).await?;
        Ok(data(response)?.unwrap_or_else(|| json!({})))
    }

    pub async fn create_order(&self, order: &CoinfalconOrderRequest) -> Result<Value, ExchangeError> {
        let response = self.request(Endpoint::CreateOrder, to_params(order)?).await?;
        Ok(data(response)?.unwrap_or_else(|| json!({})))
    }

    pub async fn cancel_order(&self, id: &str) -> Result<Value, ExchangeError> {
        let response = self.request(Endpoint::CancelOrder, single("id", id)).await?;
        Ok(data(response)?.unwrap_or_else(|| json!({})))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::{hmac_sha256_hex, FixedClock, RawResponse};
    use crate::exchanges::coinfalcon::signer::CoinfalconSigner;
    use async_trait::async_trait;

    #[derive(Clone)]
    struct Unreachable;

    #[async_trait]
    impl RestClient for Unreachable {
        async fn send(&self, _request: &SignedRequest) -> Result<RawResponse, ExchangeError> {
            Err(ExchangeError::NetworkError("no network in unit tests".to_string()))
        }
    }

    fn rest(with_credentials: bool) -> CoinfalconRest<Unreachable> {
        let signer: Option<Arc<dyn Signer>> = with_credentials
            .then(|| Arc::new(CoinfalconSigner::new("key".into(), "secret".into())) as Arc<dyn Signer>);
        CoinfalconRest::new(Unreachable, signer, Arc::new(FixedClock::from_seconds(1000)), None)
    }

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => Params::new(),
        }
    }

    #[test]
    fn test_public_request_appends_query() {
        let request = rest(false)
            .sign(Endpoint::MarketOrders, &params(json!({"market": "BTC-EUR", "level": "3"})))
            .unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "https://coinfalcon.com/api/v1/markets/BTC-EUR/orders?level=3");
        assert!(request.headers.is_empty());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_private_get_signs_path_with_query() {
        let request = rest(true)
            .sign(Endpoint::UserOrders, &params(json!({"a": 1})))
            .unwrap();
        let expected = hmac_sha256_hex("secret", "1000|GET|/api/v1/user/orders?a=1").unwrap();

        assert_eq!(request.url, "https://coinfalcon.com/api/v1/user/orders?a=1");
        assert!(request.body.is_none());
        assert_eq!(request.headers["CF-API-TIMESTAMP"], "1000");
        assert_eq!(request.headers["CF-API-SIGNATURE"], expected);
    }

    #[test]
    fn test_private_post_signs_json_body() {
        let request = rest(true)
            .sign(Endpoint::CreateOrder, &params(json!({"a": 1})))
            .unwrap();
        let expected = hmac_sha256_hex("secret", r#"1000|POST|/api/v1/user/orders|{"a":1}"#).unwrap();

        assert_eq!(request.url, "https://coinfalcon.com/api/v1/user/orders");
        assert_eq!(request.body.as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(request.headers["CF-API-SIGNATURE"], expected);
        assert_eq!(request.headers["Content-Type"], "application/json");
    }

    #[test]
    fn test_private_delete_sends_empty_object() {
        let request = rest(true)
            .sign(Endpoint::CancelOrder, &params(json!({"id": "abc"})))
            .unwrap();
        let expected = hmac_sha256_hex("secret", "1000|DELETE|/api/v1/user/orders/abc|{}").unwrap();

        assert_eq!(request.url, "https://coinfalcon.com/api/v1/user/orders/abc");
        assert_eq!(request.body.as_deref(), Some("{}"));
        assert_eq!(request.headers["CF-API-SIGNATURE"], expected);
    }

    #[test]
    fn test_query_rejects_nested_values() {
        let err = rest(false)
            .sign(Endpoint::MarketTrades, &params(json!({"market": "BTC-EUR", "since": ["a"]})))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidParameters(ref m) if m.contains("since")));

        let request = rest(false)
            .sign(Endpoint::MarketTrades, &params(json!({"market": "BTC-EUR", "since": null})))
            .unwrap();
        assert_eq!(request.url, "https://coinfalcon.com/api/v1/markets/BTC-EUR/trades");
    }

    #[test]
    fn test_private_request_without_credentials() {
        let err = rest(false).sign(Endpoint::UserAccounts, &Params::new()).unwrap_err();
        assert!(matches!(err, ExchangeError::AuthError(_)));
    }

    #[test]
    fn test_handle_errors() {
        assert!(handle_errors(200, "ok").is_ok());
        assert!(handle_errors(399, "").is_ok());
        assert!(matches!(handle_errors(401, "nope"), Err(ExchangeError::AuthError(m)) if m == "nope"));
        assert!(matches!(handle_errors(429, "slow"), Err(ExchangeError::RateLimitExceeded(_))));
        assert!(matches!(
            handle_errors(500, "boom"),
            Err(ExchangeError::ApiError { code: 500, ref message }) if message == "boom"
        ));
        assert!(matches!(handle_errors(404, ""), Err(ExchangeError::ApiError { code: 404, .. })));
    }

    #[test]
    fn test_nonce_is_milliseconds() {
        assert_eq!(rest(false).nonce(), 1_000_000);
    }
}
