use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{Clock, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, Signer, SystemClock};
use crate::exchanges::coinfalcon::{
    connector::CoinfalconConnector,
    describe::{API_URL, EXCHANGE_ID},
    rest::CoinfalconRest,
    signer::CoinfalconSigner,
};
use std::sync::Arc;

/// Builder for creating CoinFalcon exchange connectors
pub struct CoinfalconBuilder {
    config: ExchangeConfig,
    clock: Arc<dyn Clock>,
    rest_timeout: u64,
    user_agent: Option<String>,
}

impl Default for CoinfalconBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinfalconBuilder {
    /// Public endpoints only until credentials are supplied
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
            clock: Arc::new(SystemClock),
            rest_timeout: 30,
            user_agent: None,
        }
    }

    /// Set the exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set API credentials, keeping any base URL override
    pub fn with_credentials(mut self, api_key: String, secret_key: String) -> Self {
        let base_url = self.config.base_url.take();
        self.config = ExchangeConfig::new(api_key, secret_key);
        self.config.base_url = base_url;
        self
    }

    /// Set base URL for REST API
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    /// Set REST client timeout in seconds
    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.rest_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = Some(user_agent);
        self
    }

    /// Replace the wall clock used for nonces and signatures
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn signer(&self) -> Option<Arc<dyn Signer>> {
        self.config.has_credentials().then(|| {
            Arc::new(CoinfalconSigner::new(
                self.config.api_key().to_string(),
                self.config.secret_key().to_string(),
            )) as Arc<dyn Signer>
        })
    }

    /// Build a connector over the `reqwest` transport
    pub fn build(self) -> Result<CoinfalconConnector<ReqwestRest>, ExchangeError> {
        let base_url = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| API_URL.to_string());

        let mut rest_config = RestClientConfig::new(base_url, EXCHANGE_ID.to_string())
            .with_timeout(self.rest_timeout);
        if let Some(user_agent) = self.user_agent.clone() {
            rest_config = rest_config.with_user_agent(user_agent);
        }

        let rest = RestClientBuilder::new(rest_config).build()?;
        self.build_with_rest(rest)
    }

    /// Build a connector over any transport, e.g. a scripted one in tests
    pub fn build_with_rest<R>(self, rest: R) -> Result<CoinfalconConnector<R>, ExchangeError>
    where
        R: RestClient + Clone + Send + Sync,
    {
        let signer = self.signer();
        let rest = CoinfalconRest::new(rest, signer, self.clock, self.config.base_url);
        CoinfalconConnector::new(rest)
    }
}

/// Create a CoinFalcon connector from a configuration
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<CoinfalconConnector<ReqwestRest>, ExchangeError> {
    CoinfalconBuilder::new().with_config(config).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::FixedClock;
    use crate::core::traits::ExchangeConnector;
    use crate::exchanges::coinfalcon::endpoints::{Endpoint, Params};

    #[test]
    fn test_build_connector_without_credentials() {
        let connector = build_connector(ExchangeConfig::read_only()).unwrap();
        assert_eq!(connector.rest().base_url(), API_URL);
        assert!(matches!(
            connector.sign(Endpoint::UserAccounts, &Params::new()),
            Err(ExchangeError::AuthError(_))
        ));
    }

    #[test]
    fn test_builder_with_credentials_keeps_base_url() {
        let connector = CoinfalconBuilder::new()
            .with_base_url("http://localhost:8080".to_string())
            .with_credentials("key".to_string(), "secret".to_string())
            .with_rest_timeout(5)
            .with_user_agent("test".to_string())
            .build()
            .unwrap();

        let request = connector.sign(Endpoint::UserAccounts, &Params::new()).unwrap();
        assert_eq!(request.url, "http://localhost:8080/api/v1/user/accounts");
        assert_eq!(request.headers["CF-API-KEY"], "key");
    }

    #[test]
    fn test_builder_with_clock() {
        let connector = CoinfalconBuilder::new()
            .with_clock(Arc::new(FixedClock::new(1_234)))
            .build()
            .unwrap();
        assert_eq!(connector.nonce(), 1_234);
        assert_eq!(connector.describe().id, "coinfalcon");
    }
}
