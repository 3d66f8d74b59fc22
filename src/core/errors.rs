use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Any non-success HTTP status without a more specific mapping
    #[error("API error: {code} - {message}")]
    ApiError { code: i32, message: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Arguments required: {0}")]
    ArgumentsRequired(String),

    #[error("Bad symbol: {0}")]
    BadSymbol(String),

    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ExchangeError {
    /// True for errors raised on the exchange side of the wire (HTTP >= 400 or
    /// an unusable payload), as opposed to local argument or transport failures.
    pub fn is_exchange_error(&self) -> bool {
        matches!(
            self,
            Self::ApiError { .. }
                | Self::AuthError(_)
                | Self::RateLimitExceeded(_)
                | Self::InvalidResponseFormat(_)
        )
    }
}
