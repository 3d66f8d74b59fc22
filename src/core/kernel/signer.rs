use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;

/// Headers to attach to an authenticated request
pub type SignatureResult = Result<HashMap<String, String>, ExchangeError>;

type HmacSha256 = Hmac<Sha256>;

/// Signer trait for request authentication
///
/// Implementations turn the request line plus body into the authentication
/// headers a particular exchange expects.
pub trait Signer: Send + Sync {
    /// # Arguments
    /// * `method` - HTTP method, upper case
    /// * `request_path` - Path including any query string, without the host
    /// * `body` - Serialized request body, if one is sent
    /// * `timestamp` - Request timestamp in seconds
    fn sign_request(
        &self,
        method: &str,
        request_path: &str,
        body: Option<&str>,
        timestamp: i64,
    ) -> SignatureResult;
}

/// Lowercase hex HMAC-SHA256 of `payload` keyed with `secret`
pub fn hmac_sha256_hex(secret: &str, payload: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
