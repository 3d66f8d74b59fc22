use crate::core::kernel::signer::{hmac_sha256_hex, SignatureResult, Signer};
use std::collections::HashMap;

/// Request signer for CoinFalcon private endpoints
pub struct CoinfalconSigner {
    api_key: String,
    secret_key: String,
}

impl CoinfalconSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key,
        }
    }
}

/// `seconds|METHOD|path[|body]`
pub fn signature_payload(seconds: i64, method: &str, request_path: &str, body: Option<&str>) -> String {
    let mut payload = format!("{}|{}|{}", seconds, method, request_path);
    if let Some(body) = body.filter(|b| !b.is_empty()) {
        payload.push('|');
        payload.push_str(body);
    }
    payload
}

impl Signer for CoinfalconSigner {
    fn sign_request(
        &self,
        method: &str,
        request_path: &str,
        body: Option<&str>,
        timestamp: i64,
    ) -> SignatureResult {
        let payload = signature_payload(timestamp, method, request_path, body);
        let signature = hmac_sha256_hex(&self.secret_key, &payload)?;

        let mut headers = HashMap::new();
        headers.insert("CF-API-KEY".to_string(), self.api_key.clone());
        headers.insert("CF-API-TIMESTAMP".to_string(), timestamp.to_string());
        headers.insert("CF-API-SIGNATURE".to_string(), signature);
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_get_with_query() {
        assert_eq!(
            signature_payload(1000, "GET", "/api/v1/user/orders?a=1", None),
            "1000|GET|/api/v1/user/orders?a=1"
        );
    }

    #[test]
    fn test_payload_post_with_body() {
        assert_eq!(
            signature_payload(1000, "POST", "/api/v1/user/orders", Some(r#"{"a":1}"#)),
            r#"1000|POST|/api/v1/user/orders|{"a":1}"#
        );
    }

    #[test]
    fn test_signer_headers() {
        let signer = CoinfalconSigner::new("key".to_string(), "secret".to_string());
        let headers = signer
            .sign_request("GET", "/api/v1/user/accounts", None, 1000)
            .unwrap();

        let expected = hmac_sha256_hex("secret", "1000|GET|/api/v1/user/accounts").unwrap();
        assert_eq!(headers["CF-API-KEY"], "key");
        assert_eq!(headers["CF-API-TIMESTAMP"], "1000");
        assert_eq!(headers["CF-API-SIGNATURE"], expected);
        assert_eq!(headers["Content-Type"], "application/json");
    }
}
