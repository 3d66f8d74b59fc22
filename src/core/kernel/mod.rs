/// Exchange-agnostic transport layer
///
/// The kernel moves requests and bytes; it knows nothing about any particular
/// exchange's paths, payloads or error codes.
///
/// - `RestClient`: send a [`SignedRequest`] and hand back the [`RawResponse`]
/// - `Signer`: turn a request line into authentication headers
/// - `Clock`: wall-clock source for nonces and signatures
///
/// # Example
/// ```rust,no_run
/// use coinfalcon::core::kernel::*;
/// use reqwest::Method;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rest_config = RestClientConfig::new(
///     "https://coinfalcon.com".to_string(),
///     "coinfalcon".to_string(),
/// );
/// let rest = RestClientBuilder::new(rest_config).build()?;
///
/// let request = SignedRequest::new(
///     Method::GET,
///     "https://coinfalcon.com/api/v1/markets".to_string(),
/// );
/// let response = rest.send(&request).await?;
/// println!("{} {}", response.status, response.body);
/// # Ok(())
/// # }
/// ```
pub mod clock;
pub mod rest;
pub mod signer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use rest::{RawResponse, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, SignedRequest};
pub use signer::{hmac_sha256_hex, SignatureResult, Signer};
