pub mod conversions;
pub mod describe;
pub mod endpoints;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

// Re-export main components
pub use builder::{build_connector, CoinfalconBuilder};
pub use connector::{Account, CoinfalconConnector, MarketData, Trading};
pub use endpoints::{Api, Endpoint, Params};
pub use rest::{handle_errors, CoinfalconRest};
pub use signer::CoinfalconSigner;
pub use types::{CoinfalconOrderRequest, CoinfalconOrdersQuery, CoinfalconTradesQuery};
