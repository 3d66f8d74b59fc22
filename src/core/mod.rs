pub mod config;
pub mod describe;
pub mod errors;
pub mod kernel;
pub mod markets;
pub mod parsing;
pub mod precision;
pub mod traits;
pub mod types;
