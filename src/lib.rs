//! amz-gateway - HTTP facade for Amazon catalog search and pricing
//!
//! Forwards product searches and buy-box lookups to the Selling Partner API
//! and flattens the nested payloads into a stable JSON contract.

pub mod config;
pub mod server;
pub mod spapi;

pub use config::{Config, Credentials};
pub use spapi::marketplace::Marketplace;
pub use spapi::models::{BuyboxResult, NormalizedItem, QueryMode};
