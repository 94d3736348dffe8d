//! Selling Partner API modules for the HTTP client, payload models, and normalization.

pub mod client;
pub mod marketplace;
pub mod models;
pub mod normalize;

pub use client::{Catalog, SpApiClient};
pub use marketplace::Marketplace;
pub use models::{BuyboxResult, CatalogItem, NormalizedItem, QueryMode};
pub use normalize::{extract_buybox, normalize_item, normalize_items};
