//! Data models for raw catalog/pricing payloads and the flattened output contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Which upstream catalog operation a search request maps to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Exact-identifier lookup; yields at most one item.
    Asin,
    /// Identifier search by UPC.
    Upc,
    /// Free-text search; the default when unspecified.
    #[default]
    Keyword,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Asin => write!(f, "asin"),
            QueryMode::Upc => write!(f, "upc"),
            QueryMode::Keyword => write!(f, "keyword"),
        }
    }
}

/// A catalog item flattened to the fixed response contract.
///
/// Constructed once per raw item and never mutated afterwards. The serialized
/// key names (`asin`, `title`, `brand`, `listPrice`, `imageUrl`, `category`)
/// are part of the front-end contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    pub asin: String,
    pub title: String,
    pub brand: String,
    pub list_price: f64,
    pub image_url: String,
    pub category: String,
}

/// Buy-box lookup result.
///
/// `lowest_price` and `offers_count` are reserved contract fields; no
/// extraction rule populates them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyboxResult {
    pub buybox_price: f64,
    pub lowest_price: f64,
    pub offers_count: u64,
}

/// A bare JSON scalar as it appears inside attribute values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Scalar {
    /// Numeric view of the scalar. Strings are parsed; booleans never coerce.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Number(n) => Some(*n),
            Scalar::Bool(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Object price form: `{"amount": ...}` in catalog attributes, `{"Amount": ...}`
/// in pricing payloads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AmountObject {
    #[serde(default, alias = "Amount")]
    pub amount: Option<Scalar>,
    #[serde(default, alias = "CurrencyCode", alias = "currency")]
    pub currency_code: Option<String>,
}

impl AmountObject {
    /// The price-amount coercion shared by list-price normalization and
    /// buy-box extraction. A missing or non-numeric amount yields `None`.
    pub fn to_float(&self) -> Option<f64> {
        self.amount.as_ref().and_then(Scalar::to_f64)
    }
}

/// "String-like" object form of an attribute value: `{"value": ..., "language_tag": ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextObject {
    pub value: Scalar,
    #[serde(default)]
    pub language_tag: Option<String>,
}

/// One attribute value from a catalog payload.
///
/// Upstream encodes attribute values as bare scalars, string-like value
/// objects, amount objects, or ordered lists of any of these. Variants are
/// matched in declaration order; anything unrecognized lands in `Other` so
/// item deserialization stays total.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Sequence(Vec<AttrValue>),
    Text(TextObject),
    Amount(AmountObject),
    Scalar(Scalar),
    Other(Value),
}

impl AttrValue {
    /// Resolves the value to display text. Lists resolve through their first
    /// element; scalars and value objects stringify. Empty text resolves to
    /// `None` so the caller's default applies.
    pub fn as_text(&self) -> Option<String> {
        match self {
            AttrValue::Sequence(items) => items.first().and_then(AttrValue::as_text),
            AttrValue::Text(t) => non_empty(t.value.to_string()),
            AttrValue::Scalar(s) => non_empty(s.to_string()),
            AttrValue::Amount(_) | AttrValue::Other(_) => None,
        }
    }

    /// Resolves the value to a price amount. Lists resolve through their first
    /// element; only the amount-object form coerces. Bare scalars carry no
    /// `amount` field and never coerce.
    pub fn as_amount(&self) -> Option<f64> {
        match self {
            AttrValue::Sequence(items) => items.first().and_then(AttrValue::as_amount),
            AttrValue::Amount(a) => a.to_float(),
            _ => None,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// One marketplace image group from a catalog item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGroup {
    #[serde(default)]
    pub marketplace_id: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

/// A single image record inside a group.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageRecord {
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// Product type entries arrive either as bare strings or as
/// `{"productType": ...}` objects depending on the catalog API generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProductType {
    Tagged {
        #[serde(rename = "productType")]
        product_type: String,
        #[serde(rename = "marketplaceId", default)]
        marketplace_id: Option<String>,
    },
    Name(String),
}

impl ProductType {
    /// The product type name regardless of wire form.
    pub fn name(&self) -> &str {
        match self {
            ProductType::Tagged { product_type, .. } => product_type,
            ProductType::Name(name) => name,
        }
    }
}

/// A raw catalog item as returned by the catalog API.
///
/// Every field is optional on the wire and defaults when absent, so
/// normalization can degrade per field instead of rejecting the item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default)]
    pub asin: String,
    #[serde(default)]
    pub attributes: HashMap<String, AttrValue>,
    #[serde(default)]
    pub images: Vec<ImageGroup>,
    #[serde(default)]
    pub product_types: Vec<ProductType>,
}

/// One per-ASIN record from a competitive-pricing payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingRecord {
    #[serde(rename = "ASIN", default)]
    pub asin: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "Product", default)]
    pub product: Option<PricingProduct>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingProduct {
    #[serde(rename = "CompetitivePricing", default)]
    pub competitive_pricing: Option<CompetitivePricing>,
}

/// Condition-segmented price listing for one product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompetitivePricing {
    #[serde(rename = "CompetitivePrices", default)]
    pub competitive_prices: Vec<CompetitivePrice>,
    #[serde(rename = "NumberOfOfferListings", default)]
    pub number_of_offer_listings: Vec<OfferListingCount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompetitivePrice {
    #[serde(rename = "CompetitivePriceId", default)]
    pub competitive_price_id: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub subcondition: Option<String>,
    #[serde(rename = "Price", default)]
    pub price: Option<PriceSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceSet {
    #[serde(rename = "ListingPrice", default)]
    pub listing_price: Option<AmountObject>,
    #[serde(rename = "LandedPrice", default)]
    pub landed_price: Option<AmountObject>,
    #[serde(rename = "Shipping", default)]
    pub shipping: Option<AmountObject>,
}

/// Offer-listing counts by condition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferListingCount {
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(rename = "Count", default)]
    pub count: u64,
}
