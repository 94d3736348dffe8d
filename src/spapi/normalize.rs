//! Normalization of raw catalog and pricing payloads into the flat response contract.

use crate::spapi::models::{AttrValue, BuyboxResult, CatalogItem, NormalizedItem, PricingRecord};
use serde_json::Value;
use tracing::{error, warn};

/// Placeholder title for items whose name cannot be resolved.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Flattens one raw catalog item into the fixed response contract.
///
/// Total over its input: a field that cannot be resolved degrades to its
/// default instead of failing the item.
pub fn normalize_item(item: &CatalogItem) -> NormalizedItem {
    let attributes = &item.attributes;

    let title = attributes
        .get("item_name")
        .or_else(|| attributes.get("title"))
        .and_then(AttrValue::as_text)
        .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());

    let brand = attributes.get("brand").and_then(AttrValue::as_text).unwrap_or_default();

    let list_price =
        attributes.get("list_price").and_then(AttrValue::as_amount).unwrap_or_default();

    NormalizedItem {
        asin: item.asin.clone(),
        title,
        brand,
        list_price,
        image_url: first_image_link(item).unwrap_or_default(),
        category: item.product_types.first().map(|pt| pt.name().to_string()).unwrap_or_default(),
    }
}

/// First image link in document order: groups are scanned in order, records
/// within each group in order, and the scan stops at the first record that
/// carries a link.
fn first_image_link(item: &CatalogItem) -> Option<String> {
    item.images
        .iter()
        .flat_map(|group| group.images.iter())
        .find_map(|image| image.link.clone())
}

/// Batch step over a raw item collection.
///
/// Each element is decoded independently; an element whose overall shape
/// cannot be decoded is logged and dropped without aborting the batch.
/// Field-level oddities never reach this point — they default inside
/// [`normalize_item`].
pub fn normalize_items(raw_items: &[Value]) -> Vec<NormalizedItem> {
    let mut items = Vec::with_capacity(raw_items.len());
    for raw in raw_items {
        match serde_json::from_value::<CatalogItem>(raw.clone()) {
            Ok(item) => items.push(normalize_item(&item)),
            Err(e) => error!("Error processing item: {}", e),
        }
    }
    items
}

/// Extracts the buy-box price from a competitive-pricing payload.
///
/// Scans per-ASIN records defensively (callers pass a single ASIN, but the
/// payload is still a collection) and takes the first entry whose condition
/// is `"New"` and whose listing price coerces to a float, stopping entirely
/// at the first match. A record that cannot be decoded is logged and
/// skipped; no failure escapes.
pub fn extract_buybox(payload: &[Value]) -> BuyboxResult {
    let mut result = BuyboxResult::default();

    'records: for raw in payload {
        let record = match serde_json::from_value::<PricingRecord>(raw.clone()) {
            Ok(record) => record,
            Err(e) => {
                warn!("Could not decode pricing record: {}", e);
                continue;
            }
        };

        let Some(pricing) = record.product.and_then(|p| p.competitive_pricing) else {
            continue;
        };

        for entry in &pricing.competitive_prices {
            if entry.condition.as_deref() != Some("New") {
                continue;
            }
            let listing = entry.price.as_ref().and_then(|p| p.listing_price.as_ref());
            if let Some(amount) = listing.and_then(|l| l.to_float()) {
                result.buybox_price = amount;
                break 'records;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(json: Value) -> CatalogItem {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_missing_attributes_defaults() {
        let normalized = normalize_item(&item(json!({"asin": "B0TEST0001"})));

        assert_eq!(normalized.asin, "B0TEST0001");
        assert_eq!(normalized.title, UNKNOWN_PRODUCT);
        assert_eq!(normalized.brand, "");
        assert_eq!(normalized.list_price, 0.0);
        assert_eq!(normalized.image_url, "");
        assert_eq!(normalized.category, "");
    }

    #[test]
    fn test_missing_asin_is_empty() {
        let normalized = normalize_item(&item(json!({})));
        assert_eq!(normalized.asin, "");
        assert_eq!(normalized.title, UNKNOWN_PRODUCT);
    }

    #[test]
    fn test_sequence_and_scalar_forms_are_equivalent() {
        let as_scalar = normalize_item(&item(json!({
            "attributes": {"item_name": "Echo Dot", "brand": "Amazon"}
        })));
        let as_sequence = normalize_item(&item(json!({
            "attributes": {"item_name": ["Echo Dot"], "brand": ["Amazon"]}
        })));

        assert_eq!(as_scalar, as_sequence);
        assert_eq!(as_scalar.title, "Echo Dot");
        assert_eq!(as_scalar.brand, "Amazon");
    }

    #[test]
    fn test_title_falls_back_to_title_attribute() {
        let normalized = normalize_item(&item(json!({
            "attributes": {"title": ["Fallback Title"]}
        })));
        assert_eq!(normalized.title, "Fallback Title");
    }

    #[test]
    fn test_item_name_preferred_over_title() {
        let normalized = normalize_item(&item(json!({
            "attributes": {"item_name": ["Primary"], "title": ["Secondary"]}
        })));
        assert_eq!(normalized.title, "Primary");
    }

    #[test]
    fn test_empty_title_uses_placeholder() {
        let normalized = normalize_item(&item(json!({
            "attributes": {"item_name": [""]}
        })));
        assert_eq!(normalized.title, UNKNOWN_PRODUCT);
    }

    #[test]
    fn test_text_object_title() {
        let normalized = normalize_item(&item(json!({
            "attributes": {"item_name": [{"value": "Echo Dot", "language_tag": "en_US"}]}
        })));
        assert_eq!(normalized.title, "Echo Dot");
    }

    #[test]
    fn test_list_price_string_coercion() {
        let normalized = normalize_item(&item(json!({
            "attributes": {"list_price": [{"amount": "19.99"}]}
        })));
        assert_eq!(normalized.list_price, 19.99);
    }

    #[test]
    fn test_list_price_coercion_failure_defaults() {
        let normalized = normalize_item(&item(json!({
            "attributes": {"list_price": [{"amount": "not-a-number"}]}
        })));
        assert_eq!(normalized.list_price, 0.0);
    }

    #[test]
    fn test_list_price_bare_scalar_defaults() {
        // No `amount` field on a bare number, so it is not treated as a price.
        let normalized = normalize_item(&item(json!({
            "attributes": {"list_price": [19.99]}
        })));
        assert_eq!(normalized.list_price, 0.0);
    }

    #[test]
    fn test_list_price_unwrapped_amount_object() {
        let normalized = normalize_item(&item(json!({
            "attributes": {"list_price": {"amount": 24.5, "currency": "USD"}}
        })));
        assert_eq!(normalized.list_price, 24.5);
    }

    #[test]
    fn test_image_scan_continues_across_groups() {
        let normalized = normalize_item(&item(json!({
            "images": [
                {"marketplaceId": "ATVPDKIKX0DER", "images": []},
                {"marketplaceId": "A1F83G8C2ARO7P", "images": [
                    {"variant": "MAIN", "link": "http://x/img.jpg"},
                    {"variant": "PT01", "link": "http://x/img2.jpg"}
                ]}
            ]
        })));
        assert_eq!(normalized.image_url, "http://x/img.jpg");
    }

    #[test]
    fn test_image_scan_skips_records_without_link() {
        let normalized = normalize_item(&item(json!({
            "images": [
                {"images": [{"variant": "MAIN"}, {"variant": "PT01", "link": "http://x/pt01.jpg"}]}
            ]
        })));
        assert_eq!(normalized.image_url, "http://x/pt01.jpg");
    }

    #[test]
    fn test_category_takes_first_product_type() {
        let normalized = normalize_item(&item(json!({
            "productTypes": [
                {"productType": "SPEAKER", "marketplaceId": "ATVPDKIKX0DER"},
                {"productType": "ELECTRONICS"}
            ]
        })));
        assert_eq!(normalized.category, "SPEAKER");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = item(json!({
            "asin": "B08N5WRWNW",
            "attributes": {
                "item_name": ["Echo Dot (4th Gen)"],
                "brand": ["Amazon"],
                "list_price": [{"amount": "49.99", "currency": "USD"}]
            },
            "images": [{"images": [{"variant": "MAIN", "link": "http://x/img.jpg"}]}],
            "productTypes": [{"productType": "SPEAKER"}]
        }));

        let first = normalize_item(&raw);
        let second = normalize_item(&raw);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_normalize_items_drops_malformed_elements() {
        let raw = vec![
            json!({"asin": "B0GOOD0001", "attributes": {"item_name": ["Kept"]}}),
            json!("not an item at all"),
            json!({"asin": "B0GOOD0002"}),
        ];

        let items = normalize_items(&raw);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].asin, "B0GOOD0001");
        assert_eq!(items[1].asin, "B0GOOD0002");
    }

    fn pricing_payload(entries: Value) -> Vec<Value> {
        vec![json!({
            "ASIN": "B08N5WRWNW",
            "status": "Success",
            "Product": {"CompetitivePricing": {"CompetitivePrices": entries}}
        })]
    }

    #[test]
    fn test_buybox_first_new_condition_wins() {
        let payload = pricing_payload(json!([
            {"condition": "Used", "Price": {"ListingPrice": {"Amount": 5}}},
            {"condition": "New", "Price": {"ListingPrice": {"Amount": 12.5}}}
        ]));

        let result = extract_buybox(&payload);
        assert_eq!(result.buybox_price, 12.5);
        assert_eq!(result.lowest_price, 0.0);
        assert_eq!(result.offers_count, 0);
    }

    #[test]
    fn test_buybox_stops_at_first_match() {
        // A later, cheaper "New" entry must not replace the first match.
        let payload = pricing_payload(json!([
            {"condition": "New", "Price": {"ListingPrice": {"Amount": 30.0}}},
            {"condition": "New", "Price": {"ListingPrice": {"Amount": 10.0}}}
        ]));

        assert_eq!(extract_buybox(&payload).buybox_price, 30.0);
    }

    #[test]
    fn test_buybox_no_new_condition_returns_zeroed() {
        let payload = pricing_payload(json!([
            {"condition": "Used", "Price": {"ListingPrice": {"Amount": 5}}},
            {"condition": "Collectible", "Price": {"ListingPrice": {"Amount": 99.0}}}
        ]));

        assert_eq!(extract_buybox(&payload), BuyboxResult::default());
    }

    #[test]
    fn test_buybox_new_without_amount_is_passed_over() {
        let payload = pricing_payload(json!([
            {"condition": "New", "Price": {"ListingPrice": {"CurrencyCode": "USD"}}},
            {"condition": "New", "Price": {"ListingPrice": {"Amount": "12.5"}}}
        ]));

        assert_eq!(extract_buybox(&payload).buybox_price, 12.5);
    }

    #[test]
    fn test_buybox_empty_payload() {
        assert_eq!(extract_buybox(&[]), BuyboxResult::default());
    }

    #[test]
    fn test_buybox_scans_across_records() {
        let payload = vec![
            json!({"ASIN": "B0FIRST", "status": "Success"}),
            json!({"ASIN": "B0SECOND", "Product": {"CompetitivePricing": {
                "CompetitivePrices": [{"condition": "New", "Price": {"ListingPrice": {"Amount": 7.5}}}]
            }}}),
        ];

        assert_eq!(extract_buybox(&payload).buybox_price, 7.5);
    }

    #[test]
    fn test_buybox_malformed_record_is_skipped() {
        let mut payload = vec![json!(["definitely", "not", "a", "record"])];
        payload.extend(pricing_payload(json!([
            {"condition": "New", "Price": {"ListingPrice": {"Amount": 3.25}}}
        ])));

        assert_eq!(extract_buybox(&payload).buybox_price, 3.25);
    }
}
