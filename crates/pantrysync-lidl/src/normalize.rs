//! Normalization from raw Lidl Plus line items to [`pantrysync_core::CatalogRecord`].
//!
//! String-level parsing is delegated to [`crate::parse`] and category
//! mapping to [`crate::classify`]; this module decides which raw fields feed
//! each record field. Nothing here fails: missing or malformed fields degrade
//! to a default or `None`.

use pantrysync_core::CatalogRecord;
use serde_json::Value;

use crate::classify::classify;
use crate::parse::{parse_price_text, split_brand, stable_name_hash};
use crate::types::{is_present, scalar_text, RawLineItem, ReceiptDetail};

/// Retailer tag written to `source` and used as the identity-key prefix.
pub const SOURCE_TAG: &str = "lidl";

/// Brand used when the product name does not start with a brand-like word.
pub const DEFAULT_BRAND: &str = "Lidl";

const UNKNOWN_PRODUCT: &str = "Unknown product";

/// Identity keys carry the name hash reduced to this range.
const NAME_HASH_MODULUS: u64 = 1_000_000;

/// Normalizes one receipt line into a catalog record.
///
/// `receipt_id` is used in the identity key when the line has no barcode.
#[must_use]
pub fn normalize_line_item(item: &RawLineItem, receipt_id: Option<&str>) -> CatalogRecord {
    let display_name = scalar_text(item.name.as_ref())
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_PRODUCT.to_owned());

    let (brand, product_name) = match split_brand(&display_name) {
        Some((brand, rest)) => (brand.to_owned(), rest.to_owned()),
        None => (DEFAULT_BRAND.to_owned(), display_name.clone()),
    };

    let barcode = [&item.code_input, &item.barcode, &item.ean]
        .into_iter()
        .find_map(|field| scalar_text(field.as_ref()));

    let label = scalar_text(item.category.as_ref())
        .or_else(|| scalar_text(item.tax_group_name.as_ref()));

    let id = identity_key(
        barcode.as_deref().or(receipt_id.filter(|id| !id.is_empty())),
        &product_name,
    );

    CatalogRecord {
        id,
        category: classify(label.as_deref()),
        unit_size: unit_size(item),
        price: line_price(item),
        product_name,
        brand,
        barcode,
        description: None,
        image_url: None,
        nutrition: None,
        is_available: true,
        source: SOURCE_TAG.to_owned(),
    }
}

/// Normalizes every line of a receipt, keyed on the receipt's own id.
#[must_use]
pub fn normalize_receipt(detail: &ReceiptDetail) -> Vec<CatalogRecord> {
    detail
        .items
        .iter()
        .map(|item| normalize_line_item(item, detail.id.as_deref()))
        .collect()
}

/// `"<source>-<barcode|receipt|unknown>-<name hash>"`.
fn identity_key(bucket: Option<&str>, product_name: &str) -> String {
    let bucket = bucket.unwrap_or("unknown");
    let name_hash = stable_name_hash(product_name) % NAME_HASH_MODULUS;
    format!("{SOURCE_TAG}-{bucket}-{name_hash}")
}

/// Unit price when it is non-empty, else the original amount, else zero.
///
/// Only a missing or `null` original amount defaults to zero. A present
/// field that does not parse, including an empty original amount, yields
/// `None`.
fn line_price(item: &RawLineItem) -> Option<f64> {
    let source = if is_present(item.current_unit_price.as_ref()) {
        item.current_unit_price.as_ref()
    } else {
        item.original_amount.as_ref().filter(|value| !value.is_null())
    };

    match source {
        None => Some(0.0),
        Some(Value::String(raw)) => parse_price_text(raw),
        Some(Value::Number(n)) => n.as_f64().filter(|price| price.is_finite()),
        Some(_) => None,
    }
}

/// `"<quantity> <unit>"` when a unit label is present, else the bare
/// quantity (default `"1"`).
fn unit_size(item: &RawLineItem) -> String {
    let quantity = scalar_text(item.quantity.as_ref()).unwrap_or_else(|| "1".to_owned());
    match scalar_text(item.unit.as_ref()) {
        Some(unit) => format!("{quantity} {unit}"),
        None => quantity,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
