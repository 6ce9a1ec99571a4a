//! Lidl Plus tickets API response types.
//!
//! ## Observed shape
//!
//! Line items are loosely typed. Prices arrive as locale-formatted strings
//! (`"2,99"`), but quantities and barcodes show up as either strings or
//! numbers depending on the store and the till software. Category labels are
//! free text in the account language, and most tickets only carry a tax
//! group (`"A"`, `"B"`) instead of a category.
//!
//! Every line-item field is therefore kept as a raw [`serde_json::Value`] so
//! one odd field never fails the whole ticket; interpretation happens in
//! [`crate::normalize`].

use serde::Deserialize;
use serde_json::Value;

/// One page of `GET /{country}/tickets`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketsPage {
    #[serde(default)]
    pub tickets: Vec<ReceiptSummary>,
    /// Total tickets across all pages.
    #[serde(default)]
    pub total_count: u64,
    /// Page size the server used.
    #[serde(default)]
    pub size: u64,
}

/// A ticket as listed by the tickets endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSummary {
    pub id: String,
    /// Purchase timestamp, e.g. `"2024-03-02T10:41:00+00:00"`.
    #[serde(default)]
    pub date: Option<String>,
}

/// Full ticket from `GET /{country}/tickets/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceiptDetail {
    #[serde(default)]
    pub id: Option<String>,
    /// Absent on some voided tickets; treated as empty.
    #[serde(default)]
    pub items: Vec<RawLineItem>,
}

/// A single receipt line, exactly as the tickets API returned it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLineItem {
    #[serde(default)]
    pub name: Option<Value>,
    /// Locale-formatted unit price, e.g. `"2,99"` or `"€ 2,99"`.
    #[serde(default)]
    pub current_unit_price: Option<Value>,
    #[serde(default)]
    pub original_amount: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub unit: Option<Value>,
    #[serde(default)]
    pub code_input: Option<Value>,
    #[serde(default)]
    pub barcode: Option<Value>,
    #[serde(default)]
    pub ean: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub tax_group_name: Option<Value>,
}

/// Reads a scalar field as text. Strings pass through, numbers are rendered
/// in their JSON form, and empty strings or any other JSON type count as
/// absent.
pub(crate) fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns `true` when a field carries something other than `null` or `""`.
pub(crate) fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
