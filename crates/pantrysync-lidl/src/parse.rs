//! Low-level string helpers for receipt line items: brand/name splitting,
//! locale price parsing and the stable name hash used in identity keys.
//!
//! See [`crate::normalize`] for how they compose into a catalog record.

use sha2::{Digest, Sha256};

/// Splits a display name into `(brand, product_name)` when the first word
/// looks like a brand.
///
/// The first word is taken as a brand when it is fully upper-case or longer
/// than two characters. This is a heuristic: `"Milbona Yoghurt"` yields
/// brand `"Milbona"`, but so does `"Verse tomaten"` (`"Verse"`), and short
/// lower-case brands are never detected.
///
/// Returns `None` when the name has no space or the first word does not
/// qualify; callers keep their default brand and the full name.
#[must_use]
pub(crate) fn split_brand(name: &str) -> Option<(&str, &str)> {
    let (candidate, rest) = name.split_once(' ')?;
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    if is_upper_token(candidate) || candidate.chars().count() > 2 {
        Some((candidate, rest))
    } else {
        None
    }
}

/// `true` when the token has at least one cased character and no lower-case
/// ones, so `"AH"` and `"K2"` qualify but `"42"` does not.
fn is_upper_token(token: &str) -> bool {
    let mut has_cased = false;
    for c in token.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Parses a locale-formatted price such as `"2,99"`, `"€ 2,99"` or `"1.49"`.
///
/// Strips the euro sign, turns decimal commas into points, trims whitespace,
/// then parses as `f64`. Returns `None` for anything that is not a finite
/// number afterwards.
#[must_use]
pub(crate) fn parse_price_text(raw: &str) -> Option<f64> {
    let cleaned = raw.replace('€', "").replace(',', ".");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

/// Stable 64-bit hash of a product name: the first eight bytes of its
/// SHA-256 digest, big-endian.
#[must_use]
pub(crate) fn stable_name_hash(name: &str) -> u64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}
