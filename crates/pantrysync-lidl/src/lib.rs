pub mod classify;
pub mod client;
pub mod error;
pub mod normalize;
pub mod parse;
pub mod types;

pub use classify::classify;
pub use client::{LidlClient, LidlSettings};
pub use error::LidlError;
pub use normalize::{normalize_line_item, normalize_receipt, DEFAULT_BRAND, SOURCE_TAG};
pub use types::{RawLineItem, ReceiptDetail, ReceiptSummary, TicketsPage};
