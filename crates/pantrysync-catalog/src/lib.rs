pub mod client;
pub mod error;

pub use client::CatalogClient;
pub use error::CatalogError;
