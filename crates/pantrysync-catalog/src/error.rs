use thiserror::Error;

/// Errors returned by the catalog store client.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// The upsert function answered 2xx but returned no row.
    #[error("upsert of {record_id} returned no data")]
    Rejected { record_id: String },

    #[error("invalid catalog URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
