use thiserror::Error;

/// Errors returned by the Lidl Plus receipt client.
#[derive(Debug, Error)]
pub enum LidlError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The account server refused the credentials or the verification code.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Reading the verification code from the operator failed.
    #[error("verification prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("pagination limit reached: exceeded {max_pages} ticket pages")]
    PaginationLimit { max_pages: u32 },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
