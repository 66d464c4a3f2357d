use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommerceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Commerce API failed: product page {page}: {source}")]
    PageFetch {
        page: u32,
        #[source]
        source: Box<CommerceError>,
    },

    #[error("pipeline deadline of {budget_ms}ms exceeded")]
    DeadlineExceeded { budget_ms: u64 },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
