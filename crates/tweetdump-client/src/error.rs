use thiserror::Error;

/// Errors returned by the X API client and the response normalizer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP 429. Expected backpressure, handled by [`crate::rate_limit`].
    #[error("rate limited by the API (reset in {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("request rejected with HTTP {status} (check the bearer token): {url}")]
    Unauthorized { status: u16, url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The API answered 200 but reported a problem in its `errors` array.
    #[error("API error: {0}")]
    Api(String),

    #[error("cannot normalize post {post_id}: {reason}")]
    Normalization { post_id: String, reason: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
