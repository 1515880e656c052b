use thiserror::Error;

/// Errors returned by the Openverse client.
#[derive(Debug, Error)]
pub enum OpenverseError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A downloaded asset exceeded the configured size limit.
    #[error("asset at {url} is larger than {limit} bytes")]
    TooLarge { url: String, limit: u64 },

    /// A base URL or asset URL could not be parsed.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
