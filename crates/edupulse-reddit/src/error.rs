use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedditError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 from the upstream; the collector backs off for at least
    /// `retry_after_secs` before the next query.
    #[error("rate limited by reddit (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// Auth failure or any other non-2xx status the caller cannot fix by
    /// waiting out a rate-limit window.
    #[error("reddit unavailable: {reason}")]
    Unavailable { reason: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
