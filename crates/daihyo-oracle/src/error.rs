use thiserror::Error;

/// Errors returned by the oracle client.
///
/// These cover the transport only. Contract violations in the oracle's
/// *content* (malformed JSON, missing fields) are not errors — the contract
/// parsers in [`crate::contracts`] turn them into absent evidence.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The completions endpoint returned a non-2xx status.
    #[error("oracle API error: status {status}: {body}")]
    Api { status: u16, body: String },

    /// The response envelope could not be deserialized.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope parsed but carried no message content.
    #[error("oracle response contained no message content")]
    MissingContent,

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
