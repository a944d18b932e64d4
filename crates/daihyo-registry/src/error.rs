use thiserror::Error;

/// Errors returned by the registry client.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The supplied code contains no digits, so no registry key exists.
    /// The registry is never contacted in this case.
    #[error("registration code \"{code}\" contains no digits")]
    EmptyRegistryKey { code: String },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
