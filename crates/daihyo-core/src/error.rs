use thiserror::Error;

/// Errors from loading or validating [`crate::AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors from constructing core domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required run input (shop name or address) is missing or empty.
    /// Rejected at the boundary, before any pipeline stage runs.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
