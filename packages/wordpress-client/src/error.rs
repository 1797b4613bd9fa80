//! Error types for the WordPress client.

use thiserror::Error;

/// Result type for WordPress client operations.
pub type Result<T> = std::result::Result<T, WordPressError>;

/// WordPress client errors.
#[derive(Debug, Error)]
pub enum WordPressError {
    /// No basic-auth credentials were configured. Raised before any request is sent.
    #[error("WordPress credentials are not configured")]
    MissingCredentials,

    /// Non-2xx response. `body` is truncated for diagnostics.
    #[error("WordPress API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The image to upload could not be downloaded from its source host.
    /// `status` is set when the host answered with a non-success status.
    #[error("Media source {url} unavailable: {reason}")]
    MediaSource {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}
