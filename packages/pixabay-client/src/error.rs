//! Error types for the Pixabay client.
//!
//! These never escape [`crate::PixabayClient::search`], which degrades every
//! failure to "no image". They are public for callers of the lower-level
//! [`crate::PixabayClient::try_search`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PixabayError>;

#[derive(Debug, Error)]
pub enum PixabayError {
    #[error("Pixabay API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}
