//! Error kinds surfaced by the optimization and publishing stages.

use openai_client::OpenAIError;
use thiserror::Error;
use wordpress_client::WordPressError;

pub type Result<T> = std::result::Result<T, PublishError>;

#[derive(Debug, Error)]
pub enum PublishError {
    /// Credentials for `service` are not configured. No request was made.
    #[error("missing credentials for {0}")]
    MissingCredentials(&'static str),

    /// The remote service answered with a non-success status.
    #[error("{service} returned {status}: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The generation response was not the JSON object we asked for.
    #[error("could not parse optimization response: {0}")]
    OptimizationParse(String),

    /// The remote service could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// A successful response whose body had an unexpected shape.
    #[error("invalid response from {service}: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },
}

impl From<WordPressError> for PublishError {
    fn from(err: WordPressError) -> Self {
        const SERVICE: &str = "wordpress";
        match err {
            WordPressError::MissingCredentials => PublishError::MissingCredentials(SERVICE),
            WordPressError::Api { status, body } => PublishError::Upstream {
                service: SERVICE,
                status,
                body,
            },
            WordPressError::MediaSource {
                url,
                status: Some(status),
                reason,
            } => PublishError::Upstream {
                service: "image source",
                status,
                body: format!("{}: {}", url, reason),
            },
            WordPressError::MediaSource { url, reason, .. } => {
                PublishError::Transport(format!("image source {}: {}", url, reason))
            }
            WordPressError::Network(e) => PublishError::Transport(e.to_string()),
            WordPressError::Parse(message) => PublishError::InvalidResponse {
                service: SERVICE,
                message,
            },
        }
    }
}

impl From<OpenAIError> for PublishError {
    fn from(err: OpenAIError) -> Self {
        const SERVICE: &str = "openai";
        match err {
            OpenAIError::Config(_) => PublishError::MissingCredentials(SERVICE),
            OpenAIError::Api { status, message } => PublishError::Upstream {
                service: SERVICE,
                status,
                body: message,
            },
            OpenAIError::Network(message) => PublishError::Transport(message),
            OpenAIError::Parse(message) => PublishError::InvalidResponse {
                service: SERVICE,
                message,
            },
        }
    }
}
