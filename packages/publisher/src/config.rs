use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use wordpress_client::BasicAuth;

use crate::security::SecretString;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
///
/// Only the WordPress base URL is required. Missing service credentials do
/// not fail here; each service degrades on its own (see `PublisherDeps`).
#[derive(Debug, Clone)]
pub struct Config {
    pub wordpress_base_url: String,
    pub wordpress_username: Option<String>,
    pub wordpress_password: Option<SecretString>,
    pub openai_api_key: Option<SecretString>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub pixabay_api_key: Option<SecretString>,
    /// Upper bound for every outbound HTTP request.
    pub http_timeout: Duration,
    /// How many posts a batch works on at once.
    pub publish_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            wordpress_base_url: get("WORDPRESS_BASE_URL")
                .context("WORDPRESS_BASE_URL must be set")?,
            wordpress_username: get("WORDPRESS_USERNAME"),
            wordpress_password: get("WORDPRESS_APP_PASSWORD").map(SecretString::from),
            openai_api_key: get("OPENAI_API_KEY").map(SecretString::from),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            pixabay_api_key: get("PIXABAY_API_KEY").map(SecretString::from),
            http_timeout: Duration::from_secs(
                get("HTTP_TIMEOUT_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
            publish_concurrency: get("PUBLISH_CONCURRENCY")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("PUBLISH_CONCURRENCY must be a positive number")?
                .unwrap_or(1)
                .max(1),
        })
    }

    /// Basic-auth credentials, when both username and password are set.
    pub fn wordpress_auth(&self) -> Option<BasicAuth> {
        match (&self.wordpress_username, &self.wordpress_password) {
            (Some(username), Some(password)) => {
                Some(BasicAuth::new(username.clone(), password.expose()))
            }
            _ => None,
        }
    }
}
