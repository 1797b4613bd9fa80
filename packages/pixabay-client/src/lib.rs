//! Pure Pixabay image search client.
//!
//! Finds one representative stock photo for a free-text query. Image lookup
//! is best-effort enrichment, so [`PixabayClient::search`] never fails: bad
//! input, HTTP errors and empty result sets all come back as `None`.
//!
//! # Example
//!
//! ```rust,ignore
//! use pixabay_client::PixabayClient;
//!
//! let client = PixabayClient::new("your-api-key", Duration::from_secs(15))?;
//! if let Some(image) = client.search("mountain lake at sunrise").await {
//!     println!("{} ({})", image.url, image.source);
//! }
//! ```

pub mod error;
pub mod query;
pub mod types;

pub use error::{PixabayError, Result};
pub use query::normalize_query;
pub use types::{pick_image, Hit, SearchResponse, StockImage};

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const BASE_URL: &str = "https://pixabay.com/api/";

/// Hits requested per search. Only the first usable one is kept.
const PER_PAGE: u32 = 5;

/// Error bodies are cut to this many bytes before being stored in [`PixabayError::Api`].
const MAX_ERROR_BODY: usize = 500;

#[derive(Clone)]
pub struct PixabayClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl PixabayClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Set a custom base URL (for proxies or a local stub).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Find an image for `query`, or `None`.
    pub async fn search(&self, query: &str) -> Option<StockImage> {
        let Some(normalized) = normalize_query(query) else {
            debug!(query, "Image query rejected before search");
            return None;
        };

        match self.try_search(&normalized).await {
            Ok(image) => image,
            Err(e) => {
                warn!(query = %normalized, error = %e, "Image search failed");
                None
            }
        }
    }

    /// Run an already-normalized query and surface any failure.
    pub async fn try_search(&self, normalized_query: &str) -> Result<Option<StockImage>> {
        let per_page = PER_PAGE.to_string();
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", normalized_query),
                ("image_type", "photo"),
                ("orientation", "horizontal"),
                ("safesearch", "true"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PixabayError::Parse(e.to_string()))?;

        let image = pick_image(&body.hits);
        debug!(
            query = %normalized_query,
            hits = body.hits.len(),
            found = image.is_some(),
            "Pixabay search"
        );
        Ok(image)
    }
}

fn api_error(status: u16, body: &str) -> PixabayError {
    PixabayError::Api {
        status,
        message: truncate_to_char_boundary(body, MAX_ERROR_BODY).to_string(),
    }
}

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}
