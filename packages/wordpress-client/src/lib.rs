//! Pure WordPress REST API client.
//!
//! Covers the handful of endpoints needed to read drafts, resolve authors and
//! taxonomy terms, upload media and update posts. All calls use HTTP basic
//! authentication with an application password.
//!
//! # Example
//!
//! ```rust,ignore
//! use wordpress_client::{BasicAuth, PostStatus, WordPressClient, WordPressConfig};
//!
//! let client = WordPressClient::new(
//!     WordPressConfig::new("https://example.com/wp-json")
//!         .with_auth(BasicAuth::new("editor", "app-password")),
//! )?;
//!
//! let page = client.list_posts(PostStatus::Draft, 20, 1).await?;
//! for post in &page.posts {
//!     println!("{} {}", post.id, post.title.rendered);
//! }
//! ```
//!
//! Taxonomy lookups never create terms. A name without a matching slug simply
//! resolves to nothing.

pub mod error;
pub mod slug;
pub mod types;

pub use error::{Result, WordPressError};
pub use slug::slugify;
pub use types::*;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Content type assumed when the image source does not report one.
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// Error bodies are cut to this many bytes before being stored in [`WordPressError::Api`].
const MAX_ERROR_BODY: usize = 500;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Basic-auth credentials. Only the encoded header value is kept.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    header_value: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        let username = username.into();
        let token = STANDARD.encode(format!("{}:{}", username, password));
        Self {
            username,
            header_value: format!("Basic {}", token),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> &str {
        &self.header_value
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("header_value", &"[REDACTED]")
            .finish()
    }
}

/// Connection settings for [`WordPressClient`].
#[derive(Debug, Clone)]
pub struct WordPressConfig {
    /// REST root, e.g. `https://example.com/wp-json`.
    pub base_url: String,
    pub auth: Option<BasicAuth>,
    pub timeout: Duration,
}

impl WordPressConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_auth(mut self, auth: BasicAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// WordPress REST API client.
#[derive(Clone)]
pub struct WordPressClient {
    http_client: Client,
    base_url: String,
    auth: Option<BasicAuth>,
}

impl WordPressClient {
    pub fn new(config: WordPressConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth: config.auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth(&self) -> Result<&BasicAuth> {
        self.auth.as_ref().ok_or(WordPressError::MissingCredentials)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/wp/v2/{}", self.base_url, path)
    }

    /// Authenticated GET returning the decoded body and the response headers.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(T, HeaderMap)> {
        let auth = self.auth()?;
        let response = self
            .http_client
            .get(self.endpoint(path))
            .header(AUTHORIZATION, auth.header_value())
            .query(query)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let headers = response.headers().clone();
        let body = response
            .json()
            .await
            .map_err(|e| WordPressError::Parse(e.to_string()))?;
        Ok((body, headers))
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// List posts with the given status.
    ///
    /// Posts sharing a rendered title are collapsed to the first one returned,
    /// since the API can hand back near-identical drafts without unique slugs.
    pub async fn list_posts(&self, status: PostStatus, per_page: u32, page: u32) -> Result<PostPage> {
        let query = [
            ("status", status.as_str().to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
            ("_embed", "true".to_string()),
        ];
        let (posts, headers): (Vec<Post>, _) = self.get_json("posts", &query).await?;

        let fetched = posts.len();
        let posts = dedup_by_title(posts);
        debug!(
            status = %status,
            page,
            fetched,
            kept = posts.len(),
            "Listed WordPress posts"
        );

        Ok(PostPage {
            posts,
            total: header_number(&headers, "x-wp-total"),
            total_pages: header_number(&headers, "x-wp-totalpages"),
        })
    }

    /// Fetch a single post by id.
    pub async fn get_post(&self, id: u64) -> Result<Post> {
        let (post, _) = self.get_json(&format!("posts/{}", id), &[]).await?;
        Ok(post)
    }

    // =========================================================================
    // Authors and taxonomy
    // =========================================================================

    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        let (authors, _) = self
            .get_json("users", &[("per_page", "100".to_string())])
            .await?;
        Ok(authors)
    }

    /// Exact slug match against the site's users.
    pub async fn resolve_author_id(&self, slug: &str) -> Result<Option<u64>> {
        let (authors, _): (Vec<Author>, _) = self
            .get_json("users", &[("slug", slug.to_string())])
            .await?;
        Ok(authors.into_iter().find(|a| a.slug == slug).map(|a| a.id))
    }

    pub async fn resolve_category_id(&self, name: &str) -> Result<Option<u64>> {
        self.find_term("categories", &slugify(name)).await
    }

    /// Resolve each tag name independently. Names with no matching tag, or
    /// whose lookup fails, are left out of the result.
    pub async fn resolve_tag_ids(&self, names: &[String]) -> Result<Vec<u64>> {
        self.auth()?;

        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let slug = slugify(name);
            match self.find_term("tags", &slug).await {
                Ok(Some(id)) if !ids.contains(&id) => ids.push(id),
                Ok(Some(_)) => {}
                Ok(None) => debug!(tag = %name, slug = %slug, "No matching tag"),
                Err(e) => warn!(tag = %name, error = %e, "Tag lookup failed"),
            }
        }
        Ok(ids)
    }

    async fn find_term(&self, taxonomy: &str, slug: &str) -> Result<Option<u64>> {
        let (terms, _): (Vec<Term>, _) = self
            .get_json(taxonomy, &[("slug", slug.to_string())])
            .await?;
        Ok(terms.into_iter().find(|t| t.slug == slug).map(|t| t.id))
    }

    // =========================================================================
    // Media
    // =========================================================================

    /// Download `source_url` and re-upload it to the media library.
    pub async fn upload_media(&self, source_url: &str, filename: &str) -> Result<MediaUpload> {
        let auth = self.auth()?;

        let source = self
            .http_client
            .get(source_url)
            .send()
            .await
            .map_err(|e| media_source_error(source_url, None, e.to_string()))?;
        let status = source.status();
        if !status.is_success() {
            return Err(media_source_error(
                source_url,
                Some(status.as_u16()),
                status.to_string(),
            ));
        }
        let content_type = source
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_MEDIA_TYPE)
            .to_string();
        let bytes = source
            .bytes()
            .await
            .map_err(|e| media_source_error(source_url, None, e.to_string()))?;

        debug!(
            source_url,
            filename,
            content_type = %content_type,
            size = bytes.len(),
            "Uploading media"
        );

        let response = self
            .http_client
            .post(self.endpoint("media"))
            .header(AUTHORIZATION, auth.header_value())
            .header(CONTENT_TYPE, content_type)
            .header(
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            )
            .body(bytes)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        response
            .json()
            .await
            .map_err(|e| WordPressError::Parse(e.to_string()))
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Update an existing post.
    ///
    /// Everything is sent in one request first. If that fails and the update
    /// carried meta fields, the core fields are re-sent alone and each meta
    /// field is then written on its own; a meta field that fails is recorded
    /// in the report rather than failing the call.
    pub async fn update_post(&self, id: u64, update: &PostUpdate) -> Result<UpdateReport> {
        let meta = update.meta.entries();

        let combined_error = match self.put_post(id, update).await {
            Ok(()) => {
                return Ok(UpdateReport {
                    combined: true,
                    meta: meta
                        .into_iter()
                        .map(|(key, _)| MetaWrite {
                            key: key.to_string(),
                            written: true,
                        })
                        .collect(),
                });
            }
            Err(e) => e,
        };

        if meta.is_empty() || matches!(combined_error, WordPressError::MissingCredentials) {
            return Err(combined_error);
        }

        warn!(
            post_id = id,
            error = %combined_error,
            "Combined post update failed, retrying without meta"
        );
        self.put_post(id, &update.without_meta()).await?;

        let mut writes = Vec::with_capacity(meta.len());
        for (key, value) in meta {
            let mut fields = serde_json::Map::new();
            fields.insert(key.to_string(), serde_json::Value::String(value));
            let body = serde_json::json!({ "meta": fields });
            let written = match self.put_post(id, &body).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(post_id = id, meta_key = key, error = %e, "Meta field write failed");
                    false
                }
            };
            writes.push(MetaWrite {
                key: key.to_string(),
                written,
            });
        }

        Ok(UpdateReport {
            combined: false,
            meta: writes,
        })
    }

    async fn put_post<B: serde::Serialize + ?Sized>(&self, id: u64, body: &B) -> Result<()> {
        let auth = self.auth()?;
        let response = self
            .http_client
            .put(self.endpoint(&format!("posts/{}", id)))
            .header(AUTHORIZATION, auth.header_value())
            .json(body)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Keep the first post for each rendered title, preserving order.
pub fn dedup_by_title(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .filter(|post| seen.insert(post.title.rendered.clone()))
        .collect()
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = %status, body = %error_summary(&body), "WordPress API error");
    Err(WordPressError::Api {
        status: status.as_u16(),
        body: truncate_to_char_boundary(&body, MAX_ERROR_BODY).to_string(),
    })
}

fn media_source_error(url: &str, status: Option<u16>, reason: String) -> WordPressError {
    warn!(source_url = url, status, reason = %reason, "Image source fetch failed");
    WordPressError::MediaSource {
        url: url.to_string(),
        status,
        reason,
    }
}

/// First line of an error body, for log lines.
fn error_summary(body: &str) -> &str {
    truncate_to_char_boundary(body.lines().next().unwrap_or_default(), 120)
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
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
