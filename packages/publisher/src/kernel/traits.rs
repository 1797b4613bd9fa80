// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Optimization and publishing live in domains/ and talk to the outside
// world exclusively through these seams.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseImageSearch)

use async_trait::async_trait;
use pixabay_client::StockImage;
use wordpress_client::{MediaUpload, Post, PostPage, PostStatus, PostUpdate, UpdateReport};

use crate::error::Result;

// =============================================================================
// AI Trait (text generation)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Run one system + user prompt and return the raw response text.
    /// The caller is responsible for parsing it.
    async fn complete_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

// =============================================================================
// Image Search Trait (best-effort enrichment)
// =============================================================================

#[async_trait]
pub trait BaseImageSearch: Send + Sync {
    /// Find one image for the query. Never fails; no result is `None`.
    async fn search(&self, query: &str) -> Option<StockImage>;
}

// =============================================================================
// Content Repository Trait (the CMS)
// =============================================================================

#[async_trait]
pub trait BaseContentRepository: Send + Sync {
    async fn list_posts(&self, status: PostStatus, per_page: u32, page: u32) -> Result<PostPage>;

    async fn get_post(&self, id: u64) -> Result<Post>;

    /// Read-only lookups. A miss is `Ok(None)` (or a shorter list), never a new term.
    async fn resolve_author_id(&self, slug: &str) -> Result<Option<u64>>;

    async fn resolve_category_id(&self, name: &str) -> Result<Option<u64>>;

    async fn resolve_tag_ids(&self, names: &[String]) -> Result<Vec<u64>>;

    async fn upload_media(&self, source_url: &str, filename: &str) -> Result<MediaUpload>;

    async fn update_post(&self, id: u64, update: &PostUpdate) -> Result<UpdateReport>;
}
