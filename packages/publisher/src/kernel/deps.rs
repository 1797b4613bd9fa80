//! Publisher dependencies (using traits for testability)
//!
//! Production adapters wrap the pure client crates and implement the Base*
//! traits. `PublisherDeps` is the container the CLI builds from `Config`;
//! tests build it from the mocks in `test_dependencies` instead.

use anyhow::{Context, Result};
use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};
use pixabay_client::{PixabayClient, StockImage};
use std::sync::Arc;
use tracing::{debug, info};
use wordpress_client::{
    MediaUpload, Post, PostPage, PostStatus, PostUpdate, UpdateReport, WordPressClient,
    WordPressConfig,
};

use crate::config::Config;
use crate::domains::optimization::OptimizationService;
use crate::domains::publishing::{BatchRunner, PublishingPipeline};
use crate::kernel::{BaseAI, BaseContentRepository, BaseImageSearch};

/// Sampling temperature for rewrites. Low, so reruns stay close to each other.
const REWRITE_TEMPERATURE: f32 = 0.4;

// =============================================================================
// WordPress Adapter (implements BaseContentRepository)
// =============================================================================

pub struct WordPressAdapter(pub WordPressClient);

impl WordPressAdapter {
    pub fn new(client: WordPressClient) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseContentRepository for WordPressAdapter {
    async fn list_posts(
        &self,
        status: PostStatus,
        per_page: u32,
        page: u32,
    ) -> crate::Result<PostPage> {
        Ok(self.0.list_posts(status, per_page, page).await?)
    }

    async fn get_post(&self, id: u64) -> crate::Result<Post> {
        Ok(self.0.get_post(id).await?)
    }

    async fn resolve_author_id(&self, slug: &str) -> crate::Result<Option<u64>> {
        Ok(self.0.resolve_author_id(slug).await?)
    }

    async fn resolve_category_id(&self, name: &str) -> crate::Result<Option<u64>> {
        Ok(self.0.resolve_category_id(name).await?)
    }

    async fn resolve_tag_ids(&self, names: &[String]) -> crate::Result<Vec<u64>> {
        Ok(self.0.resolve_tag_ids(names).await?)
    }

    async fn upload_media(&self, source_url: &str, filename: &str) -> crate::Result<MediaUpload> {
        Ok(self.0.upload_media(source_url, filename).await?)
    }

    async fn update_post(&self, id: u64, update: &PostUpdate) -> crate::Result<UpdateReport> {
        Ok(self.0.update_post(id, update).await?)
    }
}

// =============================================================================
// OpenAI Adapter (implements BaseAI)
// =============================================================================

pub struct OpenAiAdapter {
    client: OpenAIClient,
    model: String,
}

impl OpenAiAdapter {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl BaseAI for OpenAiAdapter {
    async fn complete_json(&self, system_prompt: &str, user_prompt: &str) -> crate::Result<String> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(system_prompt))
            .message(Message::user(user_prompt))
            .temperature(REWRITE_TEMPERATURE)
            .json_object();

        let response = self.client.chat_completion(request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Rewrite token usage"
            );
        }
        Ok(response.content)
    }
}

// =============================================================================
// Image Search Adapters (implement BaseImageSearch)
// =============================================================================

pub struct PixabayAdapter(pub PixabayClient);

#[async_trait]
impl BaseImageSearch for PixabayAdapter {
    async fn search(&self, query: &str) -> Option<StockImage> {
        self.0.search(query).await
    }
}

/// Used when no image-search key is configured.
pub struct NoopImageSearch;

#[async_trait]
impl BaseImageSearch for NoopImageSearch {
    async fn search(&self, query: &str) -> Option<StockImage> {
        debug!(query, "NoopImageSearch: no image search key configured");
        None
    }
}

// =============================================================================
// PublisherDeps
// =============================================================================

/// Everything the optimization and publishing domains need.
#[derive(Clone)]
pub struct PublisherDeps {
    pub content: Arc<dyn BaseContentRepository>,
    /// `None` when no generation key is configured; optimization then falls back.
    pub ai: Option<Arc<dyn BaseAI>>,
    pub images: Arc<dyn BaseImageSearch>,
}

impl PublisherDeps {
    pub fn new(
        content: Arc<dyn BaseContentRepository>,
        ai: Option<Arc<dyn BaseAI>>,
        images: Arc<dyn BaseImageSearch>,
    ) -> Self {
        Self {
            content,
            ai,
            images,
        }
    }

    /// Wire the production clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut wordpress = WordPressConfig::new(&config.wordpress_base_url)
            .with_timeout(config.http_timeout);
        if let Some(auth) = config.wordpress_auth() {
            wordpress = wordpress.with_auth(auth);
        } else {
            info!("WordPress credentials not configured; CMS calls will fail");
        }
        let content = WordPressClient::new(wordpress).context("Failed to create WordPress client")?;

        let ai: Option<Arc<dyn BaseAI>> = match &config.openai_api_key {
            Some(key) => {
                let client = OpenAIClient::new(key.expose())
                    .with_base_url(&config.openai_base_url)
                    .with_timeout(config.http_timeout)
                    .context("Failed to create OpenAI client")?;
                Some(Arc::new(OpenAiAdapter::new(client, &config.openai_model)))
            }
            None => {
                info!("OPENAI_API_KEY not set; using fallback optimization");
                None
            }
        };

        let images: Arc<dyn BaseImageSearch> = match &config.pixabay_api_key {
            Some(key) => Arc::new(PixabayAdapter(
                PixabayClient::new(key.expose(), config.http_timeout)
                    .context("Failed to create Pixabay client")?,
            )),
            None => {
                info!("PIXABAY_API_KEY not set; posts will not get stock images");
                Arc::new(NoopImageSearch)
            }
        };

        Ok(Self::new(Arc::new(WordPressAdapter::new(content)), ai, images))
    }

    pub fn optimizer(&self) -> OptimizationService {
        OptimizationService::new(self.ai.clone(), self.images.clone())
    }

    pub fn pipeline(&self) -> PublishingPipeline {
        PublishingPipeline::new(self.content.clone())
    }

    pub fn batch_runner(&self, concurrency: usize) -> BatchRunner {
        BatchRunner::new(self.optimizer(), self.pipeline()).with_concurrency(concurrency)
    }
}
