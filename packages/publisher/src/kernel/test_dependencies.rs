// Test doubles for the Base* traits
//
// Each mock records the calls it receives so tests can assert on what the
// pipeline actually asked for, not just on what came back.

use async_trait::async_trait;
use pixabay_client::StockImage;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use wordpress_client::{
    dedup_by_title, slugify, Author, MediaUpload, MetaWrite, Post, PostPage, PostStatus,
    PostUpdate, UpdateReport,
};

use super::deps::PublisherDeps;
use super::{BaseAI, BaseContentRepository, BaseImageSearch};
use crate::error::{PublishError, Result};

// =============================================================================
// Mock AI
// =============================================================================

/// A queued reply for [`MockAI`].
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Returned verbatim as the response text.
    Text(String),
    /// Fails the call as if the service answered with `status`.
    Upstream(u16, String),
}

#[derive(Debug, Clone)]
pub struct MockAICall {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Replies are consumed in order. With none queued the mock answers `{}`.
#[derive(Default)]
pub struct MockAI {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<MockAICall>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Text(text.into()));
        self
    }

    pub fn with_upstream_error(self, status: u16, body: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Upstream(status, body.into()));
        self
    }

    pub fn calls(&self) -> Vec<MockAICall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.calls.lock().unwrap().push(MockAICall {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
        });

        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Upstream(status, body)) => Err(PublishError::Upstream {
                service: "openai",
                status,
                body,
            }),
            None => Ok("{}".to_string()),
        }
    }
}

// =============================================================================
// Mock Image Search
// =============================================================================

/// Returns the same image (or nothing) for every query.
#[derive(Default)]
pub struct MockImageSearch {
    image: Option<StockImage>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockImageSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(StockImage {
            url: url.into(),
            source: "Pixabay".to_string(),
        });
        self
    }

    /// Queries received, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseImageSearch for MockImageSearch {
    async fn search(&self, query: &str) -> Option<StockImage> {
        self.calls.lock().unwrap().push(query.to_string());
        self.image.clone()
    }
}

// =============================================================================
// Mock Content Repository
// =============================================================================

/// In-memory CMS. Lookups go through `slugify` like the real client, and the
/// slugs probed are recorded.
#[derive(Default)]
pub struct MockContentRepository {
    posts: Vec<Post>,
    authors: Vec<Author>,
    categories: HashMap<String, u64>,
    tags: HashMap<String, u64>,
    fail_uploads: bool,
    fail_updates: HashSet<u64>,
    reject_combined_meta: bool,
    failing_meta_keys: HashSet<String>,
    state: Arc<Mutex<MockRepositoryState>>,
}

#[derive(Debug, Default, Clone)]
pub struct MockRepositoryState {
    pub category_lookups: Vec<String>,
    pub tag_lookups: Vec<String>,
    pub author_lookups: Vec<String>,
    pub uploads: Vec<(String, String)>,
    pub updates: Vec<(u64, PostUpdate)>,
    next_media_id: u64,
}

impl MockContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_post(mut self, post: Post) -> Self {
        self.posts.push(post);
        self
    }

    pub fn with_author(mut self, id: u64, slug: &str) -> Self {
        self.authors.push(Author {
            id,
            name: slug.to_string(),
            slug: slug.to_string(),
        });
        self
    }

    /// Register a category under the slug of `name`.
    pub fn with_category(mut self, id: u64, name: &str) -> Self {
        self.categories.insert(slugify(name), id);
        self
    }

    /// Register a tag under the slug of `name`.
    pub fn with_tag(mut self, id: u64, name: &str) -> Self {
        self.tags.insert(slugify(name), id);
        self
    }

    pub fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    pub fn failing_update_for(mut self, post_id: u64) -> Self {
        self.fail_updates.insert(post_id);
        self
    }

    /// Reject any update carrying meta, and fail individual writes of `failing_keys`.
    pub fn rejecting_combined_meta(mut self, failing_keys: &[&str]) -> Self {
        self.reject_combined_meta = true;
        self.failing_meta_keys = failing_keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn state(&self) -> MockRepositoryState {
        self.state.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(u64, PostUpdate)> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn uploads(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().uploads.clone()
    }
}

#[async_trait]
impl BaseContentRepository for MockContentRepository {
    async fn list_posts(&self, status: PostStatus, per_page: u32, page: u32) -> Result<PostPage> {
        let matching: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| p.status == status)
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let per_page = per_page.max(1) as usize;
        let posts = matching
            .into_iter()
            .skip(per_page * (page.max(1) as usize - 1))
            .take(per_page)
            .collect();

        Ok(PostPage {
            posts: dedup_by_title(posts),
            total: Some(total),
            total_pages: Some(total.div_ceil(per_page as u64)),
        })
    }

    async fn get_post(&self, id: u64) -> Result<Post> {
        self.posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PublishError::Upstream {
                service: "wordpress",
                status: 404,
                body: "rest_post_invalid_id".to_string(),
            })
    }

    async fn resolve_author_id(&self, slug: &str) -> Result<Option<u64>> {
        self.state
            .lock()
            .unwrap()
            .author_lookups
            .push(slug.to_string());
        Ok(self.authors.iter().find(|a| a.slug == slug).map(|a| a.id))
    }

    async fn resolve_category_id(&self, name: &str) -> Result<Option<u64>> {
        let slug = slugify(name);
        self.state
            .lock()
            .unwrap()
            .category_lookups
            .push(slug.clone());
        Ok(self.categories.get(&slug).copied())
    }

    async fn resolve_tag_ids(&self, names: &[String]) -> Result<Vec<u64>> {
        let mut ids = Vec::new();
        for name in names {
            let slug = slugify(name);
            self.state.lock().unwrap().tag_lookups.push(slug.clone());
            if let Some(id) = self.tags.get(&slug) {
                if !ids.contains(id) {
                    ids.push(*id);
                }
            }
        }
        Ok(ids)
    }

    async fn upload_media(&self, source_url: &str, filename: &str) -> Result<MediaUpload> {
        let mut state = self.state.lock().unwrap();
        state
            .uploads
            .push((source_url.to_string(), filename.to_string()));

        if self.fail_uploads {
            return Err(PublishError::Upstream {
                service: "wordpress",
                status: 500,
                body: "upload failed".to_string(),
            });
        }

        state.next_media_id += 1;
        Ok(MediaUpload {
            id: 900 + state.next_media_id,
            url: format!("https://cms.test/wp-content/uploads/{}", filename),
        })
    }

    async fn update_post(&self, id: u64, update: &PostUpdate) -> Result<UpdateReport> {
        self.state
            .lock()
            .unwrap()
            .updates
            .push((id, update.clone()));

        if self.fail_updates.contains(&id) {
            return Err(PublishError::Upstream {
                service: "wordpress",
                status: 500,
                body: "internal error".to_string(),
            });
        }

        let entries = update.meta.entries();
        let combined = !(self.reject_combined_meta && !entries.is_empty());
        let meta = entries
            .into_iter()
            .map(|(key, _)| MetaWrite {
                key: key.to_string(),
                written: combined || !self.failing_meta_keys.contains(key),
            })
            .collect();

        Ok(UpdateReport { combined, meta })
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mocks bundled together, with handles kept for assertions.
pub struct TestDependencies {
    pub content: Arc<MockContentRepository>,
    pub ai: Option<Arc<MockAI>>,
    pub images: Arc<MockImageSearch>,
}

impl TestDependencies {
    /// No generation credential: optimization uses the fallback path.
    pub fn without_ai(content: MockContentRepository, images: MockImageSearch) -> Self {
        Self {
            content: Arc::new(content),
            ai: None,
            images: Arc::new(images),
        }
    }

    pub fn with_ai(content: MockContentRepository, ai: MockAI, images: MockImageSearch) -> Self {
        Self {
            content: Arc::new(content),
            ai: Some(Arc::new(ai)),
            images: Arc::new(images),
        }
    }

    pub fn deps(&self) -> PublisherDeps {
        PublisherDeps::new(
            self.content.clone(),
            self.ai.clone().map(|ai| ai as Arc<dyn BaseAI>),
            self.images.clone(),
        )
    }
}
