//! Pushes one optimized post back to the CMS.
//!
//! Stages run strictly in order: image, reference resolution, update, result
//! assembly. Only the update can fail the post; everything before it degrades
//! to "no value". Nothing is retried.

use std::sync::Arc;
use tracing::{debug, info, warn};
use wordpress_client::{slugify, MediaUpload, PostUpdate, SeoMeta};

use super::models::{PublishMode, PublishOutcome, ResolvedReferences};
use crate::domains::optimization::OptimizationResult;
use crate::kernel::BaseContentRepository;

const MAX_FILENAME_SLUG_CHARS: usize = 50;
const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

#[derive(Clone)]
pub struct PublishingPipeline {
    content: Arc<dyn BaseContentRepository>,
}

impl PublishingPipeline {
    pub fn new(content: Arc<dyn BaseContentRepository>) -> Self {
        Self { content }
    }

    pub async fn publish(
        &self,
        post_id: u64,
        optimized: &OptimizationResult,
        mode: PublishMode,
    ) -> PublishOutcome {
        let suggested_url = optimized
            .suggested_image
            .as_ref()
            .map(|image| image.url.trim())
            .filter(|url| !url.is_empty());

        let media = match suggested_url {
            Some(url) => self.upload_image(post_id, &optimized.title, url).await,
            None => None,
        };

        let refs = self.resolve_references(post_id, optimized).await;

        let update = PostUpdate::new(&optimized.title, &optimized.content, mode.status())
            .featured_media(media.as_ref().map(|m| m.id))
            .author(refs.author_id)
            .category(refs.category_id)
            .tags((!refs.tag_ids.is_empty()).then(|| refs.tag_ids.clone()))
            .meta(seo_meta(optimized));

        let image_url = media
            .as_ref()
            .map(|m| m.url.clone())
            .or_else(|| suggested_url.map(str::to_string));

        let mut outcome = PublishOutcome {
            post_id,
            media_id: media.as_ref().map(|m| m.id),
            author_id: refs.author_id,
            category_id: refs.category_id,
            tag_ids: refs.tag_ids,
            image_url,
            ..Default::default()
        };

        match self.content.update_post(post_id, &update).await {
            Ok(report) => {
                for failed in report.meta_failures() {
                    warn!(post_id, key = %failed.key, "SEO meta field was not written");
                }
                info!(post_id, status = %mode, combined = report.combined, "Post updated");
                outcome.success = true;
                outcome.status = Some(mode.status());
                outcome.meta = report.meta;
            }
            Err(e) => {
                if let Some(media) = &media {
                    warn!(
                        post_id,
                        media_id = media.id,
                        "Update failed after media upload; media left orphaned"
                    );
                }
                warn!(post_id, error = %e, "Post update failed");
                outcome.error = Some(e.to_string());
            }
        }

        outcome
    }

    async fn upload_image(&self, post_id: u64, title: &str, url: &str) -> Option<MediaUpload> {
        let filename = media_filename(post_id, title, url);
        match self.content.upload_media(url, &filename).await {
            Ok(media) => {
                debug!(post_id, media_id = media.id, %filename, "Featured image uploaded");
                Some(media)
            }
            Err(e) => {
                warn!(post_id, error = %e, source_url = url, "Image upload failed, continuing without featured image");
                None
            }
        }
    }

    async fn resolve_references(
        &self,
        post_id: u64,
        optimized: &OptimizationResult,
    ) -> ResolvedReferences {
        let author_id = match optimized.author.trim() {
            "" => None,
            slug => self
                .content
                .resolve_author_id(slug)
                .await
                .unwrap_or_else(|e| {
                    warn!(post_id, author = slug, error = %e, "Author lookup failed");
                    None
                }),
        };

        let category_id = match optimized.category.trim() {
            "" => None,
            name => self
                .content
                .resolve_category_id(name)
                .await
                .unwrap_or_else(|e| {
                    warn!(post_id, category = name, error = %e, "Category lookup failed");
                    None
                }),
        };

        let tag_ids = if optimized.tags.is_empty() {
            Vec::new()
        } else {
            self.content
                .resolve_tag_ids(&optimized.tags)
                .await
                .unwrap_or_else(|e| {
                    warn!(post_id, error = %e, "Tag lookup failed");
                    Vec::new()
                })
        };

        debug!(post_id, ?author_id, ?category_id, ?tag_ids, "References resolved");

        ResolvedReferences {
            author_id,
            category_id,
            tag_ids,
        }
    }
}

fn seo_meta(optimized: &OptimizationResult) -> SeoMeta {
    let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
    SeoMeta {
        title: non_empty(&optimized.seo_title),
        description: non_empty(&optimized.seo_description),
        focus_keyword: optimized.primary_keyword().and_then(non_empty),
        score: Some(optimized.seo_score),
    }
}

/// `post-{id}-{slug}.{ext}`. The post id keeps names distinct across posts.
pub fn media_filename(post_id: u64, title: &str, source_url: &str) -> String {
    let slug = slugify(title);
    let slug: String = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(MAX_FILENAME_SLUG_CHARS)
        .collect();
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        format!("post-{}.{}", post_id, extension_from_url(source_url))
    } else {
        format!("post-{}-{}.{}", post_id, slug, extension_from_url(source_url))
    }
}

fn extension_from_url(url: &str) -> String {
    let path = url.split(&['?', '#'][..]).next().unwrap_or(url);
    let last_segment = path.rsplit('/').next().unwrap_or(path);

    last_segment
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string())
}
