//! WordPress REST request and response types.

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// =============================================================================
// Posts
// =============================================================================

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Publish,
    Pending,
    Private,
    Future,
    Trash,
    #[serde(rename = "auto-draft")]
    AutoDraft,
    #[serde(other)]
    Unknown,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Publish => "publish",
            PostStatus::Pending => "pending",
            PostStatus::Private => "private",
            PostStatus::Future => "future",
            PostStatus::Trash => "trash",
            PostStatus::AutoDraft => "auto-draft",
            PostStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rich-text field as returned by the REST API (`{"rendered": "..."}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

impl Rendered {
    pub fn new(rendered: impl Into<String>) -> Self {
        Self {
            rendered: rendered.into(),
        }
    }
}

/// A post as returned by `GET /wp/v2/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default)]
    pub excerpt: Rendered,
    pub status: PostStatus,
    #[serde(default)]
    pub slug: String,
    /// WordPress reports `0` when the post has no featured image.
    #[serde(rename = "featured_media", default)]
    pub featured_media_id: u64,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub modified: Option<NaiveDateTime>,
}

impl Post {
    /// Featured media reference, if one is attached.
    pub fn featured_media(&self) -> Option<u64> {
        (self.featured_media_id != 0).then_some(self.featured_media_id)
    }
}

/// One page of posts plus the pagination headers that came with it.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// `x-wp-total`
    pub total: Option<u64>,
    /// `x-wp-totalpages`
    pub total_pages: Option<u64>,
}

// =============================================================================
// Users and taxonomy terms
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub slug: String,
}

/// A category or tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub slug: String,
}

// =============================================================================
// Media
// =============================================================================

/// An uploaded media item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaUpload {
    pub id: u64,
    #[serde(rename = "source_url")]
    pub url: String,
}

// =============================================================================
// Post updates
// =============================================================================

pub const META_SEO_TITLE: &str = "rank_math_title";
pub const META_SEO_DESCRIPTION: &str = "rank_math_description";
pub const META_FOCUS_KEYWORD: &str = "rank_math_focus_keyword";
pub const META_SEO_SCORE: &str = "rank_math_score";

/// SEO meta fields written alongside a post update.
///
/// Serializes as a flat map of string values; unset fields are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeoMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub focus_keyword: Option<String>,
    pub score: Option<u8>,
}

impl SeoMeta {
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// The `(meta_key, value)` pairs that would be written.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = Vec::new();
        if let Some(title) = &self.title {
            entries.push((META_SEO_TITLE, title.clone()));
        }
        if let Some(description) = &self.description {
            entries.push((META_SEO_DESCRIPTION, description.clone()));
        }
        if let Some(keyword) = &self.focus_keyword {
            entries.push((META_FOCUS_KEYWORD, keyword.clone()));
        }
        if let Some(score) = self.score {
            entries.push((META_SEO_SCORE, score.to_string()));
        }
        entries
    }
}

impl Serialize for SeoMeta {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Body of `PUT /wp/v2/posts/{id}`.
///
/// Optional fields that are `None` are never serialized, so they leave the
/// remote value untouched. `tags: Some(vec![])` clears tags; `tags: None` does not.
#[derive(Debug, Clone, Serialize)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    pub status: PostStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<u64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<u64>>,

    #[serde(skip_serializing_if = "SeoMeta::is_empty")]
    pub meta: SeoMeta,
}

impl PostUpdate {
    pub fn new(title: impl Into<String>, content: impl Into<String>, status: PostStatus) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status,
            featured_media: None,
            author: None,
            categories: None,
            tags: None,
            meta: SeoMeta::default(),
        }
    }

    pub fn featured_media(mut self, media_id: Option<u64>) -> Self {
        self.featured_media = media_id;
        self
    }

    pub fn author(mut self, author_id: Option<u64>) -> Self {
        self.author = author_id;
        self
    }

    pub fn category(mut self, category_id: Option<u64>) -> Self {
        self.categories = category_id.map(|id| vec![id]);
        self
    }

    pub fn tags(mut self, tag_ids: Option<Vec<u64>>) -> Self {
        self.tags = tag_ids;
        self
    }

    pub fn meta(mut self, meta: SeoMeta) -> Self {
        self.meta = meta;
        self
    }

    /// The same update without any meta fields.
    pub fn without_meta(&self) -> Self {
        Self {
            meta: SeoMeta::default(),
            ..self.clone()
        }
    }
}

/// Result of writing a single meta field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaWrite {
    pub key: String,
    pub written: bool,
}

/// What an update actually managed to write.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReport {
    /// `true` when everything went out in a single request.
    pub combined: bool,
    pub meta: Vec<MetaWrite>,
}

impl UpdateReport {
    pub fn meta_failures(&self) -> impl Iterator<Item = &MetaWrite> {
        self.meta.iter().filter(|m| !m.written)
    }
}
