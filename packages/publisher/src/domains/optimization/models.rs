//! Optimization result and the generation response it is built from.

use openai_client::strip_code_blocks;
use pixabay_client::StockImage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::text::truncate_chars;
use crate::error::{PublishError, Result};

pub const SEO_TITLE_MAX_CHARS: usize = 60;
pub const SEO_DESCRIPTION_MAX_CHARS: usize = 160;

pub const FALLBACK_TITLE_MARKER: &str = " (SEO Optimized)";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_AUTHOR: &str = "admin";
pub const DEFAULT_TAG: &str = "blog";
pub const DEFAULT_SEO_SCORE: u8 = 70;

/// Title, body and excerpt of a draft, with markup already stripped from
/// title and excerpt. The body is kept as rendered.
#[derive(Debug, Clone)]
pub struct DraftText {
    pub title: String,
    pub body: String,
    pub excerpt: String,
}

/// Everything the publishing pipeline needs to rewrite one post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub title: String,
    pub content: String,
    pub suggested_image: Option<StockImage>,
    /// Ordered; the first entry is the primary keyword.
    pub keywords: Vec<String>,
    /// 0..=100
    pub seo_score: u8,
    pub seo_title: String,
    pub seo_description: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Author slug.
    pub author: String,
}

impl OptimizationResult {
    pub fn primary_keyword(&self) -> Option<&str> {
        self.keywords.first().map(String::as_str)
    }

    /// Deterministic result used when no generation service is configured.
    pub fn fallback(draft: &DraftText) -> Self {
        Self {
            title: format!("{}{}", draft.title, FALLBACK_TITLE_MARKER),
            content: draft.body.clone(),
            suggested_image: None,
            keywords: Vec::new(),
            seo_score: DEFAULT_SEO_SCORE,
            seo_title: truncate_chars(&draft.title, SEO_TITLE_MAX_CHARS),
            seo_description: default_description(draft),
            category: DEFAULT_CATEGORY.to_string(),
            tags: vec![DEFAULT_TAG.to_string()],
            author: DEFAULT_AUTHOR.to_string(),
        }
    }

    /// Fill in whatever the response left out with the fallback values.
    pub fn from_response(response: OptimizationResponse, draft: &DraftText) -> Self {
        let fallback = Self::fallback(draft);

        let keywords: Vec<String> = response
            .keywords
            .unwrap_or_default()
            .into_iter()
            .filter_map(non_blank)
            .collect();
        let tags: Vec<String> = response
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(non_blank)
            .collect();

        Self {
            title: response.title.and_then(non_blank).unwrap_or(fallback.title),
            content: response
                .content
                .and_then(non_blank)
                .unwrap_or(fallback.content),
            suggested_image: None,
            keywords,
            seo_score: response
                .seo_score
                .map(|score| score.clamp(0.0, 100.0).round() as u8)
                .unwrap_or(fallback.seo_score),
            seo_title: response
                .seo_title
                .and_then(non_blank)
                .map(|t| truncate_chars(&t, SEO_TITLE_MAX_CHARS))
                .unwrap_or(fallback.seo_title),
            seo_description: response
                .seo_description
                .and_then(non_blank)
                .map(|d| truncate_chars(&d, SEO_DESCRIPTION_MAX_CHARS))
                .unwrap_or(fallback.seo_description),
            category: response
                .category
                .and_then(non_blank)
                .unwrap_or(fallback.category),
            tags: if tags.is_empty() { fallback.tags } else { tags },
            author: response
                .author
                .and_then(non_blank)
                .unwrap_or(fallback.author),
        }
    }
}

fn default_description(draft: &DraftText) -> String {
    let source = if draft.excerpt.trim().is_empty() {
        &draft.title
    } else {
        &draft.excerpt
    };
    truncate_chars(source, SEO_DESCRIPTION_MAX_CHARS)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The JSON object the generation service is asked to return.
///
/// Every field is optional; missing ones are filled by
/// [`OptimizationResult::from_response`].
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OptimizationResponse {
    /// Rewritten, search-friendly post title.
    pub title: Option<String>,
    /// Rewritten post body as HTML.
    pub content: Option<String>,
    /// Focus keywords, most important first.
    pub keywords: Option<Vec<String>>,
    /// Estimated SEO quality from 0 to 100.
    pub seo_score: Option<f64>,
    /// Title for search results, at most 60 characters.
    pub seo_title: Option<String>,
    /// Meta description for search results, at most 160 characters.
    pub seo_description: Option<String>,
    /// Category name that best fits the post.
    pub category: Option<String>,
    /// Short tag names.
    pub tags: Option<Vec<String>>,
    /// Author slug picked from the roster.
    pub author: Option<String>,
    /// A few words describing a suitable stock photo.
    pub image_query: Option<String>,
}

/// Decode a generation response, with or without markdown fences.
pub fn parse_response(raw: &str) -> Result<OptimizationResponse> {
    let value: serde_json::Value = serde_json::from_str(strip_code_blocks(raw))
        .map_err(|e| PublishError::OptimizationParse(e.to_string()))?;

    if !value.is_object() {
        return Err(PublishError::OptimizationParse(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    serde_json::from_value(value).map_err(|e| PublishError::OptimizationParse(e.to_string()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
