//! Test fixtures shared by the integration tests.

#![allow(dead_code)]

use publisher_core::domains::optimization::OptimizationResult;
use pixabay_client::StockImage;
use wordpress_client::{Post, PostStatus, Rendered};

pub const IMAGE_URL: &str = "https://cdn.pixabay.test/photo/lake-1280.jpg";

/// A draft post as the CMS would return it.
pub fn draft_post(id: u64, title: &str, body: &str, excerpt: &str) -> Post {
    Post {
        id,
        title: Rendered::new(title),
        content: Rendered::new(body),
        excerpt: Rendered::new(excerpt),
        status: PostStatus::Draft,
        slug: String::new(),
        featured_media_id: 0,
        date: None,
        modified: None,
    }
}

/// A full generation response, the way the model is asked to answer.
pub fn ai_response(title: &str) -> String {
    serde_json::json!({
        "title": title,
        "content": "<p>Rewritten body</p>",
        "keywords": ["mountain lakes", "hiking"],
        "seo_score": 88,
        "seo_title": format!("{} | Guide", title),
        "seo_description": "Everything you need to know before you go.",
        "category": "Travel",
        "tags": ["Lakes", "Outdoors", "Nowhere"],
        "author": "lifestyle-writer",
        "image_query": "mountain lake sunrise"
    })
    .to_string()
}

/// An optimization result ready for the pipeline.
pub fn optimized(title: &str, image_url: Option<&str>) -> OptimizationResult {
    OptimizationResult {
        title: title.to_string(),
        content: "<p>Rewritten body</p>".to_string(),
        suggested_image: image_url.map(|url| StockImage {
            url: url.to_string(),
            source: "Pixabay".to_string(),
        }),
        keywords: vec!["rust".to_string(), "async".to_string()],
        seo_score: 85,
        seo_title: title.to_string(),
        seo_description: "A description".to_string(),
        category: "AI & Robotics".to_string(),
        tags: vec!["Rust".to_string(), "Tokio".to_string()],
        author: "tech-writer".to_string(),
    }
}
