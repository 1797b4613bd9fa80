//! Prompts for the SEO rewrite.

use super::models::{DraftText, OptimizationResponse, SEO_DESCRIPTION_MAX_CHARS, SEO_TITLE_MAX_CHARS};
use openai_client::truncate_to_char_boundary;

/// Bodies longer than this are cut before being sent.
const MAX_BODY_BYTES: usize = 12_000;

/// Author slugs and the categories each of them usually writes for.
pub const AUTHOR_ROSTER: &[(&str, &[&str])] = &[
    ("admin", &["Uncategorized", "News"]),
    ("editor", &["Guides", "How-To", "Reviews"]),
    ("tech-writer", &["Technology", "AI & Robotics", "Software"]),
    ("lifestyle-writer", &["Travel", "Food", "Health"]),
];

pub const SYSTEM_PROMPT: &str = r#"You are an SEO editor for a WordPress blog.

Rewrite the draft you are given so it ranks well in search while keeping its meaning, facts and tone.

Rules:
- Keep the body as valid HTML using the same kind of markup the draft uses.
- Do not invent facts, quotes, statistics or links.
- Pick the author and category from the roster you are given. If nothing fits, use "admin" and "Uncategorized".
- Tags are short, lowercase and at most 5.
- image_query is a few plain words describing a stock photo for the post.

Respond with a single JSON object that matches the schema you are given and nothing else."#;

/// User prompt carrying the draft, the roster and the response schema.
pub fn build_user_prompt(draft: &DraftText) -> String {
    let schema = schemars::schema_for!(OptimizationResponse);
    let schema_json = serde_json::to_string_pretty(&schema).unwrap_or_default();

    format!(
        r#"Optimize this draft.

## Title
{title}

## Excerpt
{excerpt}

## Body
{body}

## Author roster (slug: categories)
{roster}

## Limits
seo_title: at most {title_max} characters. seo_description: at most {description_max} characters.

## Response schema
{schema}"#,
        title = draft.title,
        excerpt = if draft.excerpt.is_empty() {
            "(none)"
        } else {
            draft.excerpt.as_str()
        },
        body = truncate_to_char_boundary(&draft.body, MAX_BODY_BYTES),
        roster = format_roster(),
        title_max = SEO_TITLE_MAX_CHARS,
        description_max = SEO_DESCRIPTION_MAX_CHARS,
        schema = schema_json,
    )
}

fn format_roster() -> String {
    AUTHOR_ROSTER
        .iter()
        .map(|(slug, categories)| format!("- {}: {}", slug, categories.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
