use std::sync::Arc;
use tracing::{debug, info, warn};

use super::models::{parse_response, DraftText, OptimizationResult};
use super::prompts::{build_user_prompt, SYSTEM_PROMPT};
use super::text::strip_markup;
use crate::error::Result;
use crate::kernel::{BaseAI, BaseImageSearch};

/// Turns a draft into an [`OptimizationResult`].
///
/// Without a generation service every call takes the deterministic fallback
/// path. Either way exactly one image search is made per call.
#[derive(Clone)]
pub struct OptimizationService {
    ai: Option<Arc<dyn BaseAI>>,
    images: Arc<dyn BaseImageSearch>,
}

impl OptimizationService {
    pub fn new(ai: Option<Arc<dyn BaseAI>>, images: Arc<dyn BaseImageSearch>) -> Self {
        Self { ai, images }
    }

    /// `title` and `excerpt` may contain markup and entities; `body` is passed
    /// through as HTML.
    pub async fn optimize(
        &self,
        title: &str,
        body: &str,
        excerpt: &str,
    ) -> Result<OptimizationResult> {
        let draft = DraftText {
            title: strip_markup(title),
            body: body.to_string(),
            excerpt: strip_markup(excerpt),
        };

        let Some(ai) = &self.ai else {
            info!(title = %draft.title, "No generation service configured, using fallback");
            let mut result = OptimizationResult::fallback(&draft);
            result.suggested_image = self.images.search(&draft.title).await;
            return Ok(result);
        };

        let raw = ai
            .complete_json(SYSTEM_PROMPT, &build_user_prompt(&draft))
            .await
            .inspect_err(|e| warn!(title = %draft.title, error = %e, "Generation request failed"))?;

        let response = parse_response(&raw)
            .inspect_err(|e| warn!(title = %draft.title, error = %e, "Unusable generation response"))?;

        let image_query = response
            .image_query
            .clone()
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| draft.title.clone());

        let mut result = OptimizationResult::from_response(response, &draft);
        result.suggested_image = self.images.search(&image_query).await;

        debug!(
            title = %result.title,
            seo_score = result.seo_score,
            keywords = result.keywords.len(),
            has_image = result.suggested_image.is_some(),
            "Draft optimized"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{MockAI, MockImageSearch};
    use crate::PublishError;

    #[tokio::test]
    async fn test_fallback_strips_markup_and_searches_once() {
        let images = Arc::new(MockImageSearch::new().with_image("https://img.test/a.jpg"));
        let service = OptimizationService::new(None, images.clone());

        let result = service
            .optimize("<b>Tea &amp; Cake</b>", "<p>Body</p>", "<p>Short</p>")
            .await
            .unwrap();

        assert_eq!(result.title, "Tea & Cake (SEO Optimized)");
        assert_eq!(result.content, "<p>Body</p>");
        assert_eq!(result.seo_description, "Short");
        assert_eq!(images.calls(), vec!["Tea & Cake"]);
        assert_eq!(
            result.suggested_image.map(|i| i.url).as_deref(),
            Some("https://img.test/a.jpg")
        );
    }

    #[tokio::test]
    async fn test_uses_image_query_when_given() {
        let ai = Arc::new(MockAI::new().with_response(
            r#"{"title": "Better", "image_query": "misty mountain lake"}"#,
        ));
        let images = Arc::new(MockImageSearch::new());
        let service = OptimizationService::new(Some(ai.clone()), images.clone());

        let result = service.optimize("Lakes", "<p>b</p>", "").await.unwrap();

        assert_eq!(result.title, "Better");
        assert_eq!(images.calls(), vec!["misty mountain lake"]);
        assert_eq!(ai.calls().len(), 1);
        assert_eq!(ai.calls()[0].system_prompt, SYSTEM_PROMPT);
        assert!(ai.calls()[0].user_prompt.contains("Lakes"));
    }

    #[tokio::test]
    async fn test_parse_failure_skips_image_search() {
        let ai = Arc::new(MockAI::new().with_response("not json"));
        let images = Arc::new(MockImageSearch::new());
        let service = OptimizationService::new(Some(ai), images.clone());

        let err = service.optimize("T", "B", "E").await.unwrap_err();

        assert!(matches!(err, PublishError::OptimizationParse(_)));
        assert!(images.calls().is_empty());
    }
}
