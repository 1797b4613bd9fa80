use serde::Serialize;
use std::fmt;
use wordpress_client::{MetaWrite, PostStatus};

/// Whether a processed post goes live or stays a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    #[default]
    Draft,
    Publish,
}

impl PublishMode {
    pub fn status(self) -> PostStatus {
        match self {
            PublishMode::Draft => PostStatus::Draft,
            PublishMode::Publish => PostStatus::Publish,
        }
    }
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishMode::Draft => f.write_str("draft"),
            PublishMode::Publish => f.write_str("publish"),
        }
    }
}

/// CMS ids found for the optimized author, category and tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedReferences {
    pub author_id: Option<u64>,
    pub category_id: Option<u64>,
    pub tag_ids: Vec<u64>,
}

/// What happened to one post in the pipeline.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishOutcome {
    pub post_id: u64,
    pub success: bool,
    /// Status the post was written with, when the update went through.
    pub status: Option<PostStatus>,
    pub media_id: Option<u64>,
    pub author_id: Option<u64>,
    pub category_id: Option<u64>,
    pub tag_ids: Vec<u64>,
    /// Uploaded media URL, else the original suggestion.
    pub image_url: Option<String>,
    pub meta: Vec<MetaWrite>,
    pub error: Option<String>,
}

impl PublishOutcome {
    pub fn failed(post_id: u64, error: impl fmt::Display) -> Self {
        Self {
            post_id,
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// One line of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct PostReport {
    pub post_id: u64,
    pub title: String,
    /// `None` when optimization itself failed.
    pub seo_score: Option<u8>,
    pub outcome: PublishOutcome,
}

impl PostReport {
    pub fn success(&self) -> bool {
        self.outcome.success
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub reports: Vec<PostReport>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.success()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// Add reports produced outside the batch, then order everything by the
    /// position of its post id in `order`. Ids not in `order` go last.
    pub fn merge_in_order(&mut self, extra: Vec<PostReport>, order: &[u64]) {
        self.reports.extend(extra);
        self.reports.sort_by_key(|report| {
            order
                .iter()
                .position(|&id| id == report.post_id)
                .unwrap_or(usize::MAX)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_maps_to_status() {
        assert_eq!(PublishMode::Publish.status(), PostStatus::Publish);
        assert_eq!(PublishMode::Draft.status(), PostStatus::Draft);
        assert_eq!(PublishMode::default(), PublishMode::Draft);
    }

    #[test]
    fn test_summary_counts() {
        let report = |id, success| PostReport {
            post_id: id,
            title: format!("Post {}", id),
            seo_score: None,
            outcome: PublishOutcome {
                post_id: id,
                success,
                ..Default::default()
            },
        };
        let summary = BatchSummary {
            reports: vec![report(1, true), report(2, false), report(3, true)],
        };

        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn test_merge_in_order_follows_selection() {
        let report = |id| PostReport {
            post_id: id,
            title: String::new(),
            seo_score: None,
            outcome: PublishOutcome::failed(id, "not found"),
        };
        let mut summary = BatchSummary {
            reports: vec![report(7), report(3)],
        };

        summary.merge_in_order(vec![report(5), report(1)], &[5, 7, 1, 3]);

        let ids: Vec<u64> = summary.reports.iter().map(|r| r.post_id).collect();
        assert_eq!(ids, vec![5, 7, 1, 3]);
    }

    #[test]
    fn test_failed_outcome_keeps_error() {
        let outcome = PublishOutcome::failed(9, "wordpress returned 500: boom");
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("wordpress returned 500: boom"));
    }
}
