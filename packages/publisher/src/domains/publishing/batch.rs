use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use wordpress_client::Post;

use super::models::{BatchSummary, PostReport, PublishMode, PublishOutcome};
use super::pipeline::PublishingPipeline;
use crate::domains::optimization::{strip_markup, OptimizationService};

/// Runs optimization and publishing over a selection of posts.
///
/// Posts are independent: a failure is recorded in that post's report and the
/// batch moves on. Reports come back in input order.
#[derive(Clone)]
pub struct BatchRunner {
    optimizer: OptimizationService,
    pipeline: PublishingPipeline,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(optimizer: OptimizationService, pipeline: PublishingPipeline) -> Self {
        Self {
            optimizer,
            pipeline,
            concurrency: 1,
        }
    }

    /// Posts in flight at once. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn run(&self, posts: Vec<Post>, mode: PublishMode) -> BatchSummary {
        info!(
            posts = posts.len(),
            %mode,
            concurrency = self.concurrency,
            "Starting batch"
        );

        let reports: Vec<PostReport> = stream::iter(posts)
            .map(|post| self.process(post, mode))
            .buffered(self.concurrency)
            .collect()
            .await;

        let summary = BatchSummary { reports };
        info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "Batch finished"
        );
        summary
    }

    async fn process(&self, post: Post, mode: PublishMode) -> PostReport {
        let title = strip_markup(&post.title.rendered);

        let optimized = match self
            .optimizer
            .optimize(
                &post.title.rendered,
                &post.content.rendered,
                &post.excerpt.rendered,
            )
            .await
        {
            Ok(optimized) => optimized,
            Err(e) => {
                warn!(post_id = post.id, error = %e, "Optimization failed, post skipped");
                return PostReport {
                    post_id: post.id,
                    title,
                    seo_score: None,
                    outcome: PublishOutcome::failed(post.id, e),
                };
            }
        };

        let outcome = self.pipeline.publish(post.id, &optimized, mode).await;
        PostReport {
            post_id: post.id,
            title,
            seo_score: Some(optimized.seo_score),
            outcome,
        }
    }
}
