//! Draft post SEO publisher CLI
//!
//! `list` shows posts waiting in the CMS; `run` optimizes a selection of them
//! and writes them back as drafts (or published posts with `--publish`).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use publisher_core::domains::optimization::strip_markup;
use publisher_core::domains::publishing::{BatchSummary, PostReport, PublishMode, PublishOutcome};
use publisher_core::kernel::PublisherDeps;
use publisher_core::Config;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wordpress_client::PostStatus;

#[derive(Parser)]
#[command(name = "publisher")]
#[command(about = "Rewrite WordPress drafts for SEO and publish them")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts with the given status
    List {
        #[arg(long, value_enum, default_value = "draft")]
        status: StatusArg,
        #[arg(long, default_value_t = 20)]
        per_page: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Optimize and write back the given posts
    Run {
        /// Comma-separated post ids
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<u64>,
        /// Publish instead of saving as draft
        #[arg(long)]
        publish: bool,
        /// Print the batch summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Draft,
    Publish,
    Pending,
    Private,
    Future,
}

impl From<StatusArg> for PostStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => PostStatus::Draft,
            StatusArg::Publish => PostStatus::Publish,
            StatusArg::Pending => PostStatus::Pending,
            StatusArg::Private => PostStatus::Private,
            StatusArg::Future => PostStatus::Future,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,publisher_core=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let deps = PublisherDeps::from_config(&config)?;

    match cli.command {
        Commands::List {
            status,
            per_page,
            page,
        } => cmd_list(&deps, status.into(), per_page, page).await,
        Commands::Run { ids, publish, json } => {
            let mode = if publish {
                PublishMode::Publish
            } else {
                PublishMode::Draft
            };
            cmd_run(&deps, &ids, mode, config.publish_concurrency, json).await
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn cmd_list(deps: &PublisherDeps, status: PostStatus, per_page: u32, page: u32) -> Result<()> {
    let listing = deps
        .content
        .list_posts(status, per_page, page)
        .await
        .context("Failed to list posts")?;

    for post in &listing.posts {
        println!("{:>8}  {}", post.id, strip_markup(&post.title.rendered));
    }

    println!(
        "page {} of {}, {} {} posts in total",
        page,
        listing
            .total_pages
            .map_or_else(|| "?".to_string(), |n| n.to_string()),
        listing
            .total
            .map_or_else(|| "?".to_string(), |n| n.to_string()),
        status,
    );

    Ok(())
}

async fn cmd_run(
    deps: &PublisherDeps,
    ids: &[u64],
    mode: PublishMode,
    concurrency: usize,
    json: bool,
) -> Result<()> {
    let mut posts = Vec::with_capacity(ids.len());
    let mut fetch_failures = Vec::new();

    for &id in ids {
        match deps.content.get_post(id).await {
            Ok(post) => posts.push(post),
            Err(e) => {
                warn!(post_id = id, error = %e, "Failed to fetch post");
                fetch_failures.push(PostReport {
                    post_id: id,
                    title: String::new(),
                    seo_score: None,
                    outcome: PublishOutcome::failed(id, e),
                });
            }
        }
    }

    info!(
        fetched = posts.len(),
        missing = fetch_failures.len(),
        "Selection loaded"
    );

    let mut summary = deps.batch_runner(concurrency).run(posts, mode).await;
    summary.merge_in_order(fetch_failures, ids);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        print_summary(&summary);
    }

    if !summary.all_succeeded() {
        bail!(
            "{} of {} posts failed",
            summary.failed(),
            summary.reports.len()
        );
    }

    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    for report in &summary.reports {
        let outcome = &report.outcome;
        let result = match (&outcome.error, outcome.status) {
            (Some(error), _) => format!("failed: {}", error),
            (None, Some(PostStatus::Publish)) => "published".to_string(),
            (None, _) => "drafted".to_string(),
        };
        println!("{:>8}  {}  {}", report.post_id, report.title, result);
    }
    println!(
        "{} succeeded, {} failed",
        summary.succeeded(),
        summary.failed()
    );
}
