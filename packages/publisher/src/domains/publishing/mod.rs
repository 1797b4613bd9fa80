pub mod batch;
pub mod models;
pub mod pipeline;

pub use batch::BatchRunner;
pub use models::{BatchSummary, PostReport, PublishMode, PublishOutcome, ResolvedReferences};
pub use pipeline::{media_filename, PublishingPipeline};
