//! Kernel module - service seams and their implementations.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{NoopImageSearch, OpenAiAdapter, PixabayAdapter, PublisherDeps, WordPressAdapter};
pub use test_dependencies::{MockAI, MockContentRepository, MockImageSearch, TestDependencies};
pub use traits::*;
