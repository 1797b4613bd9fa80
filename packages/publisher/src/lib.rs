// Draft post SEO publisher - core library
//
// Takes draft posts from a WordPress site, rewrites them through a text
// generation service, attaches a stock photo and writes them back as drafts
// or published posts.
//
// Layout:
// - kernel/   service seams (traits), their production adapters and test doubles
// - domains/  optimization (rewrite a draft) and publishing (push it back)

pub mod config;
pub mod domains;
pub mod error;
pub mod kernel;
pub mod security;

pub use config::Config;
pub use error::{PublishError, Result};
