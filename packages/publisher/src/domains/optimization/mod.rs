pub mod models;
pub mod prompts;
pub mod service;
pub mod text;

pub use models::{parse_response, DraftText, OptimizationResponse, OptimizationResult};
pub use service::OptimizationService;
pub use text::strip_markup;
