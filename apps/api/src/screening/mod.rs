//! AI screening: scores a job's applicants and stores the verdicts.
//!
//! Default: `LlmScreener` (hosted Gemini model, prompt-and-parse).
//! Offline: `KeywordScreener` (pure-Rust requirement matching, deterministic).
//!
//! `AppState` holds an `Arc<dyn CandidateScreener>`, swapped at startup via config.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{Application, Job, Recommendation};

pub mod handlers;
pub mod keyword;
pub mod llm;
pub mod merge;
pub mod prompts;

pub use keyword::KeywordScreener;
pub use llm::LlmScreener;

/// The screener trait. Implement this to swap backends without touching
/// the endpoint, handler, or caller code.
#[async_trait]
pub trait CandidateScreener: Send + Sync {
    /// Returns one verdict per application it could assess. May omit or invent ids;
    /// callers only apply verdicts whose id belongs to `applications`.
    async fn screen(
        &self,
        job: &Job,
        applications: &[Application],
    ) -> Result<Vec<Recommendation>, AppError>;

    /// Short label reported alongside results.
    fn backend(&self) -> &'static str;
}
