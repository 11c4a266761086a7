// Structured analysis of extracted résumé text.
// Builds prompts, parses the provider's free-form output into lenient models and
// falls back to regex extraction when the résumé analysis cannot be obtained.
// All provider calls go through llm_client::AnalysisProvider.

pub mod analyzer;
pub mod fallback;
pub mod json;
pub mod models;
pub mod prompts;

use thiserror::Error;

use crate::llm_client::LlmError;

pub use analyzer::ResumeAnalyzer;
pub use models::{AnalysisResult, MatchResult};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Analysis provider unavailable: {0}")]
    ProviderUnavailable(#[from] LlmError),

    #[error("Could not parse analysis from model output: {0}")]
    ParseFailed(String),
}
