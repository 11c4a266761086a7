use std::sync::Arc;

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;
use crate::storage::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Provider-backed analyzer. Swappable via `AnalysisProvider` for tests.
    pub analyzer: Arc<ResumeAnalyzer>,
    /// Metadata index + blob store behind one consistent interface.
    pub store: Arc<DocumentStore>,
    pub config: Config,
}

/// State over in-memory stores and the given provider.
#[cfg(test)]
pub(crate) fn test_state(provider: Arc<dyn crate::llm_client::AnalysisProvider>) -> AppState {
    use crate::storage::memory::{InMemoryBlobStore, InMemoryMetadataStore};

    let config = Config::from_lookup(|key| match key {
        "GEMINI_API_KEY" => Some("test-key".to_string()),
        "STORAGE_BACKEND" => Some("memory".to_string()),
        "MAX_UPLOAD_BYTES" => Some("65536".to_string()),
        _ => None,
    })
    .expect("test config");

    AppState {
        analyzer: Arc::new(ResumeAnalyzer::new(provider)),
        store: Arc::new(DocumentStore::new(
            Arc::new(InMemoryMetadataStore::new()),
            Arc::new(InMemoryBlobStore::new()),
        )),
        config,
    }
}
