// Résumé ingestion and the HTTP handlers over it.
// The pipeline is validate → extract → analyze → save; handlers only translate
// between HTTP and the pipeline.

pub mod handlers;
pub mod ingest;

pub use ingest::{extract_upload, ingest_resume, match_stored_resume, resolve_content_type};
