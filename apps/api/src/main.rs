mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod resumes;
mod routes;
mod state;
mod storage;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::ResumeAnalyzer;
use crate::config::{Config, RemoteStorageConfig, StorageBackend};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::memory::{InMemoryBlobStore, InMemoryMetadataStore};
use crate::storage::redis_metadata::RedisMetadataStore;
use crate::storage::s3_blob::S3BlobStore;
use crate::storage::DocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResuMetrics API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize analysis provider
    let provider = GeminiClient::new(
        config.gemini_api_url.clone(),
        config.gemini_api_key.clone(),
        config.gemini_timeout,
    )
    .context("Failed to build analysis provider client")?
    .with_max_attempts(config.gemini_max_attempts)
    .with_backoff(config.gemini_retry_backoff);
    info!(
        "Analysis provider initialized (endpoint: {}, attempts: {})",
        provider.endpoint(),
        config.gemini_max_attempts
    );
    let analyzer = Arc::new(ResumeAnalyzer::new(Arc::new(provider)));

    // Initialize storage
    let store = Arc::new(build_document_store(&config).await?);

    // Build app state
    let state = AppState {
        analyzer,
        store,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_document_store(config: &Config) -> Result<DocumentStore> {
    match &config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory storage; résumés are lost on restart");
            Ok(DocumentStore::new(
                Arc::new(InMemoryMetadataStore::new()),
                Arc::new(InMemoryBlobStore::new()),
            ))
        }
        StorageBackend::Remote(remote) => {
            let redis = redis::Client::open(remote.redis_url.clone())
                .context("Invalid REDIS_URL")?;
            let metadata = RedisMetadataStore::connect(&redis, &config.metadata_collection)
                .await
                .context("Failed to connect to Redis")?;

            let s3 = build_s3_client(remote).await;
            info!("S3 client initialized (bucket: {})", remote.s3_bucket);
            let blobs = S3BlobStore::new(s3, &remote.s3_bucket, &config.metadata_collection);

            Ok(DocumentStore::new(Arc::new(metadata), Arc::new(blobs)))
        }
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(remote: &RemoteStorageConfig) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &remote.aws_access_key_id,
        &remote.aws_secret_access_key,
        None,
        None,
        "resumetrics-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(remote.s3_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&remote.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not by virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
