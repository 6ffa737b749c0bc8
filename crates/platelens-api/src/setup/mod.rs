//! Application setup and initialization
//!
//! All initialization logic lives here rather than in main.rs so integration
//! tests can assemble the same application.

pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use platelens_core::Config;
use platelens_storage::LocalStorage;
use platelens_vision::{ClaudeVision, VisionModel};

use crate::state::AppState;

/// Timeout for fetching caller-supplied image URLs
const IMAGE_FETCH_TIMEOUT_SECS: u64 = 30;

/// Initialize the tracing subscriber (RUST_LOG controls the filter)
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Initialize the entire application: storage, vision backend, and routes
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let storage = LocalStorage::new(config.upload_dir.clone(), config.upload_base_url.clone())
        .await
        .context("Failed to initialize upload storage")?;

    let vision: Option<Arc<dyn VisionModel>> = match config.anthropic_api_key.as_deref() {
        Some(key) => {
            let client = ClaudeVision::new(
                key,
                config.anthropic_model.clone(),
                config.anthropic_max_tokens,
            )
            .context("Failed to create vision client")?;
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!(
                "ANTHROPIC_API_KEY is not set; /api/analyze will report a configuration error"
            );
            None
        }
    };

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(IMAGE_FETCH_TIMEOUT_SECS))
        .build()
        .context("Failed to create HTTP client for image fetching")?;

    let state = Arc::new(AppState {
        config,
        storage: Arc::new(storage),
        vision,
        http_client,
    });

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
