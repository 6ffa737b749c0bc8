//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
///
/// Uploaded files are served statically under the configured public base URL
/// so the paths returned by the upload handler resolve from the same process.
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let serve_uploads = ServeDir::new(&state.config.upload_dir);
    let upload_base_url = state.config.upload_base_url.clone();

    Router::new()
        .route("/api/upload", post(handlers::upload_image))
        .route("/api/analyze", post(handlers::analyze_image))
        .route("/health", get(handlers::health))
        .nest_service(upload_base_url.as_str(), serve_uploads)
        // No upload size cap is enforced; axum's default 2 MB body limit would
        // silently impose one on the multipart body.
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
