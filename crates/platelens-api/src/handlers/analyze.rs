//! Image analysis handler
//!
//! Fetches the caller-supplied image URL, inlines the bytes to the vision
//! model with a fixed instruction, and returns the validated analysis.
//!
//! Per-request pipeline: validate input, fetch bytes, infer media type,
//! invoke model, extract and validate JSON. Each stage fails the request with
//! its own error class; nothing is retried.

use std::sync::Arc;

use axum::{extract::State, Json};
use platelens_core::AppError;
use platelens_vision::{AnalysisResult, FOOD_ANALYSIS_PROMPT};
use serde::Deserialize;

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// Analyze image handler
///
/// # Errors
/// - 400 when `imageUrl` is missing/blank or the image cannot be fetched
/// - 500 when the API credential is missing or the model output violates the
///   requested JSON contract
#[tracing::instrument(skip(state, request), fields(operation = "analyze_image"))]
pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, HttpAppError> {
    let image_url = match request.image_url {
        Some(url) if !url.trim().is_empty() => url,
        _ => return Err(AppError::InvalidInput("imageUrl is required".to_string()).into()),
    };

    let vision = state.vision.as_ref().ok_or_else(|| {
        AppError::Config(
            "ANTHROPIC_API_KEY is not configured; image analysis is unavailable".to_string(),
        )
    })?;

    let response = state
        .http_client
        .get(&image_url)
        .send()
        .await
        .map_err(|e| {
            AppError::UpstreamFetch(format!("Failed to fetch image from {}: {}", image_url, e))
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::UpstreamFetch(format!("Image fetch returned {}", status)).into());
    }

    let image_data = response
        .bytes()
        .await
        .map_err(|e| AppError::UpstreamFetch(format!("Failed to read image bytes: {}", e)))?;

    let media_type = media_type_for_url(&image_url);

    tracing::info!(
        image_url = %image_url,
        media_type = %media_type,
        image_bytes = image_data.len(),
        "Submitting image for analysis"
    );

    let reply = vision
        .describe_image(media_type, &image_data, FOOD_ANALYSIS_PROMPT)
        .await?;

    let result = AnalysisResult::from_model_output(&reply)?;

    tracing::info!(item_count = result.items.len(), "Analysis completed");

    Ok(Json(result))
}

/// Infer the outbound media type from the URL's trailing extension alone.
/// File bytes and response headers are deliberately not consulted.
fn media_type_for_url(url: &str) -> &'static str {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .to_lowercase();

    if path.ends_with(".png") {
        "image/png"
    } else if path.ends_with(".webp") {
        "image/webp"
    } else if path.ends_with(".gif") {
        "image/gif"
    } else {
        "image/jpeg"
    }
}
