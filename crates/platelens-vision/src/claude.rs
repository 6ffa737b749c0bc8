//! Anthropic Messages API client for image analysis

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::traits::{VisionError, VisionModel};

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Vision backend talking to Anthropic's Messages API
pub struct ClaudeVision {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

// Messages API request/response structures
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: String,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlockResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text { text: String },
}

impl ClaudeVision {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Result<Self, VisionError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| VisionError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        })
    }

    fn build_request(&self, media_type: &str, image_data: &[u8], prompt: &str) -> MessagesRequest {
        let base64_image = base64::engine::general_purpose::STANDARD.encode(image_data);

        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![MessageParam {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64".to_string(),
                            media_type: media_type.to_string(),
                            data: base64_image,
                        },
                    },
                    ContentBlock::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
        }
    }
}

#[async_trait]
impl VisionModel for ClaudeVision {
    async fn describe_image(
        &self,
        media_type: &str,
        image_data: &[u8],
        prompt: &str,
    ) -> Result<String, VisionError> {
        let body = self.build_request(media_type, image_data, prompt);

        tracing::debug!(
            model = %self.model,
            media_type = %media_type,
            image_bytes = image_data.len(),
            "Sending image to Claude Messages API"
        );

        let response = self
            .http_client
            .post(format!("{}/messages", API_BASE))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| VisionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VisionError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Request(format!("Failed to parse API response: {}", e)))?;

        parsed
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlockResponse::Text { text } => text,
            })
            .next()
            .ok_or(VisionError::EmptyReply)
    }
}
