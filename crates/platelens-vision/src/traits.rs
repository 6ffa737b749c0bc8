//! Vision model abstraction
//!
//! The analyze pipeline only needs one capability: submit inline image bytes
//! plus a text prompt, receive free-form text. Keeping that behind a trait
//! lets tests substitute a fake and keeps the provider SDK an integration
//! detail.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from invoking the vision model
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("Vision API request failed: {0}")]
    Request(String),

    #[error("Vision API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Vision API reply contained no text content")]
    EmptyReply,
}

/// A generative vision model accepting an inline image and a text prompt.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Submit the image and prompt; return the model's raw text reply.
    async fn describe_image(
        &self,
        media_type: &str,
        image_data: &[u8],
        prompt: &str,
    ) -> Result<String, VisionError>;
}
