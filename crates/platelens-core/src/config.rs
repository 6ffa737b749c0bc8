//! Configuration module
//!
//! Environment-driven configuration for the API server, local upload storage,
//! and the Anthropic vision backend.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_UPLOAD_DIR: &str = "public/uploads";
const DEFAULT_UPLOAD_BASE_URL: &str = "/uploads";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_ANTHROPIC_MAX_TOKENS: u32 = 1024;

/// Application configuration
///
/// The Anthropic API key is optional at startup: the analyze endpoint reports a
/// server misconfiguration (500) when it is missing, rather than failing boot.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Directory uploaded files are written to (created on startup if absent)
    pub upload_dir: String,
    /// Public URL prefix uploaded files are served under
    pub upload_base_url: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_max_tokens: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let server_port = match env::var("SERVER_PORT") {
            Ok(v) => v
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("Invalid SERVER_PORT '{}': {}", v, e))?,
            Err(_) => DEFAULT_SERVER_PORT,
        };

        let anthropic_max_tokens = match env::var("ANTHROPIC_MAX_TOKENS") {
            Ok(v) => v
                .parse::<u32>()
                .map_err(|e| anyhow::anyhow!("Invalid ANTHROPIC_MAX_TOKENS '{}': {}", v, e))?,
            Err(_) => DEFAULT_ANTHROPIC_MAX_TOKENS,
        };

        let anthropic_api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Config {
            server_port,
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
            upload_base_url: env::var("UPLOAD_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_BASE_URL.to_string()),
            anthropic_api_key,
            anthropic_model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_MODEL.to_string()),
            anthropic_max_tokens,
        })
    }

    /// Configuration with defaults, pointed at the given upload directory.
    /// Intended for tests and local tooling.
    pub fn with_upload_dir(upload_dir: impl Into<String>) -> Self {
        Config {
            server_port: DEFAULT_SERVER_PORT,
            upload_dir: upload_dir.into(),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            anthropic_api_key: None,
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            anthropic_max_tokens: DEFAULT_ANTHROPIC_MAX_TOKENS,
        }
    }
}
