//! Application state shared across handlers

use std::sync::Arc;

use platelens_core::Config;
use platelens_storage::Storage;
use platelens_vision::VisionModel;

/// Shared state for all request handlers.
///
/// The vision backend is `None` when no API credential is configured; the
/// analyze handler reports that as a server misconfiguration per request
/// instead of failing startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub vision: Option<Arc<dyn VisionModel>>,
    /// Client used to fetch caller-supplied image URLs
    pub http_client: reqwest::Client,
}
