//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p platelens-api`.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use axum_test::TestServer;
use platelens_api::setup::routes;
use platelens_api::state::AppState;
use platelens_core::Config;
use platelens_storage::LocalStorage;
use platelens_vision::{VisionError, VisionModel};
use tempfile::TempDir;

/// Vision backend fake returning a canned reply
pub struct FakeVision {
    pub reply: String,
}

#[async_trait::async_trait]
impl VisionModel for FakeVision {
    async fn describe_image(
        &self,
        _media_type: &str,
        _image_data: &[u8],
        _prompt: &str,
    ) -> Result<String, VisionError> {
        Ok(self.reply.clone())
    }
}

/// Test application: server plus the owned upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: TempDir,
}

impl TestApp {
    /// Filenames currently stored in the upload directory.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir.path())
            .expect("read upload dir")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Build the application against a temp upload directory and the given vision
/// backend (None simulates a missing API credential).
pub async fn setup_test_app(vision: Option<Arc<dyn VisionModel>>) -> TestApp {
    let upload_dir = TempDir::new().expect("create temp upload dir");
    let config = Config::with_upload_dir(upload_dir.path().to_string_lossy());

    let storage = LocalStorage::new(upload_dir.path(), "/uploads")
        .await
        .expect("create local storage");

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("create http client");

    let state = Arc::new(AppState {
        config,
        storage: Arc::new(storage),
        vision,
        http_client,
    });

    let server = TestServer::new(routes::setup_routes(state)).expect("start test server");

    TestApp { server, upload_dir }
}

/// Application whose vision backend replies with the given canned text.
pub async fn setup_test_app_with_reply(reply: &str) -> TestApp {
    setup_test_app(Some(Arc::new(FakeVision {
        reply: reply.to_string(),
    })))
    .await
}

/// Serve the given bytes at `path` on an ephemeral local port; any other path
/// returns 404. Returns the absolute URL of the image.
pub async fn spawn_image_server(path: &'static str, bytes: Vec<u8>) -> String {
    let app = Router::new().route(
        path,
        get(move || {
            let bytes = bytes.clone();
            async move { bytes }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind image server");
    let addr = listener.local_addr().expect("image server addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve images");
    });

    format!("http://{}{}", addr, path)
}
