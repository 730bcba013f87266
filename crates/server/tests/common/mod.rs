//! Common test utilities for in-process API testing.
//!
//! The fixture builds the real router over a `JsonTicketStore` living in a
//! temporary directory, so requests exercise the full stack without binding
//! a socket.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use ticketdesk_core::{JsonTicketStore, TicketStore};
use ticketdesk_server::api::create_router;
use ticketdesk_server::state::AppState;

/// Test fixture wrapping a router and its backing ticket file.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Path of the ticket file
    pub store_path: PathBuf,
    /// Temporary directory holding the ticket file
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a fixture over an empty store.
    pub fn new() -> Self {
        Self::with_store_location(&["data", "tickets.json"])
    }

    /// Create a fixture whose ticket file sits at the given path components
    /// below the temporary directory.
    pub fn with_store_location(components: &[&str]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store_path = components
            .iter()
            .fold(temp_dir.path().to_path_buf(), |path, part| path.join(part));
        let router = Self::build_router(&store_path);
        Self {
            router,
            store_path,
            temp_dir,
        }
    }

    /// Rebuild the router from whatever is on disk, simulating a restart.
    pub fn restart(&mut self) {
        self.router = Self::build_router(&self.store_path);
    }

    fn build_router(store_path: &std::path::Path) -> Router {
        let ticket_store: Arc<dyn TicketStore> =
            Arc::new(JsonTicketStore::open(store_path).expect("Failed to open ticket store"));
        create_router(Arc::new(AppState::new(ticket_store)))
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri).await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        self.request(Method::POST, uri).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri).await
    }

    /// Create a ticket, asserting success, and return its JSON body.
    pub async fn create_ticket(&self, title: &str, description: &str) -> Value {
        let uri = format!(
            "/tickets?title={}&description={}",
            urlencoding::encode(title),
            urlencoding::encode(description)
        );
        let response = self.post(&uri).await;
        assert_eq!(response.status, StatusCode::OK, "create failed: {}", response.text);
        response.body
    }

    async fn request(&self, method: Method, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }
}
