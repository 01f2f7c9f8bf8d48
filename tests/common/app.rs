//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use skinmatch::catalog::{CatalogStore, InMemoryCatalog};
use skinmatch::server::{build_router, create_app_state};
use skinmatch::services::PriceCache;

/// Test application with router and direct access to the store and
/// price cache for seeding fixtures.
pub struct TestApp {
    router: axum::Router,
    pub store: Arc<InMemoryCatalog>,
    pub prices: Arc<PriceCache>,
}

impl TestApp {
    /// Create a new test application over an empty catalog
    pub fn new() -> Self {
        let store = Arc::new(InMemoryCatalog::new());
        let prices = Arc::new(PriceCache::new());
        let state = create_app_state(
            Arc::clone(&store) as Arc<dyn CatalogStore>,
            Arc::clone(&prices),
        );
        let router = build_router(state);
        Self {
            router,
            store,
            prices,
        }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        self.request(
            Request::post(path)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse { status, body }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}
