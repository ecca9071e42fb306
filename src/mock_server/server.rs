//! Mock PagerDuty API server.
//!
//! Provides an axum-based HTTP server that simulates the PagerDuty REST API.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock PagerDuty API server for testing.
///
/// The server runs in the background and can be used to test the PagerDuty
/// client against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        tracing::debug!(%addr, "mock PagerDuty server listening");

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `PagerDutyClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Number of API requests the server has handled so far.
    pub async fn request_count(&self) -> u64 {
        self.state.read().await.request_count
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for service in scenario.services {
            state = state.with_service(service);
        }

        for (service_id, integrations) in scenario.integrations {
            for integration in integrations {
                state = state.with_integration(&service_id, integration);
            }
        }

        for (service_id, rules) in scenario.rules {
            for rule in rules {
                state = state.with_rule(&service_id, rule);
            }
        }

        state
    }

    /// Build the axum router serving the PagerDuty routes over `state`.
    ///
    /// Every API route goes through the token check; `/health` does not.
    pub fn router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Service routes
            .route(
                "/services",
                get(handlers::list_services).post(handlers::create_service),
            )
            .route(
                "/services/:id",
                get(handlers::get_service)
                    .put(handlers::update_service)
                    .delete(handlers::delete_service),
            )
            // Integration routes
            .route(
                "/services/:service_id/integrations",
                get(handlers::list_integrations).post(handlers::create_integration),
            )
            .route(
                "/services/:service_id/integrations/:id",
                get(handlers::get_integration)
                    .put(handlers::update_integration)
                    .delete(handlers::delete_integration),
            )
            // Rule routes
            .route(
                "/services/:service_id/rules",
                get(handlers::list_rules).post(handlers::create_rule),
            )
            .route(
                "/services/:service_id/rules/:id",
                get(handlers::get_rule)
                    .put(handlers::update_rule)
                    .delete(handlers::delete_rule),
            )
            .layer(middleware::from_fn_with_state(
                state.clone(),
                handlers::check_token,
            ))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Get, List, PagerDutyClient, PagerDutyError, Service};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_service_with_client() {
        let server = MockServer::start().await;
        let client = PagerDutyClient::new("test-token", server.url()).unwrap();

        let service = Service::get(&client, "PXXXXXX".to_string(), &Default::default())
            .await
            .expect("Failed to get service");

        assert_eq!(service.name(), "Web");
        assert_eq!(server.request_count().await, 1);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_list_services_with_client() {
        let server = MockServer::start().await;
        let client = PagerDutyClient::new("test-token", server.url()).unwrap();

        let page = Service::list_page(&client, &Default::default(), 0, 2)
            .await
            .expect("Failed to list services");

        assert_eq!(page.len(), 2);
        assert!(page.more);
        assert_eq!(page.next_offset(), Some(2));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = PagerDutyClient::new("test-token", server.url()).unwrap();

        let result = Service::get(&client, "nonexistent".to_string(), &Default::default()).await;

        assert!(result.unwrap_err().is_not_found());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_required_token_rejects_wrong_token() {
        let state = MockState::new()
            .with_service(Fixtures::minimal_service("P1", "Web"))
            .with_required_token("secret");
        let server = MockServer::with_state(state).await;

        let wrong = PagerDutyClient::new("nope", server.url()).unwrap();
        let err = Service::get(&wrong, "P1".to_string(), &Default::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PagerDutyError::Api {
                status_code: Some(401),
                ..
            }
        ));

        let right = PagerDutyClient::new("secret", server.url()).unwrap();
        let service = Service::get(&right, "P1".to_string(), &Default::default())
            .await
            .unwrap();
        assert_eq!(service.name(), "Web");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_router_rejects_malformed_body() {
        let app = MockServer::router(MockState::new().shared());

        let response = app
            .oneshot(
                Request::post("/services")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name": "no envelope"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], 2001);
    }

    #[tokio::test]
    async fn test_router_unknown_rule_is_not_found() {
        let app = MockServer::router(MockServer::default_state().shared());

        let response = app
            .oneshot(
                Request::get("/services/PDB0001/rules/MISSING")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
