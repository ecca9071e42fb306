//! Mock PagerDuty API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the PagerDuty
//! REST API for services, integrations and service rules. Unlike wiremock,
//! which mocks at the HTTP level per-test, this server keeps state across
//! requests, so whole create/list/update/delete workflows can be exercised.
//!
//! # Example
//!
//! ```ignore
//! use pdapi::mock_server::MockServer;
//! use pdapi::{PagerDutyClient, Service, Get};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = PagerDutyClient::new("test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let service = Service::get(&client, "PXXXXXX".to_string(), &Default::default())
//!         .await
//!         .unwrap();
//!     assert_eq!(service.name(), "Web");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::MockState;
