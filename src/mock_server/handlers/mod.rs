//! HTTP request handlers for the mock server.

pub mod integrations;
pub mod rules;
pub mod services;

pub use integrations::*;
pub use rules::*;
pub use services::*;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// State handle shared by every handler.
pub type SharedState = Arc<RwLock<MockState>>;

/// Page size used when the request does not ask for one.
pub const DEFAULT_LIMIT: u32 = 25;

/// Largest page size the server hands out.
pub const MAX_LIMIT: u32 = 100;

/// Query parameters accepted by every list endpoint.
///
/// Bracketed filters (`team_ids[]`, `include[]`) are accepted and ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub query: Option<String>,
    pub total: Option<bool>,
}

/// Slice `items` according to `params` and wrap them the way PagerDuty does:
/// `{"<root>": [...], "offset": .., "limit": .., "more": .., "total": ..}`.
pub fn paginate<T: serde::Serialize>(root: &str, items: &[&T], params: &ListParams) -> Value {
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let start = (offset as usize).min(items.len());
    let end = start.saturating_add(limit as usize).min(items.len());
    let more = end < items.len();
    let total = params
        .total
        .unwrap_or(false)
        .then_some(items.len() as u64);

    json!({
        root: &items[start..end],
        "offset": offset,
        "limit": limit,
        "more": more,
        "total": total,
    })
}

/// A PagerDuty-style error body: `{"error": {"message": .., "code": ..}}`.
pub fn error_response(status: StatusCode, message: &str, code: u32) -> Response {
    (
        status,
        Json(json!({ "error": { "message": message, "code": code } })),
    )
        .into_response()
}

/// 404 with the body PagerDuty sends for unknown objects.
pub fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not Found", 2100)
}

/// 400 carrying the reason the request body was rejected.
pub fn invalid_input(detail: impl std::fmt::Display) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": {
                "message": "Invalid Input Provided",
                "code": 2001,
                "errors": [detail.to_string()],
            }
        })),
    )
        .into_response()
}

/// Decode an enveloped request body (`{"<root>": {...}}`).
pub fn decode_body<T: DeserializeOwned>(body: &[u8], root: &str) -> Result<T, Response> {
    crate::unwrap_envelope(body, root).map_err(invalid_input)
}

/// Wrap a record in its envelope.
pub fn envelope<T: serde::Serialize>(root: &str, record: &T) -> Json<Value> {
    Json(json!({ root: record }))
}

/// Middleware counting requests and enforcing the configured API token.
pub async fn check_token(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = {
        let mut state = state.write().await;
        state.request_count += 1;
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        state.is_authorized(header)
    };

    if !authorized {
        return error_response(StatusCode::UNAUTHORIZED, "Unauthorized", 2006);
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(offset: Option<u32>, limit: Option<u32>, total: bool) -> ListParams {
        ListParams {
            offset,
            limit,
            query: None,
            total: Some(total),
        }
    }

    #[test]
    fn test_paginate_first_page() {
        let items = [1, 2, 3, 4, 5];
        let refs: Vec<&i32> = items.iter().collect();

        let body = paginate("numbers", &refs, &params(None, Some(2), false));
        assert_eq!(body["numbers"], json!([1, 2]));
        assert_eq!(body["offset"], 0);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["more"], true);
        assert!(body["total"].is_null());
    }

    #[test]
    fn test_paginate_last_page_with_total() {
        let items = [1, 2, 3, 4, 5];
        let refs: Vec<&i32> = items.iter().collect();

        let body = paginate("numbers", &refs, &params(Some(4), Some(2), true));
        assert_eq!(body["numbers"], json!([5]));
        assert_eq!(body["more"], false);
        assert_eq!(body["total"], 5);
    }

    #[test]
    fn test_paginate_offset_past_end() {
        let items = [1, 2];
        let refs: Vec<&i32> = items.iter().collect();

        let body = paginate("numbers", &refs, &params(Some(10), None, false));
        assert_eq!(body["numbers"], json!([]));
        assert_eq!(body["limit"], DEFAULT_LIMIT);
        assert_eq!(body["more"], false);
    }

    #[test]
    fn test_paginate_clamps_limit() {
        let items: Vec<u32> = (0..150).collect();
        let refs: Vec<&u32> = items.iter().collect();

        let body = paginate("numbers", &refs, &params(None, Some(500), false));
        assert_eq!(body["limit"], MAX_LIMIT);
        assert_eq!(body["numbers"].as_array().unwrap().len(), 100);
        assert_eq!(body["more"], true);
    }
}
