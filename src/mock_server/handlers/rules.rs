//! Service rule endpoint handlers.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{decode_body, envelope, not_found, paginate, ListParams, SharedState};
use crate::{ServiceRule, RULE_ROOT};

/// GET /services/{service_id}/rules
pub async fn list_rules(
    State(state): State<SharedState>,
    Path(service_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let state = state.read().await;

    if state.get_service(&service_id).is_none() {
        return not_found();
    }
    let rules = state.list_rules(&service_id);

    Json(paginate("rules", &rules, &params)).into_response()
}

/// GET /services/{service_id}/rules/{id}
pub async fn get_rule(
    State(state): State<SharedState>,
    Path((service_id, id)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;

    match state.get_rule(&service_id, &id) {
        Some(rule) => envelope(RULE_ROOT, rule).into_response(),
        None => not_found(),
    }
}

/// POST /services/{service_id}/rules
pub async fn create_rule(
    State(state): State<SharedState>,
    Path(service_id): Path<String>,
    body: Bytes,
) -> Response {
    let rule: ServiceRule = match decode_body(&body, RULE_ROOT) {
        Ok(rule) => rule,
        Err(response) => return response,
    };

    let mut state = state.write().await;

    match state.create_rule(&service_id, rule) {
        Some(created) => (StatusCode::CREATED, envelope(RULE_ROOT, &created)).into_response(),
        None => not_found(),
    }
}

/// PUT /services/{service_id}/rules/{id}
pub async fn update_rule(
    State(state): State<SharedState>,
    Path((service_id, id)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let rule: ServiceRule = match decode_body(&body, RULE_ROOT) {
        Ok(rule) => rule,
        Err(response) => return response,
    };

    let mut state = state.write().await;

    match state.replace_rule(&service_id, &id, rule) {
        Some(updated) => envelope(RULE_ROOT, &updated).into_response(),
        None => not_found(),
    }
}

/// DELETE /services/{service_id}/rules/{id}
pub async fn delete_rule(
    State(state): State<SharedState>,
    Path((service_id, id)): Path<(String, String)>,
) -> Response {
    let mut state = state.write().await;

    if state.delete_rule(&service_id, &id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}
