//! Integration endpoint handlers.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{decode_body, envelope, not_found, paginate, ListParams, SharedState};
use crate::{Integration, INTEGRATION_ROOT};

/// GET /services/{service_id}/integrations
pub async fn list_integrations(
    State(state): State<SharedState>,
    Path(service_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let state = state.read().await;

    if state.get_service(&service_id).is_none() {
        return not_found();
    }
    let integrations = state.list_integrations(&service_id);

    Json(paginate("integrations", &integrations, &params)).into_response()
}

/// GET /services/{service_id}/integrations/{id}
pub async fn get_integration(
    State(state): State<SharedState>,
    Path((service_id, id)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;

    match state.get_integration(&service_id, &id) {
        Some(integration) => envelope(INTEGRATION_ROOT, integration).into_response(),
        None => not_found(),
    }
}

/// POST /services/{service_id}/integrations
pub async fn create_integration(
    State(state): State<SharedState>,
    Path(service_id): Path<String>,
    body: Bytes,
) -> Response {
    let integration: Integration = match decode_body(&body, INTEGRATION_ROOT) {
        Ok(integration) => integration,
        Err(response) => return response,
    };

    let mut state = state.write().await;

    match state.create_integration(&service_id, integration) {
        Some(created) => {
            (StatusCode::CREATED, envelope(INTEGRATION_ROOT, &created)).into_response()
        }
        None => not_found(),
    }
}

/// PUT /services/{service_id}/integrations/{id}
pub async fn update_integration(
    State(state): State<SharedState>,
    Path((service_id, id)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let integration: Integration = match decode_body(&body, INTEGRATION_ROOT) {
        Ok(integration) => integration,
        Err(response) => return response,
    };

    let mut state = state.write().await;

    match state.replace_integration(&service_id, &id, integration) {
        Some(updated) => envelope(INTEGRATION_ROOT, &updated).into_response(),
        None => not_found(),
    }
}

/// DELETE /services/{service_id}/integrations/{id}
pub async fn delete_integration(
    State(state): State<SharedState>,
    Path((service_id, id)): Path<(String, String)>,
) -> Response {
    let mut state = state.write().await;

    if state.delete_integration(&service_id, &id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}
