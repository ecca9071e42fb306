//! Service endpoint handlers.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{decode_body, envelope, not_found, paginate, ListParams, SharedState};
use crate::{Service, SERVICE_ROOT};

/// GET /services
pub async fn list_services(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let state = state.read().await;
    let services = state.list_services(params.query.as_deref());

    Json(paginate("services", &services, &params))
}

/// GET /services/{id}
pub async fn get_service(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;

    match state.get_service(&id) {
        Some(service) => envelope(SERVICE_ROOT, service).into_response(),
        None => not_found(),
    }
}

/// POST /services
pub async fn create_service(State(state): State<SharedState>, body: Bytes) -> Response {
    let service: Service = match decode_body(&body, SERVICE_ROOT) {
        Ok(service) => service,
        Err(response) => return response,
    };

    let mut state = state.write().await;
    let created = state.create_service(service);

    (StatusCode::CREATED, envelope(SERVICE_ROOT, &created)).into_response()
}

/// PUT /services/{id}
pub async fn update_service(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let service: Service = match decode_body(&body, SERVICE_ROOT) {
        Ok(service) => service,
        Err(response) => return response,
    };

    let mut state = state.write().await;

    match state.replace_service(&id, service) {
        Some(updated) => envelope(SERVICE_ROOT, &updated).into_response(),
        None => not_found(),
    }
}

/// DELETE /services/{id}
pub async fn delete_service(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.write().await;

    if state.delete_service(&id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}
