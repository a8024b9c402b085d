use crate::types::{HealthResponse, StatusResponse};
use axum::Json;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        storage: "operational".to_string(),
        reasoner: "operational".to_string(),
    })
}

/// Root banner
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = StatusResponse)
    ),
    tag = "health"
)]
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "active".to_string(),
        message: "Parley conversational API is running".to_string(),
    })
}
