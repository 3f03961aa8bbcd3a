use crate::controller::ApiResponse;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// GET liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::new(StatusCode::OK.into(), "ok"))
}
