use crate::types::MessageResponse;
use axum::Json;

/// Liveness check
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is up", body = MessageResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<MessageResponse> {
    Json(MessageResponse::new("Cookbook API is running."))
}
