use axum::Json;
use flint_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("flint-discovery", env!("CARGO_PKG_VERSION")))
}
