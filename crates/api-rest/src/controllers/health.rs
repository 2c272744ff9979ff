use crate::AppState;
use api_shared::{HealthRes, HealthService};
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Liveness check for monitoring and load balancers. Requires no authentication.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}
