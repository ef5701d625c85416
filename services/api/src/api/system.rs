//! System/health API handlers.
//!
//! Both endpoints are public and bypass the rule table.
use crate::api::error::{ApiError, api_internal};
use crate::api::types::{HealthStatus, SystemInfo};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/v1/system/info",
    tag = "system",
    responses(
        (status = 200, description = "Service identity", body = SystemInfo)
    )
)]
pub(crate) async fn system_info(State(state): State<AppState>) -> Json<SystemInfo> {
    Json(SystemInfo {
        service: "trattoria-api".to_string(),
        api_version: state.api_version.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Service health", body = HealthStatus),
        (status = 500, description = "Storage unavailable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn system_health(
    State(state): State<AppState>,
) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(err) = state.store.health_check().await {
        return Err(api_internal("storage unavailable", &err));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        backend: state.store.backend_name().to_string(),
    }))
}
