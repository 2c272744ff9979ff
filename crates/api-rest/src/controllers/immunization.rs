use super::ApiResult;
use crate::auth::Caller;
use crate::AppState;
use api_shared::dto::{ProblemDetails, RequestResultDoc};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use gateway_core::models::{ImmunizationEvent, ImmunizationResult};
use gateway_core::services::AccessScope;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HdidQuery {
    /// HDID of the patient whose records are requested.
    pub hdid: String,
}

#[utoipa::path(
    get,
    path = "/Immunization",
    params(HdidQuery),
    responses(
        (status = 200, description = "Immunizations and recommendations envelope", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "Caller may not view this patient", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_immunizations(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<HdidQuery>,
) -> ApiResult<ImmunizationResult> {
    let hdid = caller
        .authorize(&state, &query.hdid, AccessScope::HealthData)
        .await?;
    let result = state
        .immunizations
        .get_immunizations(hdid.as_str(), caller.access_token())
        .await;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/Immunization/{id}",
    params(("id" = String, Path, description = "PHSA immunization id"), HdidQuery),
    responses(
        (status = 200, description = "Single immunization envelope", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "Caller may not view this patient", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_immunization(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Query(query): Query<HdidQuery>,
) -> ApiResult<ImmunizationEvent> {
    caller
        .authorize(&state, &query.hdid, AccessScope::HealthData)
        .await?;
    let result = state
        .immunizations
        .get_immunization(&id, caller.access_token())
        .await;
    Ok(Json(result))
}
