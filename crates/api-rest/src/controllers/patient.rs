use super::ApiResult;
use crate::auth::Caller;
use crate::AppState;
use api_shared::dto::{ProblemDetails, RequestResultDoc};
use axum::{
    extract::{Path, State},
    Json,
};
use gateway_core::models::{PatientIdentifierType, PatientModel};
use gateway_core::services::AccessScope;

#[utoipa::path(
    get,
    path = "/Patient/{hdid}",
    params(("hdid" = String, Path, description = "Patient HDID")),
    responses(
        (status = 200, description = "Patient demographics envelope", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "Caller may not view this patient", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
/// Demographics for the caller or one of their registered dependents.
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
) -> ApiResult<PatientModel> {
    let hdid = caller
        .authorize(&state, &hdid, AccessScope::HealthData)
        .await?;
    let result = state
        .patients
        .get_patient(hdid.as_str(), PatientIdentifierType::Hdid, false)
        .await;
    Ok(Json(result))
}
