use super::{parse_date, ApiResult};
use crate::auth::Caller;
use crate::AppState;
use api_shared::dto::{AddDependentBody, ProblemDetails, RequestResultDoc};
use axum::{
    extract::{Path, State},
    Json,
};
use gateway_core::models::DependentModel;
use gateway_core::services::{AccessScope, AddDependentRequest};
use gateway_types::Hdid;

#[utoipa::path(
    get,
    path = "/UserProfile/{hdid}/Dependent",
    params(("hdid" = String, Path, description = "Guardian HDID")),
    responses(
        (status = 200, description = "Registered dependents", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_dependents(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
) -> ApiResult<Vec<DependentModel>> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    Ok(Json(state.dependents.get_dependents(hdid.as_str()).await))
}

#[utoipa::path(
    post,
    path = "/UserProfile/{hdid}/Dependent",
    params(("hdid" = String, Path, description = "Guardian HDID")),
    request_body = AddDependentBody,
    responses(
        (status = 200, description = "Registered dependent, or the action needed to register", body = RequestResultDoc),
        (status = 400, description = "Malformed date of birth", body = ProblemDetails),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
/// Register a dependent. The supplied names and date of birth must match the Client Registry.
#[axum::debug_handler]
pub async fn add_dependent(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
    Json(body): Json<AddDependentBody>,
) -> ApiResult<DependentModel> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    let request = AddDependentRequest {
        phn: body.phn,
        first_name: body.first_name,
        last_name: body.last_name,
        date_of_birth: parse_date("dateOfBirth", &body.date_of_birth)?,
    };
    Ok(Json(
        state.dependents.add_dependent(hdid.as_str(), request).await,
    ))
}

#[utoipa::path(
    delete,
    path = "/UserProfile/{hdid}/Dependent/{dependentHdid}",
    params(
        ("hdid" = String, Path, description = "Guardian HDID"),
        ("dependentHdid" = String, Path, description = "Dependent HDID")
    ),
    responses(
        (status = 200, description = "Removal envelope", body = RequestResultDoc),
        (status = 400, description = "Malformed dependent HDID", body = ProblemDetails),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn remove_dependent(
    State(state): State<AppState>,
    caller: Caller,
    Path((hdid, dependent_hdid)): Path<(String, String)>,
) -> ApiResult<()> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    let dependent_hdid = Hdid::parse(&dependent_hdid)
        .map_err(|e| crate::ApiError::bad_request(e.to_string()))?;
    Ok(Json(
        state
            .dependents
            .remove_dependent(hdid.as_str(), dependent_hdid.as_str())
            .await,
    ))
}
