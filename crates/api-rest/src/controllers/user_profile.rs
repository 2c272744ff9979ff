use super::ApiResult;
use crate::auth::Caller;
use crate::AppState;
use api_shared::dto::{CreateUserProfileRequest, PreferencesRequest, ProblemDetails, RequestResultDoc};
use axum::{
    extract::{Path, State},
    Json,
};
use gateway_core::models::UserProfileModel;
use gateway_core::services::{AccessScope, CreateUserProfile};
use std::collections::BTreeMap;

#[utoipa::path(
    get,
    path = "/UserProfile/{hdid}",
    params(("hdid" = String, Path, description = "Caller HDID")),
    responses(
        (status = 200, description = "Profile envelope; empty payload when not registered", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_user_profile(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
) -> ApiResult<UserProfileModel> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    Ok(Json(state.user_profiles.get_user_profile(hdid.as_str()).await))
}

#[utoipa::path(
    post,
    path = "/UserProfile/{hdid}",
    params(("hdid" = String, Path, description = "Caller HDID")),
    request_body = CreateUserProfileRequest,
    responses(
        (status = 200, description = "Created profile envelope", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
/// Register the caller. Terms of service must be accepted and the patient must meet the minimum
/// age.
#[axum::debug_handler]
pub async fn create_user_profile(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
    Json(req): Json<CreateUserProfileRequest>,
) -> ApiResult<UserProfileModel> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    let request = CreateUserProfile {
        accepted_terms_of_service: req.accepted_terms_of_service,
        email: req.email,
        sms_number: req.sms_number,
    };
    Ok(Json(
        state
            .user_profiles
            .create_user_profile(hdid.as_str(), request)
            .await,
    ))
}

#[utoipa::path(
    delete,
    path = "/UserProfile/{hdid}",
    params(("hdid" = String, Path, description = "Caller HDID")),
    responses(
        (status = 200, description = "Closed profile envelope", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn close_user_profile(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
) -> ApiResult<UserProfileModel> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    Ok(Json(state.user_profiles.close_user_profile(hdid.as_str()).await))
}

#[utoipa::path(
    get,
    path = "/UserProfile/{hdid}/recover",
    params(("hdid" = String, Path, description = "Caller HDID")),
    responses(
        (status = 200, description = "Recovered profile envelope", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn recover_user_profile(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
) -> ApiResult<UserProfileModel> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    Ok(Json(
        state.user_profiles.recover_user_profile(hdid.as_str()).await,
    ))
}

#[utoipa::path(
    get,
    path = "/UserProfile/{hdid}/preference",
    params(("hdid" = String, Path, description = "Caller HDID")),
    responses(
        (status = 200, description = "Preferences envelope", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_preferences(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
) -> ApiResult<BTreeMap<String, String>> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    Ok(Json(state.user_profiles.get_preferences(hdid.as_str()).await))
}

#[utoipa::path(
    put,
    path = "/UserProfile/{hdid}/preference",
    params(("hdid" = String, Path, description = "Caller HDID")),
    request_body = PreferencesRequest,
    responses(
        (status = 200, description = "Merged preferences envelope", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_preferences(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
    Json(PreferencesRequest(preferences)): Json<PreferencesRequest>,
) -> ApiResult<BTreeMap<String, String>> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    Ok(Json(
        state
            .user_profiles
            .update_preferences(hdid.as_str(), preferences)
            .await,
    ))
}
