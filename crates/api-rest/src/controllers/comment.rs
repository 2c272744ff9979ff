use super::{parse_id, ApiResult};
use crate::auth::Caller;
use crate::{ApiError, AppState};
use api_shared::dto::{
    CommentRequest, CommentUpdateRequest, DeleteEntryRequest, ProblemDetails, RequestResultDoc,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use gateway_core::models::{CommentEntryType, UserComment};
use gateway_core::services::{AccessScope, CommentEdit, NewComment};
use serde::Deserialize;
use std::collections::BTreeMap;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CommentQuery {
    /// Timeline entry the comments are attached to.
    pub parent_entry_id: String,
}

#[utoipa::path(
    get,
    path = "/UserProfile/{hdid}/Comment",
    params(("hdid" = String, Path, description = "Caller HDID"), CommentQuery),
    responses(
        (status = 200, description = "Comments on the entry", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_comments(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
    Query(query): Query<CommentQuery>,
) -> ApiResult<Vec<UserComment>> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    Ok(Json(
        state
            .comments
            .get_entry_comments(hdid.as_str(), &query.parent_entry_id)
            .await,
    ))
}

#[utoipa::path(
    get,
    path = "/UserProfile/{hdid}/Comment/all",
    params(("hdid" = String, Path, description = "Caller HDID")),
    responses(
        (status = 200, description = "All comments keyed by parent entry", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_all_comments(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
) -> ApiResult<BTreeMap<String, Vec<UserComment>>> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    Ok(Json(state.comments.get_profile_comments(hdid.as_str()).await))
}

#[utoipa::path(
    post,
    path = "/UserProfile/{hdid}/Comment",
    params(("hdid" = String, Path, description = "Caller HDID")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Stored comment", body = RequestResultDoc),
        (status = 400, description = "Unknown entry type", body = ProblemDetails),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn add_comment(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
    Json(req): Json<CommentRequest>,
) -> ApiResult<UserComment> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    let entry_type_code: CommentEntryType =
        req.entry_type_code.parse().map_err(ApiError::bad_request)?;
    let comment = NewComment {
        parent_entry_id: req.parent_entry_id,
        entry_type_code,
        text: req.text,
    };
    Ok(Json(state.comments.add_comment(hdid.as_str(), comment).await))
}

#[utoipa::path(
    put,
    path = "/UserProfile/{hdid}/Comment",
    params(("hdid" = String, Path, description = "Caller HDID")),
    request_body = CommentUpdateRequest,
    responses(
        (status = 200, description = "Updated comment", body = RequestResultDoc),
        (status = 400, description = "Malformed id", body = ProblemDetails),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_comment(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
    Json(req): Json<CommentUpdateRequest>,
) -> ApiResult<UserComment> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    let edit = CommentEdit {
        id: parse_id(&req.id)?,
        text: req.text,
        version: req.version,
    };
    Ok(Json(state.comments.update_comment(hdid.as_str(), edit).await))
}

#[utoipa::path(
    delete,
    path = "/UserProfile/{hdid}/Comment",
    params(("hdid" = String, Path, description = "Caller HDID")),
    request_body = DeleteEntryRequest,
    responses(
        (status = 200, description = "Deletion envelope", body = RequestResultDoc),
        (status = 400, description = "Malformed id", body = ProblemDetails),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn delete_comment(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
    Json(req): Json<DeleteEntryRequest>,
) -> ApiResult<()> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    let id = parse_id(&req.id)?;
    Ok(Json(
        state
            .comments
            .delete_comment(hdid.as_str(), id, req.version)
            .await,
    ))
}
