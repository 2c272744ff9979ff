use super::{parse_date, parse_id, ApiResult};
use crate::auth::Caller;
use crate::{ApiError, AppState};
use api_shared::dto::{DeleteEntryRequest, NoteRequest, ProblemDetails, RequestResultDoc};
use axum::{
    extract::{Path, State},
    Json,
};
use gateway_core::models::UserNote;
use gateway_core::services::{AccessScope, NoteInput};

fn note_input(req: &NoteRequest) -> Result<NoteInput, ApiError> {
    Ok(NoteInput {
        title: req.title.clone(),
        text: req.text.clone(),
        journal_date: parse_date("journalDate", &req.journal_date)?,
    })
}

#[utoipa::path(
    get,
    path = "/Note/{hdid}",
    params(("hdid" = String, Path, description = "Caller HDID")),
    responses(
        (status = 200, description = "Notes, newest journal date first", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_notes(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
) -> ApiResult<Vec<UserNote>> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    Ok(Json(state.notes.get_notes(hdid.as_str()).await))
}

#[utoipa::path(
    post,
    path = "/Note/{hdid}",
    params(("hdid" = String, Path, description = "Caller HDID")),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Stored note", body = RequestResultDoc),
        (status = 400, description = "Malformed journal date", body = ProblemDetails),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn add_note(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
    Json(req): Json<NoteRequest>,
) -> ApiResult<UserNote> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    let input = note_input(&req)?;
    Ok(Json(state.notes.add_note(hdid.as_str(), input).await))
}

#[utoipa::path(
    put,
    path = "/Note/{hdid}",
    params(("hdid" = String, Path, description = "Caller HDID")),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Updated note", body = RequestResultDoc),
        (status = 400, description = "Missing id or version, or malformed values", body = ProblemDetails),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "HDID does not match the token", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_note(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
    Json(req): Json<NoteRequest>,
) -> ApiResult<UserNote> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    let id = parse_id(req.id.as_deref().unwrap_or_default())?;
    let version = req
        .version
        .ok_or_else(|| ApiError::bad_request("version is required to update a note"))?;
    let input = note_input(&req)?;
    Ok(Json(
        state
            .notes
            .update_note(hdid.as_str(), id, version, input)
            .await,
    ))
}

#[utoipa::path(
    delete,
    path = "/Note/{hdid}",
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
pub async fn delete_note(
    State(state): State<AppState>,
    caller: Caller,
    Path(hdid): Path<String>,
    Json(req): Json<DeleteEntryRequest>,
) -> ApiResult<()> {
    let hdid = caller.authorize(&state, &hdid, AccessScope::Owner).await?;
    let id = parse_id(&req.id)?;
    Ok(Json(
        state.notes.delete_note(hdid.as_str(), id, req.version).await,
    ))
}
