use super::immunization::HdidQuery;
use super::ApiResult;
use crate::auth::Caller;
use crate::{ApiError, AppState};
use api_shared::dto::{ProblemDetails, RequestResultDoc};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use gateway_core::models::{VaccineProofResponse, VaccineProofTemplate, VaccineStatus};
use gateway_core::services::AccessScope;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ProofQuery {
    pub hdid: String,
    /// `Provincial`, `Federal` or `Combined`.
    pub proof_template: String,
}

fn required_header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, ApiError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("missing {name} header")))
}

#[utoipa::path(
    get,
    path = "/PublicVaccineStatus",
    params(
        ("phn" = String, Header, description = "Personal health number"),
        ("dateOfBirth" = String, Header, description = "yyyy-MM-dd"),
        ("dateOfVaccine" = String, Header, description = "yyyy-MM-dd")
    ),
    responses(
        (status = 200, description = "Vaccine status envelope", body = RequestResultDoc),
        (status = 400, description = "Missing header", body = ProblemDetails)
    )
)]
/// Unauthenticated lookup. Identifiers travel in headers so they stay out of access logs.
#[axum::debug_handler]
pub async fn get_public_vaccine_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<VaccineStatus> {
    let phn = required_header(&headers, "phn")?;
    let date_of_birth = required_header(&headers, "dateOfBirth")?;
    let date_of_vaccine = required_header(&headers, "dateOfVaccine")?;
    let result = state
        .vaccine_status
        .get_public_vaccine_status(phn, date_of_birth, date_of_vaccine)
        .await;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/AuthenticatedVaccineStatus",
    params(HdidQuery),
    responses(
        (status = 200, description = "Vaccine status envelope", body = RequestResultDoc),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "Caller may not view this patient", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_authenticated_vaccine_status(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<HdidQuery>,
) -> ApiResult<VaccineStatus> {
    let hdid = caller
        .authorize(&state, &query.hdid, AccessScope::HealthData)
        .await?;
    let result = state
        .vaccine_status
        .get_authenticated_vaccine_status(hdid.as_str(), false, caller.access_token())
        .await;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/AuthenticatedVaccineStatus/pdf",
    params(ProofQuery),
    responses(
        (status = 200, description = "Vaccine proof envelope (base64 PDF)", body = RequestResultDoc),
        (status = 400, description = "Unknown proof template", body = ProblemDetails),
        (status = 401, description = "Missing or invalid token", body = ProblemDetails),
        (status = 403, description = "Caller may not view this patient", body = ProblemDetails)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn get_vaccine_proof(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ProofQuery>,
) -> ApiResult<VaccineProofResponse> {
    let hdid = caller
        .authorize(&state, &query.hdid, AccessScope::HealthData)
        .await?;
    let template: VaccineProofTemplate = query
        .proof_template
        .parse()
        .map_err(ApiError::bad_request)?;
    let result = state
        .vaccine_proof
        .get_vaccine_proof(hdid.as_str(), template, caller.access_token())
        .await;
    Ok(Json(result))
}
