//! One module per REST resource.

pub mod comment;
pub mod dependent;
pub mod health;
pub mod immunization;
pub mod note;
pub mod patient;
pub mod user_profile;
pub mod vaccine_status;

use crate::ApiError;
use axum::Json;
use chrono::NaiveDate;
use gateway_core::RequestResult;
use uuid::Uuid;

/// Handler result: the service envelope on success, problem details on transport failures.
pub type ApiResult<T> = Result<Json<RequestResult<T>>, ApiError>;

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("{field} must be a yyyy-MM-dd date")))
}

pub(crate) fn parse_id(value: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value.trim()).map_err(|_| ApiError::bad_request("id must be a UUID"))
}
