//! Transport-level failures rendered as RFC 7807 problem details.
//!
//! Service outcomes are never reported here; they travel in the `RequestResult` envelope with
//! HTTP 200.

use api_shared::dto::ProblemDetails;
use api_shared::AuthError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

#[derive(Debug)]
pub struct ApiError(ProblemDetails);

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self(ProblemDetails::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error"),
            detail,
        ))
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    pub fn forbidden() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "Caller may not access this patient's records",
        )
    }

    pub fn status(&self) -> u16 {
        self.0.status
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        tracing::debug!("rejecting request: {}", err);
        ApiError::unauthorized(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(self.0),
        )
            .into_response()
    }
}
