//! Caller authentication and per-patient authorization for handlers.

use crate::{ApiError, AppState};
use api_shared::AuthenticatedUser;
use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use gateway_core::services::AccessScope;
use gateway_types::Hdid;

/// The authenticated caller. Extracting it rejects requests without a valid bearer token.
pub struct Caller(pub AuthenticatedUser);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        Ok(Caller(state.tokens.authenticate(header)?))
    }
}

impl Caller {
    pub fn access_token(&self) -> &str {
        &self.0.access_token
    }

    /// Check the caller may act on `subject` and return the validated identifier.
    pub async fn authorize(
        &self,
        state: &AppState,
        subject: &str,
        scope: AccessScope,
    ) -> Result<Hdid, ApiError> {
        let hdid = Hdid::parse(subject).map_err(|e| ApiError::bad_request(e.to_string()))?;
        if state
            .authorization
            .can_access(&self.0.hdid, hdid.as_str(), scope)
            .await
        {
            Ok(hdid)
        } else {
            tracing::warn!("caller denied access to another patient's records");
            Err(ApiError::forbidden())
        }
    }
}
