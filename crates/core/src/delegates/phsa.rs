//! Shared PHSA response handling.
//!
//! Every PHSA endpoint wraps its payload in `{ "result": ..., "loadState": ... }` and signals
//! failures through HTTP status codes. [`send`] turns both into a [`RequestResult`].

use crate::request_result::{ErrorType, RequestResult, ServiceType};
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhsaLoadState {
    #[serde(default)]
    pub refresh_in_progress: bool,
    #[serde(default)]
    pub back_off_milliseconds: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhsaResult<T> {
    pub result: Option<T>,
    #[serde(default)]
    pub load_state: Option<PhsaLoadState>,
}

impl<T> PhsaResult<T> {
    pub fn refresh_in_progress(&self) -> bool {
        self.load_state
            .as_ref()
            .is_some_and(|s| s.refresh_in_progress)
    }
}

/// Send a PHSA request and decode the wrapped payload.
pub(crate) async fn send<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    what: &str,
) -> RequestResult<PhsaResult<T>> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("PHSA {} request failed: {}", what, e);
            return RequestResult::service_error(
                ErrorType::CommunicationExternal,
                ServiceType::Phsa,
                format!("Unable to connect to PHSA for {what}"),
            );
        }
    };

    match response.status() {
        StatusCode::OK => {}
        StatusCode::NO_CONTENT => return RequestResult::empty(),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            tracing::warn!("PHSA denied access to {}", what);
            return RequestResult::service_error(
                ErrorType::Forbidden,
                ServiceType::Phsa,
                format!("PHSA denied access to {what}"),
            );
        }
        status => {
            tracing::error!("PHSA {} returned http status {}", what, status);
            return RequestResult::service_error(
                ErrorType::CommunicationExternal,
                ServiceType::Phsa,
                format!("PHSA returned HTTP status {} for {what}", status.as_u16()),
            );
        }
    }

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("unable to read PHSA {} response: {}", what, e);
            return RequestResult::service_error(
                ErrorType::CommunicationExternal,
                ServiceType::Phsa,
                format!("Unable to read PHSA {what} response"),
            );
        }
    };

    let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
    match serde_path_to_error::deserialize::<_, PhsaResult<T>>(&mut deserializer) {
        Ok(parsed) => RequestResult::success(parsed),
        Err(err) => {
            let path = err.path().to_string();
            tracing::error!(
                "PHSA {} schema mismatch at {}: {}",
                what,
                if path.is_empty() { "<root>" } else { path.as_str() },
                err.into_inner()
            );
            RequestResult::service_error(
                ErrorType::CommunicationExternal,
                ServiceType::Phsa,
                format!("Unable to parse PHSA {what} response"),
            )
        }
    }
}

/// PHSA dates arrive either as `yyyy-MM-dd` or as a full timestamp; only the date is kept.
pub fn parse_phsa_date(value: &str) -> Option<NaiveDate> {
    let date = value.get(0..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
