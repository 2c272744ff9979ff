//! The request result envelope returned by every service call.
//!
//! Delegates translate upstream status codes into a [`RequestResult`], services reshape the
//! payload, and controllers serialise the envelope as-is. Error codes are built by
//! [`ErrorCode`] so clients can tell internal failures (`SERVER-*`) from upstream ones
//! (`<SERVICE>-*`).

use crate::error::DbError;
use serde::{Deserialize, Serialize};

/// Outcome of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultType {
    Error,
    Success,
    ActionRequired,
}

/// Follow-up the client is expected to take when a result is not a plain success.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Refresh,
    Protected,
    DataMismatch,
    Invalid,
    Validation,
    NoHdid,
}

/// Classification of a failure, rendered into the error code suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorType {
    InvalidState,
    CommunicationInternal,
    CommunicationExternal,
    Concurrency,
    RecordNotFound,
    ClientRegistryRecordsNotFound,
    ClientRegistryDoesNotReturnPerson,
    ClientRegistryReturnedError,
    ClientRegistryPatientDeceased,
    Forbidden,
    JobFailed,
}

impl ErrorType {
    fn code(self) -> &'static str {
        match self {
            ErrorType::InvalidState => "INVSTATE",
            ErrorType::CommunicationInternal => "INTCOMM",
            ErrorType::CommunicationExternal => "EXTCOMM",
            ErrorType::Concurrency => "CONCURRENCY",
            ErrorType::RecordNotFound => "NOTFOUND",
            ErrorType::ClientRegistryRecordsNotFound => "CLREGNOTFOUND",
            ErrorType::ClientRegistryDoesNotReturnPerson => "CLREGNOPERSON",
            ErrorType::ClientRegistryReturnedError => "CLREGERROR",
            ErrorType::ClientRegistryPatientDeceased => "CLREGDECEASED",
            ErrorType::Forbidden => "FORBIDDEN",
            ErrorType::JobFailed => "JOBFAILED",
        }
    }
}

/// Upstream system an error originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceType {
    Database,
    ClientRegistries,
    Phsa,
    BcMail,
}

impl ServiceType {
    fn code(self) -> &'static str {
        match self {
            ServiceType::Database => "DB",
            ServiceType::ClientRegistries => "CLREG",
            ServiceType::Phsa => "PHSA",
            ServiceType::BcMail => "BCMP",
        }
    }
}

/// Error code builder.
pub struct ErrorCode;

impl ErrorCode {
    /// Code for a failure raised by the gateway itself.
    pub fn internal(error_type: ErrorType) -> String {
        format!("SERVER-{}", error_type.code())
    }

    /// Code for a failure reported by (or while talking to) an upstream system.
    pub fn service(error_type: ErrorType, service: ServiceType) -> String {
        format!("{}-{}", service.code(), error_type.code())
    }
}

/// Error detail attached to a non-success result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResultError {
    pub result_message: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_code: Option<ActionType>,
}

impl RequestResultError {
    pub fn new(result_message: impl Into<String>, error_code: String) -> Self {
        Self {
            result_message: result_message.into(),
            error_code,
            trace_id: None,
            action_code: None,
        }
    }

    pub fn with_action(mut self, action: ActionType) -> Self {
        self.action_code = Some(action);
        self
    }
}

/// Envelope wrapping every service response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResult<T> {
    pub resource_payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_result_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    pub result_status: ResultType,
    pub result_error: Option<RequestResultError>,
}

impl<T> RequestResult<T> {
    pub fn success(payload: T) -> Self {
        Self {
            resource_payload: Some(payload),
            total_result_count: None,
            page_index: None,
            page_size: None,
            result_status: ResultType::Success,
            result_error: None,
        }
    }

    /// Success carrying a collection size.
    pub fn success_with_count(payload: T, total_result_count: usize) -> Self {
        Self {
            total_result_count: Some(total_result_count),
            ..Self::success(payload)
        }
    }

    /// Success with no payload (for example an upstream 204).
    pub fn empty() -> Self {
        Self {
            resource_payload: None,
            total_result_count: Some(0),
            page_index: None,
            page_size: None,
            result_status: ResultType::Success,
            result_error: None,
        }
    }

    pub fn error(error: RequestResultError) -> Self {
        Self {
            resource_payload: None,
            total_result_count: None,
            page_index: None,
            page_size: None,
            result_status: ResultType::Error,
            result_error: Some(error),
        }
    }

    pub fn internal_error(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self::error(RequestResultError::new(
            message,
            ErrorCode::internal(error_type),
        ))
    }

    pub fn service_error(
        error_type: ErrorType,
        service: ServiceType,
        message: impl Into<String>,
    ) -> Self {
        Self::error(RequestResultError::new(
            message,
            ErrorCode::service(error_type, service),
        ))
    }

    pub fn action_required(
        action: ActionType,
        message: impl Into<String>,
        payload: Option<T>,
    ) -> Self {
        Self {
            resource_payload: payload,
            total_result_count: None,
            page_index: None,
            page_size: None,
            result_status: ResultType::ActionRequired,
            result_error: Some(
                RequestResultError::new(message, ErrorCode::internal(ErrorType::InvalidState))
                    .with_action(action),
            ),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result_status == ResultType::Success
    }

    /// Transform the payload while keeping status, error and paging intact.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RequestResult<U> {
        RequestResult {
            resource_payload: self.resource_payload.map(f),
            total_result_count: self.total_result_count,
            page_index: self.page_index,
            page_size: self.page_size,
            result_status: self.result_status,
            result_error: self.result_error,
        }
    }

    /// Re-type a failed result, dropping any payload.
    pub fn propagate<U>(self) -> RequestResult<U> {
        RequestResult {
            resource_payload: None,
            total_result_count: None,
            page_index: None,
            page_size: None,
            result_status: self.result_status,
            result_error: self.result_error,
        }
    }
}

impl<T> From<DbError> for RequestResult<T> {
    fn from(err: DbError) -> Self {
        let error_type = match err {
            DbError::NotFound => ErrorType::RecordNotFound,
            DbError::Concurrency => ErrorType::Concurrency,
            DbError::AlreadyExists => ErrorType::InvalidState,
            DbError::Io(_) | DbError::Serialization(_) => ErrorType::CommunicationInternal,
        };
        RequestResult::service_error(error_type, ServiceType::Database, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_prefixed_by_origin() {
        assert_eq!(
            ErrorCode::internal(ErrorType::InvalidState),
            "SERVER-INVSTATE"
        );
        assert_eq!(
            ErrorCode::service(ErrorType::CommunicationExternal, ServiceType::Phsa),
            "PHSA-EXTCOMM"
        );
    }

    #[test]
    fn map_keeps_status_and_count() {
        let result = RequestResult::success_with_count(vec![1, 2, 3], 3).map(|v| v.len());
        assert_eq!(result.resource_payload, Some(3));
        assert_eq!(result.total_result_count, Some(3));
        assert!(result.is_success());
    }

    #[test]
    fn serialises_camel_case_envelope() {
        let result: RequestResult<u8> =
            RequestResult::action_required(ActionType::Refresh, "refresh in progress", None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["resultStatus"], "ActionRequired");
        assert_eq!(json["resultError"]["actionCode"], "Refresh");
        assert_eq!(json["resultError"]["errorCode"], "SERVER-INVSTATE");
        assert!(json["resourcePayload"].is_null());
    }

    #[test]
    fn db_errors_translate_to_database_codes() {
        let result: RequestResult<()> = DbError::Concurrency.into();
        assert_eq!(result.result_status, ResultType::Error);
        assert_eq!(
            result.result_error.unwrap().error_code,
            "DB-CONCURRENCY"
        );
    }
}
