//! Request bodies accepted by the REST API and schema-only types for OpenAPI.
//!
//! Dates travel as `yyyy-MM-dd` strings and identifiers as strings; controllers parse them so a
//! malformed value becomes a 400 problem response rather than a deserialisation rejection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// RFC 7807 problem details returned for transport-level failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    pub fn new(status: u16, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_: "about:blank".into(),
            title: title.into(),
            status,
            detail: Some(detail.into()),
            instance: None,
        }
    }
}

/// Shape of the envelope every service endpoint returns (with HTTP 200).
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestResultDoc {
    #[schema(value_type = Object)]
    pub resource_payload: Option<serde_json::Value>,
    pub total_result_count: Option<usize>,
    pub page_index: Option<usize>,
    pub page_size: Option<usize>,
    /// `Error`, `Success` or `ActionRequired`.
    pub result_status: String,
    pub result_error: Option<RequestResultErrorDoc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestResultErrorDoc {
    pub result_message: String,
    pub error_code: String,
    pub trace_id: Option<String>,
    pub action_code: Option<String>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserProfileRequest {
    pub accepted_terms_of_service: bool,
    pub email: Option<String>,
    pub sms_number: Option<String>,
}

/// Preference names mapped to their values.
#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PreferencesRequest(pub BTreeMap<String, String>);

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub parent_entry_id: String,
    /// `Immunization`, `Medication`, `Laboratory`, `Encounter` or `Note`.
    pub entry_type_code: String,
    pub text: String,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpdateRequest {
    pub id: String,
    pub text: String,
    pub version: u32,
}

/// Identifies a versioned record to delete.
#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntryRequest {
    pub id: String,
    pub version: u32,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    /// Required when updating.
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub text: String,
    pub journal_date: String,
    /// Required when updating.
    pub version: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddDependentBody {
    pub phn: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}
