use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileModel {
    pub hdid: String,
    pub accepted_terms_of_service: bool,
    pub email: Option<String>,
    pub sms_number: Option<String>,
    pub created_date_time: DateTime<Utc>,
    pub last_login_date_time: DateTime<Utc>,
    pub closed_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,
}

impl UserProfileModel {
    pub fn is_closed(&self) -> bool {
        self.closed_date_time.is_some()
    }
}
