use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNote {
    pub id: Uuid,
    pub hdid: String,
    pub title: String,
    pub text: String,
    pub journal_date: NaiveDate,
    pub created_date_time: DateTime<Utc>,
    pub updated_date_time: DateTime<Utc>,
    pub version: u32,
}
