use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of timeline entry a comment is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentEntryType {
    Immunization,
    Medication,
    Laboratory,
    Encounter,
    Note,
}

impl std::str::FromStr for CommentEntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "immunization" => Ok(CommentEntryType::Immunization),
            "medication" => Ok(CommentEntryType::Medication),
            "laboratory" => Ok(CommentEntryType::Laboratory),
            "encounter" => Ok(CommentEntryType::Encounter),
            "note" => Ok(CommentEntryType::Note),
            other => Err(format!("unknown comment entry type '{other}'")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserComment {
    pub id: Uuid,
    pub user_profile_id: String,
    pub parent_entry_id: String,
    pub text: String,
    pub entry_type_code: CommentEntryType,
    pub created_date_time: DateTime<Utc>,
    pub updated_date_time: DateTime<Utc>,
    pub version: u32,
}
