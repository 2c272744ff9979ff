use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stored link granting `owner_hdid` access to `resource_owner_hdid`'s records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDelegate {
    pub resource_owner_hdid: String,
    pub owner_hdid: String,
    pub created_date_time: DateTime<Utc>,
    pub version: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentInformation {
    pub hdid: String,
    pub phn: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentModel {
    pub owner_id: String,
    pub delegate_id: String,
    pub dependent_information: DependentInformation,
    pub version: u32,
}
