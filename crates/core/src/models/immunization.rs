use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upstream refresh state. While a refresh is in progress the data may be incomplete.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadState {
    pub refresh_in_progress: bool,
    #[serde(default)]
    pub back_off_milliseconds: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmunizationAgent {
    pub code: String,
    pub name: String,
    pub lot_number: String,
    pub product_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmunizationDefinition {
    pub name: String,
    pub agents: Vec<ImmunizationAgent>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmunizationEvent {
    pub id: String,
    pub date_of_immunization: Option<NaiveDate>,
    pub status: String,
    pub provider_or_clinic: String,
    pub targeted_disease: String,
    pub immunization: ImmunizationDefinition,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDisease {
    pub code: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmunizationRecommendation {
    pub recommendation_set_id: String,
    pub immunization_name: String,
    pub target_diseases: Vec<TargetDisease>,
    pub agent_eligible_date: Option<NaiveDate>,
    pub agent_due_date: Option<NaiveDate>,
    pub status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmunizationResult {
    pub load_state: LoadState,
    pub immunizations: Vec<ImmunizationEvent>,
    pub recommendations: Vec<ImmunizationRecommendation>,
}
