use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaccineState {
    NotFound,
    AllDosesReceived,
    PartialDosesReceived,
    Exempt,
    DataMismatch,
    Threshold,
    Blocked,
}

impl VaccineState {
    /// Parse the PHSA status indicator. Unknown indicators map to `NotFound`.
    pub fn from_indicator(indicator: &str) -> Self {
        match indicator {
            "AllDosesReceived" => VaccineState::AllDosesReceived,
            "PartialDosesReceived" => VaccineState::PartialDosesReceived,
            "Exempt" => VaccineState::Exempt,
            "DataMismatch" => VaccineState::DataMismatch,
            "Threshold" => VaccineState::Threshold,
            "Blocked" => VaccineState::Blocked,
            _ => VaccineState::NotFound,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            VaccineState::NotFound => "NotFound",
            VaccineState::AllDosesReceived => "AllDosesReceived",
            VaccineState::PartialDosesReceived => "PartialDosesReceived",
            VaccineState::Exempt => "Exempt",
            VaccineState::DataMismatch => "DataMismatch",
            VaccineState::Threshold => "Threshold",
            VaccineState::Blocked => "Blocked",
        }
    }

    /// States a proof document can be generated for.
    pub fn is_provable(self) -> bool {
        matches!(
            self,
            VaccineState::AllDosesReceived
                | VaccineState::PartialDosesReceived
                | VaccineState::Exempt
        )
    }
}

/// Binary content embedded in a JSON payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedMedia {
    pub media_type: String,
    pub encoding: String,
    pub data: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineStatus {
    pub id: Option<String>,
    pub loaded: bool,
    pub retryin: u64,
    pub personal_health_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: Option<NaiveDate>,
    pub vaccination_date: Option<NaiveDate>,
    pub doses: u32,
    pub state: VaccineState,
    pub qr_code: Option<EncodedMedia>,
    pub federal_vaccine_proof: Option<EncodedMedia>,
}

/// Layout requested for a vaccine proof document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaccineProofTemplate {
    Provincial,
    Federal,
    Combined,
}

impl VaccineProofTemplate {
    pub fn template_name(self) -> &'static str {
        match self {
            VaccineProofTemplate::Provincial => "provincial",
            VaccineProofTemplate::Federal => "federal",
            VaccineProofTemplate::Combined => "combined",
        }
    }
}

impl std::str::FromStr for VaccineProofTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "provincial" => Ok(VaccineProofTemplate::Provincial),
            "federal" => Ok(VaccineProofTemplate::Federal),
            "combined" => Ok(VaccineProofTemplate::Combined),
            other => Err(format!("unknown proof template '{other}'")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineProofResponse {
    pub id: String,
    pub status: String,
    pub document: Option<EncodedMedia>,
}
