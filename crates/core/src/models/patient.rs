//! Patient demographics as returned to clients.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Which identifier a demographics lookup is keyed by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientIdentifierType {
    Hdid,
    Phn,
}

impl PatientIdentifierType {
    pub fn as_str(self) -> &'static str {
        match self {
            PatientIdentifierType::Hdid => "hdid",
            PatientIdentifierType::Phn => "phn",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    pub given_name: String,
    pub surname: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street_lines: Vec<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientModel {
    pub hdid: String,
    pub phn: String,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: Option<NaiveDate>,
    pub gender: String,
    pub common_name: Option<Name>,
    pub legal_name: Option<Name>,
    pub physical_address: Option<Address>,
    pub postal_address: Option<Address>,
    /// Client Registry response code, kept so warnings remain visible to callers.
    pub response_code: String,
    pub is_deceased: bool,
}

impl PatientModel {
    /// Age in whole years on `today`, or `None` when the birthdate is unknown.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let birthdate = self.birthdate?;
        let mut age = today.year() - birthdate.year();
        if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(birthdate: Option<NaiveDate>) -> PatientModel {
        PatientModel {
            hdid: "H".into(),
            phn: "9735353315".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            birthdate,
            gender: "Female".into(),
            common_name: None,
            legal_name: None,
            physical_address: None,
            postal_address: None,
            response_code: String::new(),
            is_deceased: false,
        }
    }

    #[test]
    fn age_counts_completed_years() {
        let p = patient(NaiveDate::from_ymd_opt(2010, 6, 15));
        assert_eq!(p.age_on(NaiveDate::from_ymd_opt(2022, 6, 14).unwrap()), Some(11));
        assert_eq!(p.age_on(NaiveDate::from_ymd_opt(2022, 6, 15).unwrap()), Some(12));
        assert_eq!(patient(None).age_on(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()), None);
    }
}
