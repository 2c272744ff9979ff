//! Services sit between controllers and delegates: they validate input, apply business rules and
//! reshape delegate payloads into the models returned to clients.

pub mod access;
pub mod comment;
pub mod dependent;
pub mod immunization;
pub mod note;
pub mod patient;
pub mod user_profile;
pub mod vaccine_proof;
pub mod vaccine_status;

pub use access::{AccessScope, AuthorizationService};
pub use comment::{CommentEdit, CommentService, NewComment};
pub use dependent::{AddDependentRequest, DependentService};
pub use immunization::ImmunizationService;
pub use note::{NoteInput, NoteService};
pub use patient::PatientService;
pub use user_profile::{CreateUserProfile, UserProfileService};
pub use vaccine_proof::VaccineProofService;
pub use vaccine_status::VaccineStatusService;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::PatientModel;
    use chrono::{Datelike, NaiveDate, Utc};

    pub(crate) const HDID: &str = "P6FFO433A5WPMVTGM7T4ZVWBKCSVNAYGTWTU3J2LWMGUMERKI72A";
    pub(crate) const PHN: &str = "9735353315";

    /// Birthdate `years` years before today.
    pub(crate) fn born_years_ago(years: i32) -> NaiveDate {
        let today = Utc::now().date_naive();
        NaiveDate::from_ymd_opt(today.year() - years, 1, 1).unwrap_or(today)
    }

    pub(crate) fn patient(hdid: &str, phn: &str, birthdate: NaiveDate) -> PatientModel {
        PatientModel {
            hdid: hdid.into(),
            phn: phn.into(),
            first_name: "Simone".into(),
            last_name: "Powell".into(),
            birthdate: Some(birthdate),
            gender: "Female".into(),
            common_name: None,
            legal_name: None,
            physical_address: None,
            postal_address: None,
            response_code: "BCHCIM.GD.0.0013".into(),
            is_deceased: false,
        }
    }
}
