//! Dependents: children a guardian may view health records for.

use super::PatientService;
use crate::delegates::ResourceDelegateDelegate;
use crate::models::{
    DependentInformation, DependentModel, PatientIdentifierType, PatientModel, ResourceDelegate,
};
use crate::request_result::{ActionType, ErrorType, RequestResult};
use chrono::{NaiveDate, Utc};
use gateway_types::Phn;
use std::sync::Arc;

/// Details a guardian supplies to register a dependent. They must match the Client Registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddDependentRequest {
    pub phn: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

pub struct DependentService {
    dependents: Arc<dyn ResourceDelegateDelegate>,
    patients: Arc<PatientService>,
    max_dependent_age: u32,
}

impl DependentService {
    pub fn new(
        dependents: Arc<dyn ResourceDelegateDelegate>,
        patients: Arc<PatientService>,
        max_dependent_age: u32,
    ) -> Self {
        Self {
            dependents,
            patients,
            max_dependent_age,
        }
    }

    /// Registered dependents with current demographics.
    ///
    /// Dependents whose demographics cannot be resolved are left out rather than failing the
    /// whole list.
    pub async fn get_dependents(&self, owner_hdid: &str) -> RequestResult<Vec<DependentModel>> {
        let links = match self.dependents.get_dependents(owner_hdid).await {
            Ok(links) => links,
            Err(e) => return e.into(),
        };

        let mut dependents = Vec::with_capacity(links.len());
        for link in links {
            let patient = self
                .patients
                .get_patient(&link.resource_owner_hdid, PatientIdentifierType::Hdid, false)
                .await;
            match patient.resource_payload {
                Some(p) if patient.result_error.is_none() => {
                    dependents.push(to_model(owner_hdid, &p, link.version));
                }
                _ => tracing::warn!(
                    "skipping dependent whose demographics could not be resolved: {}",
                    patient
                        .result_error
                        .map(|e| e.error_code)
                        .unwrap_or_default()
                ),
            }
        }

        let count = dependents.len();
        RequestResult::success_with_count(dependents, count)
    }

    pub async fn add_dependent(
        &self,
        owner_hdid: &str,
        request: AddDependentRequest,
    ) -> RequestResult<DependentModel> {
        let Ok(phn) = Phn::parse(&request.phn) else {
            return RequestResult::action_required(
                ActionType::Validation,
                "Personal health number is not valid",
                None,
            );
        };

        let result = self
            .patients
            .get_patient(phn.as_str(), PatientIdentifierType::Phn, true)
            .await;
        let Some(patient) = result.resource_payload.clone().filter(|_| result.is_success()) else {
            return result.propagate();
        };

        if !matches_request(&patient, &request) {
            tracing::info!("dependent details do not match the client registry");
            return RequestResult::action_required(
                ActionType::DataMismatch,
                "The information you entered does not match our records",
                None,
            );
        }
        if patient.hdid.is_empty() {
            return RequestResult::action_required(
                ActionType::NoHdid,
                "Dependent has no Health Gateway identifier",
                None,
            );
        }
        match patient.age_on(Utc::now().date_naive()) {
            Some(age) if age < self.max_dependent_age => {}
            _ => {
                return RequestResult::action_required(
                    ActionType::Protected,
                    format!("Dependent must be under {} years old", self.max_dependent_age),
                    None,
                )
            }
        }
        if patient.hdid.eq_ignore_ascii_case(owner_hdid) {
            return RequestResult::internal_error(
                ErrorType::InvalidState,
                "You cannot add yourself as a dependent",
            );
        }

        match self.dependents.exists(owner_hdid, &patient.hdid).await {
            Ok(false) => {}
            Ok(true) => {
                return RequestResult::internal_error(
                    ErrorType::InvalidState,
                    "Dependent is already registered",
                )
            }
            Err(e) => return e.into(),
        }

        let link = ResourceDelegate {
            resource_owner_hdid: patient.hdid.clone(),
            owner_hdid: owner_hdid.to_string(),
            created_date_time: Utc::now(),
            version: 0,
        };
        match self.dependents.add_dependent(link).await {
            Ok(()) => {
                tracing::info!("dependent registered");
                RequestResult::success(to_model(owner_hdid, &patient, 0))
            }
            Err(e) => e.into(),
        }
    }

    pub async fn remove_dependent(
        &self,
        owner_hdid: &str,
        dependent_hdid: &str,
    ) -> RequestResult<()> {
        match self
            .dependents
            .remove_dependent(owner_hdid, dependent_hdid)
            .await
        {
            Ok(()) => RequestResult::success(()),
            Err(e) => e.into(),
        }
    }
}

fn matches_request(patient: &PatientModel, request: &AddDependentRequest) -> bool {
    let same = |a: &str, b: &str| a.trim().to_lowercase() == b.trim().to_lowercase();
    same(&patient.first_name, &request.first_name)
        && same(&patient.last_name, &request.last_name)
        && patient.birthdate == Some(request.date_of_birth)
}

fn to_model(owner_hdid: &str, patient: &PatientModel, version: u32) -> DependentModel {
    DependentModel {
        owner_id: patient.hdid.clone(),
        delegate_id: owner_hdid.to_string(),
        dependent_information: DependentInformation {
            hdid: patient.hdid.clone(),
            phn: patient.phn.clone(),
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            date_of_birth: patient.birthdate,
            gender: patient.gender.clone(),
        },
        version,
    }
}
