//! COVID-19 vaccine status, for authenticated patients and public (PHN + dates) lookups.

use crate::delegates::phsa::{parse_phsa_date, PhsaResult};
use crate::delegates::vaccine_status::{PhsaVaccineStatus, VaccineStatusDelegate, VaccineStatusQuery};
use crate::models::{VaccineState, VaccineStatus};
use crate::request_result::{ActionType, ErrorType, RequestResult};
use chrono::{NaiveDate, Utc};
use gateway_types::Phn;
use std::sync::Arc;

pub struct VaccineStatusService {
    delegate: Arc<dyn VaccineStatusDelegate>,
    system_token: Option<String>,
}

impl VaccineStatusService {
    /// `system_token` authenticates public lookups, which carry no caller token.
    pub fn new(delegate: Arc<dyn VaccineStatusDelegate>, system_token: Option<String>) -> Self {
        Self {
            delegate,
            system_token,
        }
    }

    /// Public lookup keyed by PHN, date of birth and a vaccination date (all `yyyy-MM-dd`).
    pub async fn get_public_vaccine_status(
        &self,
        phn: &str,
        date_of_birth: &str,
        date_of_vaccine: &str,
    ) -> RequestResult<VaccineStatus> {
        let phn = match Phn::parse(phn) {
            Ok(phn) => phn,
            Err(e) => {
                tracing::debug!("public vaccine status rejected: {}", e);
                return RequestResult::internal_error(
                    ErrorType::InvalidState,
                    "Personal health number is not valid",
                );
            }
        };
        let Some(date_of_birth) = parse_input_date(date_of_birth) else {
            return RequestResult::internal_error(
                ErrorType::InvalidState,
                "Date of birth is not valid",
            );
        };
        let Some(date_of_vaccine) = parse_input_date(date_of_vaccine) else {
            return RequestResult::internal_error(
                ErrorType::InvalidState,
                "Date of vaccine is not valid",
            );
        };
        if date_of_birth > Utc::now().date_naive() || date_of_vaccine < date_of_birth {
            return RequestResult::internal_error(
                ErrorType::InvalidState,
                "Date of birth or date of vaccine is out of range",
            );
        }

        let Some(token) = self.system_token.as_deref() else {
            tracing::error!("public vaccine status requested but no PHSA system token is configured");
            return RequestResult::internal_error(
                ErrorType::CommunicationInternal,
                "Public vaccine status is not available",
            );
        };

        let query = VaccineStatusQuery::Public {
            phn: phn.as_str().to_string(),
            date_of_birth,
            date_of_vaccine,
        };
        let result = self.delegate.get_vaccine_status(query, token).await;
        to_vaccine_status(result, Some(phn.as_str().to_string()))
    }

    /// Status for a signed-in patient. `include_federal_pvc` asks PHSA to embed the federal proof.
    pub async fn get_authenticated_vaccine_status(
        &self,
        hdid: &str,
        include_federal_pvc: bool,
        access_token: &str,
    ) -> RequestResult<VaccineStatus> {
        let query = VaccineStatusQuery::Authenticated {
            hdid: hdid.to_string(),
            include_federal_pvc,
        };
        let result = self.delegate.get_vaccine_status(query, access_token).await;
        to_vaccine_status(result, None)
    }
}

fn parse_input_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn to_vaccine_status(
    result: RequestResult<PhsaResult<PhsaVaccineStatus>>,
    phn: Option<String>,
) -> RequestResult<VaccineStatus> {
    if !result.is_success() {
        return result.propagate();
    }

    let (phsa_status, refresh_in_progress, back_off) = match result.resource_payload {
        Some(payload) => {
            let refresh = payload.refresh_in_progress();
            let back_off = payload
                .load_state
                .as_ref()
                .map_or(0, |s| s.back_off_milliseconds);
            (payload.result, refresh, back_off)
        }
        None => (None, false, 0),
    };

    let mut status = match phsa_status {
        Some(s) => VaccineStatus {
            id: s.id,
            loaded: s.loaded,
            retryin: s.retryin,
            personal_health_number: phn,
            first_name: s.first_name,
            last_name: s.last_name,
            birthdate: s.birthdate.as_deref().and_then(parse_phsa_date),
            vaccination_date: s.vaccination_date.as_deref().and_then(parse_phsa_date),
            doses: s.doses,
            state: VaccineState::from_indicator(&s.status_indicator),
            qr_code: s.qr_code,
            federal_vaccine_proof: s.federal_vaccine_proof,
        },
        None => VaccineStatus {
            id: None,
            loaded: true,
            retryin: 0,
            personal_health_number: phn,
            first_name: String::new(),
            last_name: String::new(),
            birthdate: None,
            vaccination_date: None,
            doses: 0,
            state: VaccineState::NotFound,
            qr_code: None,
            federal_vaccine_proof: None,
        },
    };

    if refresh_in_progress {
        status.loaded = false;
        status.retryin = back_off;
        return RequestResult::action_required(
            ActionType::Refresh,
            "Vaccine status is being refreshed",
            Some(status),
        );
    }

    match status.state {
        VaccineState::DataMismatch | VaccineState::NotFound => RequestResult::action_required(
            ActionType::DataMismatch,
            "Vaccine status could not be matched to the supplied details",
            Some(status),
        ),
        VaccineState::Threshold | VaccineState::Blocked => RequestResult::action_required(
            ActionType::Refresh,
            "Vaccine status is temporarily unavailable",
            Some(status),
        ),
        _ => RequestResult::success(status),
    }
}
