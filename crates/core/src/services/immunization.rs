//! Immunization history.

use crate::delegates::immunization::{
    ImmunizationDelegate, PhsaImmunizationView, PhsaRecommendation,
};
use crate::delegates::phsa::parse_phsa_date;
use crate::models::{
    ImmunizationAgent, ImmunizationDefinition, ImmunizationEvent, ImmunizationRecommendation,
    ImmunizationResult, LoadState, TargetDisease,
};
use crate::request_result::{ActionType, ErrorType, RequestResult, ServiceType};
use std::cmp::Reverse;
use std::sync::Arc;

pub struct ImmunizationService {
    delegate: Arc<dyn ImmunizationDelegate>,
}

impl ImmunizationService {
    pub fn new(delegate: Arc<dyn ImmunizationDelegate>) -> Self {
        Self { delegate }
    }

    /// Immunizations newest first, plus recommendations.
    ///
    /// While PHSA is still refreshing the patient's data the partial result is returned with a
    /// `Refresh` action so the client can retry after the back-off.
    pub async fn get_immunizations(
        &self,
        hdid: &str,
        access_token: &str,
    ) -> RequestResult<ImmunizationResult> {
        let result = self.delegate.get_immunizations(hdid, access_token).await;
        if !result.is_success() {
            return result.propagate();
        }

        let Some(phsa) = result.resource_payload else {
            return RequestResult::success_with_count(ImmunizationResult::default(), 0);
        };

        let load_state = phsa
            .load_state
            .as_ref()
            .map(|s| LoadState {
                refresh_in_progress: s.refresh_in_progress,
                back_off_milliseconds: s.back_off_milliseconds,
            })
            .unwrap_or_default();
        let response = phsa.result.unwrap_or_default();

        let mut immunizations: Vec<ImmunizationEvent> = response
            .immunization_views
            .into_iter()
            .map(to_event)
            .collect();
        immunizations.sort_by_key(|e| Reverse(e.date_of_immunization));

        let recommendations = response
            .recommendations
            .into_iter()
            .map(to_recommendation)
            .collect();

        let count = immunizations.len();
        let payload = ImmunizationResult {
            load_state,
            immunizations,
            recommendations,
        };

        if payload.load_state.refresh_in_progress {
            tracing::info!("immunization refresh in progress");
            return RequestResult::action_required(
                ActionType::Refresh,
                "Immunization data is being refreshed",
                Some(payload),
            );
        }
        RequestResult::success_with_count(payload, count)
    }

    pub async fn get_immunization(
        &self,
        immunization_id: &str,
        access_token: &str,
    ) -> RequestResult<ImmunizationEvent> {
        let result = self
            .delegate
            .get_immunization(immunization_id, access_token)
            .await;
        if !result.is_success() {
            return result.propagate();
        }
        match result.resource_payload.and_then(|p| p.result) {
            Some(view) => RequestResult::success(to_event(view)),
            None => RequestResult::service_error(
                ErrorType::RecordNotFound,
                ServiceType::Phsa,
                "Immunization not found",
            ),
        }
    }
}

fn to_event(view: PhsaImmunizationView) -> ImmunizationEvent {
    ImmunizationEvent {
        id: view.id,
        date_of_immunization: view.occurrence_date_time.as_deref().and_then(parse_phsa_date),
        status: view.status,
        provider_or_clinic: view.provider_or_clinic,
        targeted_disease: view.targeted_disease,
        immunization: ImmunizationDefinition {
            name: view.name,
            agents: view
                .immunization_agents
                .into_iter()
                .map(|a| ImmunizationAgent {
                    code: a.code,
                    name: a.name,
                    lot_number: a.lot_number,
                    product_name: a.product_name,
                })
                .collect(),
        },
    }
}

fn to_recommendation(rec: PhsaRecommendation) -> ImmunizationRecommendation {
    ImmunizationRecommendation {
        recommendation_set_id: rec.recommendation_set_id,
        immunization_name: rec.immunization.map(|i| i.name).unwrap_or_default(),
        target_diseases: rec
            .target_diseases
            .into_iter()
            .map(|d| TargetDisease {
                code: d.code,
                name: d.name,
            })
            .collect(),
        agent_eligible_date: rec.agent_eligible_date.as_deref().and_then(parse_phsa_date),
        agent_due_date: rec.agent_due_date.as_deref().and_then(parse_phsa_date),
        status: rec.status,
    }
}
