//! PHSA immunization delegate.

use super::phsa::{self, PhsaResult};
use crate::request_result::RequestResult;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhsaImmunizationAgent {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lot_number: String,
    #[serde(default)]
    pub product_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhsaImmunizationView {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    pub occurrence_date_time: Option<String>,
    #[serde(default)]
    pub provider_or_clinic: String,
    #[serde(default)]
    pub targeted_disease: String,
    #[serde(default)]
    pub immunization_agents: Vec<PhsaImmunizationAgent>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhsaTargetDisease {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhsaRecommendedImmunization {
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhsaRecommendation {
    pub recommendation_set_id: String,
    pub immunization: Option<PhsaRecommendedImmunization>,
    #[serde(default)]
    pub target_diseases: Vec<PhsaTargetDisease>,
    pub agent_eligible_date: Option<String>,
    pub agent_due_date: Option<String>,
    #[serde(default)]
    pub status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhsaImmunizationResponse {
    #[serde(default)]
    pub immunization_views: Vec<PhsaImmunizationView>,
    #[serde(default)]
    pub recommendations: Vec<PhsaRecommendation>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImmunizationDelegate: Send + Sync {
    async fn get_immunizations(
        &self,
        hdid: &str,
        access_token: &str,
    ) -> RequestResult<PhsaResult<PhsaImmunizationResponse>>;

    async fn get_immunization(
        &self,
        immunization_id: &str,
        access_token: &str,
    ) -> RequestResult<PhsaResult<PhsaImmunizationView>>;
}

#[derive(Clone)]
pub struct RestImmunizationDelegate {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
}

impl RestImmunizationDelegate {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, limit: usize) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            limit,
        }
    }
}

#[async_trait]
impl ImmunizationDelegate for RestImmunizationDelegate {
    async fn get_immunizations(
        &self,
        hdid: &str,
        access_token: &str,
    ) -> RequestResult<PhsaResult<PhsaImmunizationResponse>> {
        let request = self
            .client
            .get(format!("{}/api/v1/Immunizations", self.base_url))
            .query(&[("subjectHdid", hdid), ("limit", &self.limit.to_string())])
            .bearer_auth(access_token);
        phsa::send(request, "immunizations").await
    }

    async fn get_immunization(
        &self,
        immunization_id: &str,
        access_token: &str,
    ) -> RequestResult<PhsaResult<PhsaImmunizationView>> {
        let request = self
            .client
            .get(format!(
                "{}/api/v1/Immunizations/{}",
                self.base_url, immunization_id
            ))
            .bearer_auth(access_token);
        phsa::send(request, "immunization").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request_result::ResultType;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn reads_immunizations_with_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/Immunizations")
                    .query_param("subjectHdid", "HDID1")
                    .query_param("limit", "50")
                    .header("authorization", "Bearer token-1");
                then.status(200).json_body(json!({
                    "result": {
                        "immunizationViews": [{
                            "id": "imm-1",
                            "name": "COVID-19 mRNA",
                            "status": "Completed",
                            "occurrenceDateTime": "2021-05-04T00:00:00",
                            "providerOrClinic": "Clinic A",
                            "targetedDisease": "COVID-19",
                            "immunizationAgents": [{"code": "208", "name": "Pfizer", "lotNumber": "L1", "productName": "Comirnaty"}]
                        }],
                        "recommendations": []
                    },
                    "loadState": {"refreshInProgress": false}
                }));
            })
            .await;

        let delegate = RestImmunizationDelegate::new(reqwest::Client::new(), server.base_url(), 50);
        let result = delegate.get_immunizations("HDID1", "token-1").await;

        mock.assert_async().await;
        let payload = result.resource_payload.unwrap();
        let views = payload.result.unwrap().immunization_views;
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].immunization_agents[0].lot_number, "L1");
        assert!(!payload.load_state.unwrap().refresh_in_progress);
    }

    #[tokio::test]
    async fn schema_mismatch_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/Immunizations");
                then.status(200)
                    .json_body(json!({"result": {"immunizationViews": [{"id": 7}]}}));
            })
            .await;

        let delegate = RestImmunizationDelegate::new(reqwest::Client::new(), server.base_url(), 50);
        let result = delegate.get_immunizations("HDID1", "t").await;
        assert_eq!(result.result_status, ResultType::Error);
        assert_eq!(result.result_error.unwrap().error_code, "PHSA-EXTCOMM");
    }

    #[tokio::test]
    async fn status_codes_translate() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/Immunizations/forbidden");
                then.status(403);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/Immunizations/empty");
                then.status(204);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/Immunizations/expired");
                then.status(401);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/Immunizations/missing");
                then.status(404);
            })
            .await;

        let delegate = RestImmunizationDelegate::new(reqwest::Client::new(), server.base_url(), 50);

        let forbidden = delegate.get_immunization("forbidden", "t").await;
        assert_eq!(
            forbidden.result_error.unwrap().error_code,
            "PHSA-FORBIDDEN"
        );

        let expired = delegate.get_immunization("expired", "t").await;
        assert_eq!(expired.result_error.unwrap().error_code, "PHSA-FORBIDDEN");

        let missing = delegate.get_immunization("missing", "t").await;
        assert_eq!(missing.result_status, ResultType::Error);
        assert_eq!(missing.result_error.unwrap().error_code, "PHSA-EXTCOMM");

        let empty = delegate.get_immunization("empty", "t").await;
        assert!(empty.is_success());
        assert!(empty.resource_payload.is_none());
    }
}
