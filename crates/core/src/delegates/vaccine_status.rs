//! PHSA vaccine status delegate.

use super::phsa::{self, PhsaResult};
use crate::models::EncodedMedia;
use crate::request_result::RequestResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhsaVaccineStatus {
    pub id: Option<String>,
    #[serde(default)]
    pub loaded: bool,
    #[serde(default)]
    pub retryin: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub birthdate: Option<String>,
    pub vaccination_date: Option<String>,
    #[serde(default)]
    pub doses: u32,
    #[serde(default)]
    pub status_indicator: String,
    pub qr_code: Option<EncodedMedia>,
    pub federal_vaccine_proof: Option<EncodedMedia>,
}

/// Who the status lookup is for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VaccineStatusQuery {
    Authenticated {
        hdid: String,
        include_federal_pvc: bool,
    },
    Public {
        phn: String,
        date_of_birth: NaiveDate,
        date_of_vaccine: NaiveDate,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticatedStatusRequest<'a> {
    hdid: &'a str,
    include_federal_pvc: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublicStatusRequest<'a> {
    phn: &'a str,
    date_of_birth: String,
    date_of_vaccine: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VaccineStatusDelegate: Send + Sync {
    async fn get_vaccine_status(
        &self,
        query: VaccineStatusQuery,
        access_token: &str,
    ) -> RequestResult<PhsaResult<PhsaVaccineStatus>>;
}

#[derive(Clone)]
pub struct RestVaccineStatusDelegate {
    client: reqwest::Client,
    base_url: String,
}

impl RestVaccineStatusDelegate {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl VaccineStatusDelegate for RestVaccineStatusDelegate {
    async fn get_vaccine_status(
        &self,
        query: VaccineStatusQuery,
        access_token: &str,
    ) -> RequestResult<PhsaResult<PhsaVaccineStatus>> {
        let request = match &query {
            VaccineStatusQuery::Authenticated {
                hdid,
                include_federal_pvc,
            } => self
                .client
                .post(format!(
                    "{}/api/v1/VaccineValidation/VaccineStatus",
                    self.base_url
                ))
                .json(&AuthenticatedStatusRequest {
                    hdid,
                    include_federal_pvc: *include_federal_pvc,
                }),
            VaccineStatusQuery::Public {
                phn,
                date_of_birth,
                date_of_vaccine,
            } => self
                .client
                .post(format!(
                    "{}/api/v1/Public/VaccineValidation/VaccineStatus",
                    self.base_url
                ))
                .json(&PublicStatusRequest {
                    phn,
                    date_of_birth: date_of_birth.format("%Y-%m-%d").to_string(),
                    date_of_vaccine: date_of_vaccine.format("%Y-%m-%d").to_string(),
                }),
        };

        phsa::send(request.bearer_auth(access_token), "vaccine status").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn public_lookup_posts_formatted_dates() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/Public/VaccineValidation/VaccineStatus")
                    .json_body(json!({
                        "phn": "9735353315",
                        "dateOfBirth": "1990-01-02",
                        "dateOfVaccine": "2021-07-01"
                    }));
                then.status(200).json_body(json!({
                    "result": {
                        "loaded": true,
                        "firstName": "JANE",
                        "lastName": "DOE",
                        "birthdate": "1990-01-02T00:00:00",
                        "doses": 2,
                        "statusIndicator": "AllDosesReceived",
                        "qrCode": {"mediaType": "image/png", "encoding": "base64", "data": "AAAA"}
                    },
                    "loadState": {"refreshInProgress": false}
                }));
            })
            .await;

        let delegate = RestVaccineStatusDelegate::new(reqwest::Client::new(), server.base_url());
        let result = delegate
            .get_vaccine_status(
                VaccineStatusQuery::Public {
                    phn: "9735353315".into(),
                    date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 2).unwrap(),
                    date_of_vaccine: NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(),
                },
                "system",
            )
            .await;

        mock.assert_async().await;
        let status = result.resource_payload.unwrap().result.unwrap();
        assert_eq!(status.status_indicator, "AllDosesReceived");
        assert_eq!(status.qr_code.unwrap().data, "AAAA");
    }

    #[tokio::test]
    async fn authenticated_lookup_posts_hdid() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/VaccineValidation/VaccineStatus")
                    .json_body(json!({"hdid": "HDID1", "includeFederalPvc": true}));
                then.status(200).json_body(json!({
                    "result": null,
                    "loadState": {"refreshInProgress": true, "backOffMilliseconds": 5000}
                }));
            })
            .await;

        let delegate = RestVaccineStatusDelegate::new(reqwest::Client::new(), server.base_url());
        let result = delegate
            .get_vaccine_status(
                VaccineStatusQuery::Authenticated {
                    hdid: "HDID1".into(),
                    include_federal_pvc: true,
                },
                "user",
            )
            .await;

        mock.assert_async().await;
        assert!(result.resource_payload.unwrap().refresh_in_progress());
    }
}
