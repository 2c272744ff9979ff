//! BC Mail Plus vaccine proof delegate.
//!
//! Document generation is asynchronous upstream: a job is started, its status polled, and the
//! finished PDF downloaded. The polling loop lives in the service; this delegate performs single
//! calls.

use crate::models::VaccineProofTemplate;
use crate::request_result::{ErrorType, RequestResult, ServiceType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Upstream job state. Statuses other than `Completed` and `Error` mean the job is still running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum ProofJobStatus {
    Completed,
    Error,
    #[serde(other)]
    Started,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofJob {
    pub job_id: String,
    pub job_status: ProofJobStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineProofRequest {
    pub status_indicator: String,
    pub smart_health_card_qr: String,
    pub template: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VaccineProofDelegate: Send + Sync {
    async fn start_job(
        &self,
        template: VaccineProofTemplate,
        request: VaccineProofRequest,
    ) -> RequestResult<ProofJob>;

    async fn job_status(&self, job_id: &str) -> RequestResult<ProofJob>;

    async fn job_document(&self, job_id: &str) -> RequestResult<Vec<u8>>;
}

#[derive(Clone)]
pub struct BcMailPlusDelegate {
    client: reqwest::Client,
    base_url: String,
    job_class: String,
}

impl BcMailPlusDelegate {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        job_class: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            job_class: job_class.into(),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}/vaccineproof{}", self.base_url, self.job_class, suffix)
    }
}

fn checked(
    result: Result<reqwest::Response, reqwest::Error>,
    what: &str,
) -> Result<reqwest::Response, RequestResult<()>> {
    match result {
        Ok(response) if response.status().is_success() => Ok(response),
        Ok(response) => {
            tracing::error!("BC Mail Plus {} returned http status {}", what, response.status());
            Err(RequestResult::service_error(
                ErrorType::CommunicationExternal,
                ServiceType::BcMail,
                format!(
                    "BC Mail Plus returned HTTP status {} for {what}",
                    response.status().as_u16()
                ),
            ))
        }
        Err(e) => {
            tracing::error!("BC Mail Plus {} request failed: {}", what, e);
            Err(RequestResult::service_error(
                ErrorType::CommunicationExternal,
                ServiceType::BcMail,
                format!("Unable to connect to BC Mail Plus for {what}"),
            ))
        }
    }
}

async fn read_job(response: reqwest::Response) -> RequestResult<ProofJob> {
    match response.json::<ProofJob>().await {
        Ok(job) => RequestResult::success(job),
        Err(e) => {
            tracing::error!("unable to parse BC Mail Plus job: {}", e);
            RequestResult::service_error(
                ErrorType::CommunicationExternal,
                ServiceType::BcMail,
                "Unable to parse BC Mail Plus job response",
            )
        }
    }
}

#[async_trait]
impl VaccineProofDelegate for BcMailPlusDelegate {
    async fn start_job(
        &self,
        template: VaccineProofTemplate,
        request: VaccineProofRequest,
    ) -> RequestResult<ProofJob> {
        tracing::debug!("starting {} vaccine proof job", template.template_name());
        let sent = self.client.post(self.url("")).json(&request).send().await;
        match checked(sent, "job creation") {
            Ok(response) => read_job(response).await,
            Err(error) => error.propagate(),
        }
    }

    async fn job_status(&self, job_id: &str) -> RequestResult<ProofJob> {
        let sent = self
            .client
            .get(self.url(&format!("/{job_id}/status")))
            .send()
            .await;
        match checked(sent, "job status") {
            Ok(response) => read_job(response).await,
            Err(error) => error.propagate(),
        }
    }

    async fn job_document(&self, job_id: &str) -> RequestResult<Vec<u8>> {
        let sent = self
            .client
            .get(self.url(&format!("/{job_id}/document")))
            .send()
            .await;
        let response = match checked(sent, "job document") {
            Ok(response) => response,
            Err(error) => return error.propagate(),
        };
        match response.bytes().await {
            Ok(bytes) => RequestResult::success(bytes.to_vec()),
            Err(e) => {
                tracing::error!("unable to read BC Mail Plus document: {}", e);
                RequestResult::service_error(
                    ErrorType::CommunicationExternal,
                    ServiceType::BcMail,
                    "Unable to read BC Mail Plus document",
                )
            }
        }
    }
}
