//! Vaccine proof documents.
//!
//! The federal proof ships inside the vaccine status payload. Provincial and combined proofs are
//! rendered by BC Mail Plus: a job is started and polled a bounded number of times before the
//! client is told to come back later.

use super::VaccineStatusService;
use crate::config::BcMailPlusConfig;
use crate::delegates::vaccine_proof::{ProofJob, ProofJobStatus, VaccineProofRequest};
use crate::delegates::VaccineProofDelegate;
use crate::models::{EncodedMedia, VaccineProofResponse, VaccineProofTemplate};
use crate::request_result::{ActionType, ErrorType, RequestResult, ServiceType};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use std::time::Duration;

const PDF_MEDIA_TYPE: &str = "application/pdf";

pub struct VaccineProofService {
    status: Arc<VaccineStatusService>,
    delegate: Arc<dyn VaccineProofDelegate>,
    max_attempts: u32,
    backoff: Duration,
}

impl VaccineProofService {
    pub fn new(
        status: Arc<VaccineStatusService>,
        delegate: Arc<dyn VaccineProofDelegate>,
        config: &BcMailPlusConfig,
    ) -> Self {
        Self {
            status,
            delegate,
            max_attempts: config.max_attempts,
            backoff: config.backoff,
        }
    }

    pub async fn get_vaccine_proof(
        &self,
        hdid: &str,
        template: VaccineProofTemplate,
        access_token: &str,
    ) -> RequestResult<VaccineProofResponse> {
        let status_result = self
            .status
            .get_authenticated_vaccine_status(hdid, true, access_token)
            .await;
        if !status_result.is_success() {
            return status_result.propagate();
        }
        let Some(status) = status_result.resource_payload else {
            return RequestResult::internal_error(
                ErrorType::InvalidState,
                "Vaccine status is unavailable",
            );
        };

        let qr_code = match &status.qr_code {
            Some(qr) if status.state.is_provable() => qr.data.clone(),
            _ => {
                tracing::info!("vaccine proof requested for a status without proof");
                return RequestResult::internal_error(
                    ErrorType::InvalidState,
                    "Vaccine status does not support a proof document",
                );
            }
        };

        if template == VaccineProofTemplate::Federal {
            if let Some(federal) = status.federal_vaccine_proof {
                return RequestResult::success(VaccineProofResponse {
                    id: status.id.unwrap_or_default(),
                    status: "Completed".into(),
                    document: Some(federal),
                });
            }
        }

        let request = VaccineProofRequest {
            status_indicator: status.state.indicator().into(),
            smart_health_card_qr: qr_code,
            template: template.template_name().into(),
        };
        let started = self.delegate.start_job(template, request).await;
        let Some(job) = started.resource_payload.clone().filter(|_| started.is_success()) else {
            return started.propagate();
        };

        self.poll(job).await
    }

    async fn poll(&self, mut job: ProofJob) -> RequestResult<VaccineProofResponse> {
        for attempt in 0..=self.max_attempts {
            match job.job_status {
                ProofJobStatus::Completed => return self.download(&job.job_id).await,
                ProofJobStatus::Error => {
                    tracing::error!("vaccine proof job {} failed", job.job_id);
                    return RequestResult::service_error(
                        ErrorType::JobFailed,
                        ServiceType::BcMail,
                        "Vaccine proof generation failed",
                    );
                }
                ProofJobStatus::Started => {}
            }
            if attempt == self.max_attempts {
                break;
            }

            tokio::time::sleep(self.backoff).await;
            let polled = self.delegate.job_status(&job.job_id).await;
            match polled.resource_payload.clone().filter(|_| polled.is_success()) {
                Some(next) => job = next,
                None => return polled.propagate(),
            }
        }

        tracing::info!(
            "vaccine proof job {} still running after {} polls",
            job.job_id,
            self.max_attempts
        );
        RequestResult::action_required(
            ActionType::Refresh,
            "Vaccine proof is still being generated",
            Some(VaccineProofResponse {
                id: job.job_id,
                status: "Started".into(),
                document: None,
            }),
        )
    }

    async fn download(&self, job_id: &str) -> RequestResult<VaccineProofResponse> {
        let document = self.delegate.job_document(job_id).await;
        if !document.is_success() {
            return document.propagate();
        }
        let bytes = document.resource_payload.unwrap_or_default();
        RequestResult::success(VaccineProofResponse {
            id: job_id.to_string(),
            status: "Completed".into(),
            document: Some(EncodedMedia {
                media_type: PDF_MEDIA_TYPE.into(),
                encoding: "base64".into(),
                data: STANDARD.encode(bytes),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegates::phsa::PhsaResult;
    use crate::delegates::vaccine_proof::MockVaccineProofDelegate;
    use crate::delegates::vaccine_status::{MockVaccineStatusDelegate, PhsaVaccineStatus};
    use crate::request_result::ResultType;
    use crate::services::test_support::HDID;

    fn media(data: &str) -> EncodedMedia {
        EncodedMedia {
            media_type: "image/png".into(),
            encoding: "base64".into(),
            data: data.into(),
        }
    }

    fn status_service(indicator: &'static str, federal: bool) -> Arc<VaccineStatusService> {
        let mut delegate = MockVaccineStatusDelegate::new();
        delegate.expect_get_vaccine_status().returning(move |_, _| {
            RequestResult::success(PhsaResult {
                result: Some(PhsaVaccineStatus {
                    id: Some("vs-1".into()),
                    loaded: true,
                    retryin: 0,
                    first_name: "Simone".into(),
                    last_name: "Powell".into(),
                    birthdate: None,
                    vaccination_date: None,
                    doses: 2,
                    status_indicator: indicator.into(),
                    qr_code: Some(media("qr")),
                    federal_vaccine_proof: federal.then(|| EncodedMedia {
                        media_type: PDF_MEDIA_TYPE.into(),
                        encoding: "base64".into(),
                        data: "federal".into(),
                    }),
                }),
                load_state: None,
            })
        });
        Arc::new(VaccineStatusService::new(Arc::new(delegate), None))
    }

    fn config(max_attempts: u32) -> BcMailPlusConfig {
        BcMailPlusConfig {
            base_url: "http://bcmail.local".into(),
            job_class: "HLTH-SHCS".into(),
            max_attempts,
            backoff: Duration::from_millis(1),
        }
    }

    fn job(status: ProofJobStatus) -> RequestResult<ProofJob> {
        RequestResult::success(ProofJob {
            job_id: "job-1".into(),
            job_status: status,
        })
    }

    #[tokio::test]
    async fn federal_template_uses_embedded_proof() {
        let mut delegate = MockVaccineProofDelegate::new();
        delegate.expect_start_job().never();
        let service =
            VaccineProofService::new(status_service("AllDosesReceived", true), Arc::new(delegate), &config(3));

        let result = service
            .get_vaccine_proof(HDID, VaccineProofTemplate::Federal, "t")
            .await;
        assert_eq!(result.resource_payload.unwrap().document.unwrap().data, "federal");
    }

    #[tokio::test]
    async fn polls_until_job_completes() {
        let mut delegate = MockVaccineProofDelegate::new();
        delegate
            .expect_start_job()
            .withf(|template, request| {
                *template == VaccineProofTemplate::Provincial
                    && request.template == "provincial"
                    && request.smart_health_card_qr == "qr"
                    && request.status_indicator == "PartialDosesReceived"
            })
            .returning(|_, _| job(ProofJobStatus::Started));
        let mut polls = 0;
        delegate.expect_job_status().times(2).returning(move |_| {
            polls += 1;
            job(if polls < 2 {
                ProofJobStatus::Started
            } else {
                ProofJobStatus::Completed
            })
        });
        delegate
            .expect_job_document()
            .returning(|_| RequestResult::success(b"%PDF".to_vec()));

        let service = VaccineProofService::new(
            status_service("PartialDosesReceived", false),
            Arc::new(delegate),
            &config(5),
        );
        let result = service
            .get_vaccine_proof(HDID, VaccineProofTemplate::Provincial, "t")
            .await;

        assert!(result.is_success());
        let document = result.resource_payload.unwrap().document.unwrap();
        assert_eq!(document.media_type, "application/pdf");
        assert_eq!(document.data, STANDARD.encode(b"%PDF"));
    }

    #[tokio::test]
    async fn exhausted_polling_asks_client_to_refresh() {
        let mut delegate = MockVaccineProofDelegate::new();
        delegate
            .expect_start_job()
            .returning(|_, _| job(ProofJobStatus::Started));
        delegate
            .expect_job_status()
            .times(2)
            .returning(|_| job(ProofJobStatus::Started));
        delegate.expect_job_document().never();

        let service = VaccineProofService::new(
            status_service("AllDosesReceived", false),
            Arc::new(delegate),
            &config(2),
        );
        let result = service
            .get_vaccine_proof(HDID, VaccineProofTemplate::Combined, "t")
            .await;

        assert_eq!(result.result_status, ResultType::ActionRequired);
        assert_eq!(
            result.result_error.unwrap().action_code,
            Some(ActionType::Refresh)
        );
        assert_eq!(result.resource_payload.unwrap().id, "job-1");
    }

    #[tokio::test]
    async fn failed_job_is_reported() {
        let mut delegate = MockVaccineProofDelegate::new();
        delegate
            .expect_start_job()
            .returning(|_, _| job(ProofJobStatus::Error));

        let service = VaccineProofService::new(
            status_service("AllDosesReceived", false),
            Arc::new(delegate),
            &config(2),
        );
        let result = service
            .get_vaccine_proof(HDID, VaccineProofTemplate::Provincial, "t")
            .await;
        assert_eq!(result.result_error.unwrap().error_code, "BCMP-JOBFAILED");
    }

    #[tokio::test]
    async fn unprovable_status_never_starts_a_job() {
        let mut delegate = MockVaccineProofDelegate::new();
        delegate.expect_start_job().never();

        let service = VaccineProofService::new(
            status_service("DataMismatch", false),
            Arc::new(delegate),
            &config(2),
        );
        let result = service
            .get_vaccine_proof(HDID, VaccineProofTemplate::Provincial, "t")
            .await;
        assert_eq!(
            result.result_error.unwrap().action_code,
            Some(ActionType::DataMismatch)
        );
    }
}
