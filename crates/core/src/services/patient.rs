//! Patient demographics lookups.

use crate::cache::{self, CacheProvider};
use crate::delegates::ClientRegistryDelegate;
use crate::models::{PatientIdentifierType, PatientModel};
use crate::request_result::{ActionType, ErrorType, RequestResult, ServiceType};
use gateway_types::Phn;
use std::sync::Arc;

pub struct PatientService {
    delegate: Arc<dyn ClientRegistryDelegate>,
    cache: Arc<dyn CacheProvider>,
}

impl PatientService {
    pub fn new(delegate: Arc<dyn ClientRegistryDelegate>, cache: Arc<dyn CacheProvider>) -> Self {
        Self { delegate, cache }
    }

    /// HDIDs are matched case-insensitively by the registry, so one patient shares one entry.
    fn cache_key(identifier_type: PatientIdentifierType, identifier: &str) -> String {
        format!(
            "patient:{}:{}",
            identifier_type.as_str(),
            identifier.to_ascii_uppercase()
        )
    }

    /// Fetch demographics, serving repeat lookups from the cache.
    ///
    /// PHNs are normalised before they reach the registry or the cache. Deceased patients are
    /// reported as an error so callers never act on their behalf.
    pub async fn get_patient(
        &self,
        identifier: &str,
        identifier_type: PatientIdentifierType,
        disable_id_validation: bool,
    ) -> RequestResult<PatientModel> {
        let identifier = match identifier_type {
            PatientIdentifierType::Phn => match Phn::parse(identifier) {
                Ok(phn) => phn.as_str().to_string(),
                Err(_) => {
                    tracing::debug!("rejecting malformed PHN lookup");
                    return RequestResult::action_required(
                        ActionType::Validation,
                        "Personal health number is not valid",
                        None,
                    );
                }
            },
            PatientIdentifierType::Hdid => identifier.trim().to_string(),
        };

        let key = Self::cache_key(identifier_type, &identifier);
        if let Some(patient) = cache::get_typed::<PatientModel>(self.cache.as_ref(), &key).await {
            tracing::debug!("patient cache hit");
            return RequestResult::success(patient);
        }

        let result = self
            .delegate
            .get_demographics(identifier_type, &identifier, disable_id_validation)
            .await;

        let is_deceased = match result.resource_payload.as_ref().map(|p| p.is_deceased) {
            Some(is_deceased) if result.is_success() => is_deceased,
            _ => return result,
        };

        if is_deceased {
            tracing::info!("client registry reports patient as deceased");
            return RequestResult::service_error(
                ErrorType::ClientRegistryPatientDeceased,
                ServiceType::ClientRegistries,
                "Patient is deceased",
            );
        }

        if let Some(patient) = &result.resource_payload {
            cache::add_typed(self.cache.as_ref(), key, patient).await;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheProvider;
    use crate::delegates::client_registry::MockClientRegistryDelegate;
    use crate::request_result::ResultType;
    use crate::services::test_support::{born_years_ago, patient, HDID, PHN};
    use std::time::Duration;

    fn service(delegate: MockClientRegistryDelegate) -> PatientService {
        PatientService::new(
            Arc::new(delegate),
            Arc::new(MemoryCacheProvider::new(Duration::from_secs(60), 100)),
        )
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let mut delegate = MockClientRegistryDelegate::new();
        delegate
            .expect_get_demographics()
            .withf(|t, id, disable| *t == PatientIdentifierType::Hdid && id == HDID && !*disable)
            .times(1)
            .returning(|_, _, _| RequestResult::success(patient(HDID, PHN, born_years_ago(30))));
        let service = service(delegate);

        let first = service.get_patient(HDID, PatientIdentifierType::Hdid, false).await;
        let second = service.get_patient(HDID, PatientIdentifierType::Hdid, false).await;

        assert!(first.is_success());
        assert_eq!(second.resource_payload.unwrap().phn, PHN);
    }

    #[tokio::test]
    async fn malformed_phn_never_reaches_registry() {
        let mut delegate = MockClientRegistryDelegate::new();
        delegate.expect_get_demographics().never();
        let result = service(delegate)
            .get_patient("9735353316", PatientIdentifierType::Phn, false)
            .await;

        assert_eq!(result.result_status, ResultType::ActionRequired);
        assert_eq!(
            result.result_error.unwrap().action_code,
            Some(ActionType::Validation)
        );
    }

    #[tokio::test]
    async fn spaced_phn_is_normalised_before_lookup() {
        let mut delegate = MockClientRegistryDelegate::new();
        delegate
            .expect_get_demographics()
            .withf(|t, id, _| *t == PatientIdentifierType::Phn && id == PHN)
            .times(1)
            .returning(|_, _, _| RequestResult::success(patient(HDID, PHN, born_years_ago(30))));
        let service = service(delegate);

        let spaced = service
            .get_patient("9735 353 315", PatientIdentifierType::Phn, false)
            .await;
        let compact = service.get_patient(PHN, PatientIdentifierType::Phn, false).await;

        assert!(spaced.is_success());
        assert_eq!(compact.resource_payload.unwrap().hdid, HDID);
    }

    #[tokio::test]
    async fn hdid_cache_entry_ignores_case() {
        let mut delegate = MockClientRegistryDelegate::new();
        delegate
            .expect_get_demographics()
            .times(1)
            .returning(|_, _, _| RequestResult::success(patient(HDID, PHN, born_years_ago(30))));
        let service = service(delegate);

        let upper = service.get_patient(HDID, PatientIdentifierType::Hdid, false).await;
        let lower = service
            .get_patient(&HDID.to_ascii_lowercase(), PatientIdentifierType::Hdid, false)
            .await;

        assert!(upper.is_success());
        assert!(lower.is_success());
    }

    #[tokio::test]
    async fn deceased_patient_is_an_error_and_not_cached() {
        let mut delegate = MockClientRegistryDelegate::new();
        delegate.expect_get_demographics().times(2).returning(|_, _, _| {
            let mut p = patient(HDID, PHN, born_years_ago(80));
            p.is_deceased = true;
            RequestResult::success(p)
        });
        let service = service(delegate);

        for _ in 0..2 {
            let result = service.get_patient(PHN, PatientIdentifierType::Phn, false).await;
            assert_eq!(
                result.result_error.unwrap().error_code,
                "CLREG-CLREGDECEASED"
            );
        }
    }

    #[tokio::test]
    async fn registry_errors_pass_through() {
        let mut delegate = MockClientRegistryDelegate::new();
        delegate.expect_get_demographics().returning(|_, _, _| {
            RequestResult::service_error(
                ErrorType::ClientRegistryRecordsNotFound,
                ServiceType::ClientRegistries,
                "not found",
            )
        });
        let result = service(delegate)
            .get_patient(HDID, PatientIdentifierType::Hdid, false)
            .await;
        assert_eq!(result.result_error.unwrap().error_code, "CLREG-CLREGNOTFOUND");
    }
}
