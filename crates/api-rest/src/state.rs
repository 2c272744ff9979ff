use api_shared::TokenValidator;
use gateway_core::cache::MemoryCacheProvider;
use gateway_core::delegates::{
    BcMailPlusDelegate, JsonCommentDelegate, JsonNoteDelegate, JsonResourceDelegateDelegate,
    JsonUserProfileDelegate, RestImmunizationDelegate, RestVaccineStatusDelegate,
    SoapClientRegistryDelegate,
};
use gateway_core::services::{
    AuthorizationService, CommentService, DependentService, ImmunizationService, NoteService,
    PatientService, UserProfileService, VaccineProofService, VaccineStatusService,
};
use gateway_core::store::JsonStore;
use gateway_core::{GatewayConfig, GatewayResult};
use std::sync::Arc;

const PATIENT_CACHE_CAPACITY: u64 = 10_000;

/// Application state shared across REST handlers.
///
/// Every service is built once from [`GatewayConfig`] and shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenValidator>,
    pub authorization: Arc<AuthorizationService>,
    pub patients: Arc<PatientService>,
    pub immunizations: Arc<ImmunizationService>,
    pub vaccine_status: Arc<VaccineStatusService>,
    pub vaccine_proof: Arc<VaccineProofService>,
    pub user_profiles: Arc<UserProfileService>,
    pub comments: Arc<CommentService>,
    pub notes: Arc<NoteService>,
    pub dependents: Arc<DependentService>,
}

impl AppState {
    /// Wire delegates and services from the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the HTTP client cannot be built or the data directory cannot be
    /// created.
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = config.http_client()?;
        let store = Arc::new(JsonStore::open(config.data_dir())?);
        let phsa = config.phsa();

        let registry = Arc::new(SoapClientRegistryDelegate::new(
            client.clone(),
            config.client_registry().endpoint.clone(),
        ));
        let cache = Arc::new(MemoryCacheProvider::new(
            config.patient_cache_ttl(),
            PATIENT_CACHE_CAPACITY,
        ));
        let patients = Arc::new(PatientService::new(registry, cache));

        let links = Arc::new(JsonResourceDelegateDelegate::new(store.clone()));

        let vaccine_status = Arc::new(VaccineStatusService::new(
            Arc::new(RestVaccineStatusDelegate::new(client.clone(), phsa.base_url.clone())),
            phsa.system_token.clone(),
        ));
        let vaccine_proof = Arc::new(VaccineProofService::new(
            vaccine_status.clone(),
            Arc::new(BcMailPlusDelegate::new(
                client.clone(),
                config.bc_mail_plus().base_url.clone(),
                config.bc_mail_plus().job_class.clone(),
            )),
            config.bc_mail_plus(),
        ));

        Ok(Self {
            tokens: Arc::new(TokenValidator::new(
                &config.auth().jwt_secret,
                &config.auth().audience,
            )),
            authorization: Arc::new(AuthorizationService::new(links.clone())),
            immunizations: Arc::new(ImmunizationService::new(Arc::new(
                RestImmunizationDelegate::new(client, phsa.base_url.clone(), phsa.immunization_limit),
            ))),
            vaccine_status,
            vaccine_proof,
            user_profiles: Arc::new(UserProfileService::new(
                Arc::new(JsonUserProfileDelegate::new(store.clone())),
                patients.clone(),
                config.min_patient_age(),
            )),
            comments: Arc::new(CommentService::new(Arc::new(JsonCommentDelegate::new(
                store.clone(),
            )))),
            notes: Arc::new(NoteService::new(Arc::new(JsonNoteDelegate::new(store)))),
            dependents: Arc::new(DependentService::new(
                links,
                patients.clone(),
                config.max_dependent_age(),
            )),
            patients,
        })
    }
}
