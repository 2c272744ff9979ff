//! User profile lifecycle: registration, login tracking, close/recover and preferences.

use super::PatientService;
use crate::delegates::UserProfileDelegate;
use crate::error::{DbError, DbResult};
use crate::models::{PatientIdentifierType, UserProfileModel};
use crate::request_result::{ErrorType, RequestResult};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registration details supplied by the client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateUserProfile {
    pub accepted_terms_of_service: bool,
    pub email: Option<String>,
    pub sms_number: Option<String>,
}

pub struct UserProfileService {
    profiles: Arc<dyn UserProfileDelegate>,
    patients: Arc<PatientService>,
    min_patient_age: u32,
}

impl UserProfileService {
    pub fn new(
        profiles: Arc<dyn UserProfileDelegate>,
        patients: Arc<PatientService>,
        min_patient_age: u32,
    ) -> Self {
        Self {
            profiles,
            patients,
            min_patient_age,
        }
    }

    async fn load(&self, hdid: &str) -> DbResult<UserProfileModel> {
        self.profiles
            .get_user_profile(hdid)
            .await?
            .ok_or(DbError::NotFound)
    }

    /// Returns the profile and records the login. An unregistered user gets an empty success.
    pub async fn get_user_profile(&self, hdid: &str) -> RequestResult<UserProfileModel> {
        let mut profile = match self.profiles.get_user_profile(hdid).await {
            Ok(Some(profile)) => profile,
            Ok(None) => return RequestResult::empty(),
            Err(e) => return e.into(),
        };

        profile.last_login_date_time = Utc::now();
        match self.profiles.update_user_profile(profile.clone()).await {
            Ok(()) => RequestResult::success(profile),
            Err(e) => e.into(),
        }
    }

    pub async fn create_user_profile(
        &self,
        hdid: &str,
        request: CreateUserProfile,
    ) -> RequestResult<UserProfileModel> {
        if !request.accepted_terms_of_service {
            return RequestResult::internal_error(
                ErrorType::InvalidState,
                "Terms of service must be accepted",
            );
        }

        let patient = self
            .patients
            .get_patient(hdid, PatientIdentifierType::Hdid, false)
            .await;
        let Some(patient) = patient.resource_payload.clone().filter(|_| patient.is_success()) else {
            return patient.propagate();
        };

        match patient.age_on(Utc::now().date_naive()) {
            Some(age) if age >= self.min_patient_age => {}
            _ => {
                tracing::info!("registration refused: patient below minimum age");
                return RequestResult::internal_error(
                    ErrorType::InvalidState,
                    format!("Patient must be at least {} years old", self.min_patient_age),
                );
            }
        }

        let now = Utc::now();
        let profile = UserProfileModel {
            hdid: hdid.to_string(),
            accepted_terms_of_service: true,
            email: non_blank(request.email),
            sms_number: non_blank(request.sms_number),
            created_date_time: now,
            last_login_date_time: now,
            closed_date_time: None,
            preferences: BTreeMap::new(),
        };

        match self.profiles.insert_user_profile(profile.clone()).await {
            Ok(()) => {
                tracing::info!("user profile created");
                RequestResult::success(profile)
            }
            Err(e) => e.into(),
        }
    }

    /// Mark the profile closed. Closing an already closed profile is a no-op.
    pub async fn close_user_profile(&self, hdid: &str) -> RequestResult<UserProfileModel> {
        self.set_closed(hdid, true).await
    }

    pub async fn recover_user_profile(&self, hdid: &str) -> RequestResult<UserProfileModel> {
        self.set_closed(hdid, false).await
    }

    async fn set_closed(&self, hdid: &str, closed: bool) -> RequestResult<UserProfileModel> {
        let mut profile = match self.load(hdid).await {
            Ok(profile) => profile,
            Err(e) => return e.into(),
        };
        if profile.is_closed() == closed {
            return RequestResult::success(profile);
        }

        profile.closed_date_time = closed.then(Utc::now);
        match self.profiles.update_user_profile(profile.clone()).await {
            Ok(()) => RequestResult::success(profile),
            Err(e) => e.into(),
        }
    }

    pub async fn get_preferences(&self, hdid: &str) -> RequestResult<BTreeMap<String, String>> {
        match self.load(hdid).await {
            Ok(profile) => RequestResult::success(profile.preferences),
            Err(e) => e.into(),
        }
    }

    /// Merge `preferences` into the stored set and return the result.
    pub async fn update_preferences(
        &self,
        hdid: &str,
        preferences: BTreeMap<String, String>,
    ) -> RequestResult<BTreeMap<String, String>> {
        let mut profile = match self.load(hdid).await {
            Ok(profile) => profile,
            Err(e) => return e.into(),
        };
        profile.preferences.extend(preferences);

        let updated = profile.preferences.clone();
        match self.profiles.update_user_profile(profile).await {
            Ok(()) => RequestResult::success(updated),
            Err(e) => e.into(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
