//! User profile persistence.

use crate::constants::{PROFILES_COLLECTION, PROFILE_FILENAME};
use crate::error::{DbError, DbResult};
use crate::models::UserProfileModel;
use crate::store::JsonStore;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileDelegate: Send + Sync {
    async fn get_user_profile(&self, hdid: &str) -> DbResult<Option<UserProfileModel>>;

    /// Insert a new profile; fails with [`DbError::AlreadyExists`] if one is stored.
    async fn insert_user_profile(&self, profile: UserProfileModel) -> DbResult<()>;

    /// Replace an existing profile; fails with [`DbError::NotFound`] if none is stored.
    async fn update_user_profile(&self, profile: UserProfileModel) -> DbResult<()>;
}

pub struct JsonUserProfileDelegate {
    store: Arc<JsonStore>,
}

impl JsonUserProfileDelegate {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    fn path(&self, hdid: &str) -> PathBuf {
        self.store
            .owner_dir(PROFILES_COLLECTION, hdid)
            .join(PROFILE_FILENAME)
    }
}

#[async_trait]
impl UserProfileDelegate for JsonUserProfileDelegate {
    async fn get_user_profile(&self, hdid: &str) -> DbResult<Option<UserProfileModel>> {
        self.store.read(&self.path(hdid)).await
    }

    async fn insert_user_profile(&self, profile: UserProfileModel) -> DbResult<()> {
        let path = self.path(&profile.hdid);
        let _guard = self.store.lock().await;
        if self.store.read::<UserProfileModel>(&path).await?.is_some() {
            return Err(DbError::AlreadyExists);
        }
        self.store.write(&path, &profile).await
    }

    async fn update_user_profile(&self, profile: UserProfileModel) -> DbResult<()> {
        let path = self.path(&profile.hdid);
        let _guard = self.store.lock().await;
        if self.store.read::<UserProfileModel>(&path).await?.is_none() {
            return Err(DbError::NotFound);
        }
        self.store.write(&path, &profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(hdid: &str) -> UserProfileModel {
        let now = Utc::now();
        UserProfileModel {
            hdid: hdid.into(),
            accepted_terms_of_service: true,
            email: None,
            sms_number: None,
            created_date_time: now,
            last_login_date_time: now,
            closed_date_time: None,
            preferences: Default::default(),
        }
    }

    #[tokio::test]
    async fn insert_get_update() {
        let tmp = tempfile::tempdir().unwrap();
        let delegate = JsonUserProfileDelegate::new(Arc::new(JsonStore::open(tmp.path()).unwrap()));

        assert!(delegate.get_user_profile("H1").await.unwrap().is_none());
        assert!(matches!(
            delegate.update_user_profile(profile("H1")).await,
            Err(DbError::NotFound)
        ));

        delegate.insert_user_profile(profile("H1")).await.unwrap();
        assert!(matches!(
            delegate.insert_user_profile(profile("H1")).await,
            Err(DbError::AlreadyExists)
        ));

        let mut stored = delegate.get_user_profile("H1").await.unwrap().unwrap();
        stored.email = Some("a@b.ca".into());
        delegate.update_user_profile(stored).await.unwrap();
        assert_eq!(
            delegate.get_user_profile("H1").await.unwrap().unwrap().email.as_deref(),
            Some("a@b.ca")
        );
    }
}
