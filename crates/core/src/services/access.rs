//! Decides whether an authenticated caller may act on a patient's records.

use crate::delegates::ResourceDelegateDelegate;
use std::sync::Arc;

/// What the caller is trying to do with the subject's records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessScope {
    /// Profile, comments, notes and dependent management: the subject only.
    Owner,
    /// Read-only health data: the subject or a guardian with the subject registered as dependent.
    HealthData,
}

pub struct AuthorizationService {
    dependents: Arc<dyn ResourceDelegateDelegate>,
}

impl AuthorizationService {
    pub fn new(dependents: Arc<dyn ResourceDelegateDelegate>) -> Self {
        Self { dependents }
    }

    /// HDIDs compare exactly: store paths are keyed on the identifier as written.
    pub async fn can_access(&self, caller_hdid: &str, subject_hdid: &str, scope: AccessScope) -> bool {
        if caller_hdid == subject_hdid {
            return true;
        }
        if scope == AccessScope::Owner {
            return false;
        }
        match self.dependents.exists(caller_hdid, subject_hdid).await {
            Ok(registered) => registered,
            Err(e) => {
                tracing::warn!("unable to check dependent access: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegates::dependent::MockResourceDelegateDelegate;
    use crate::error::DbError;

    #[tokio::test]
    async fn owner_always_has_access() {
        let mut store = MockResourceDelegateDelegate::new();
        store.expect_exists().never();
        let auth = AuthorizationService::new(Arc::new(store));
        assert!(auth.can_access("ABC", "ABC", AccessScope::Owner).await);
    }

    #[tokio::test]
    async fn differently_cased_hdid_is_another_subject() {
        let mut store = MockResourceDelegateDelegate::new();
        store.expect_exists().returning(|_, _| Ok(false));
        let auth = AuthorizationService::new(Arc::new(store));
        assert!(!auth.can_access("ABC", "abc", AccessScope::Owner).await);
        assert!(!auth.can_access("ABC", "abc", AccessScope::HealthData).await);
    }

    #[tokio::test]
    async fn guardian_reads_health_data_only() {
        let mut store = MockResourceDelegateDelegate::new();
        store
            .expect_exists()
            .withf(|owner, dependent| owner == "PARENT" && dependent == "CHILD")
            .returning(|_, _| Ok(true));
        let auth = AuthorizationService::new(Arc::new(store));

        assert!(auth.can_access("PARENT", "CHILD", AccessScope::HealthData).await);
        assert!(!auth.can_access("PARENT", "CHILD", AccessScope::Owner).await);
    }

    #[tokio::test]
    async fn store_failure_denies_access() {
        let mut store = MockResourceDelegateDelegate::new();
        store
            .expect_exists()
            .returning(|_, _| Err(DbError::Io(std::io::Error::other("disk"))));
        let auth = AuthorizationService::new(Arc::new(store));
        assert!(!auth.can_access("A", "B", AccessScope::HealthData).await);
    }
}
