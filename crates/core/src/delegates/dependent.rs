//! Dependent (resource delegate) link persistence.
//!
//! Each owner has a single `dependents.json` list of the HDIDs they may act for.

use crate::constants::{DEPENDENTS_COLLECTION, DEPENDENTS_FILENAME};
use crate::error::{DbError, DbResult};
use crate::models::ResourceDelegate;
use crate::store::JsonStore;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceDelegateDelegate: Send + Sync {
    async fn get_dependents(&self, owner_hdid: &str) -> DbResult<Vec<ResourceDelegate>>;

    async fn exists(&self, owner_hdid: &str, resource_owner_hdid: &str) -> DbResult<bool>;

    async fn add_dependent(&self, link: ResourceDelegate) -> DbResult<()>;

    async fn remove_dependent(&self, owner_hdid: &str, resource_owner_hdid: &str) -> DbResult<()>;
}

pub struct JsonResourceDelegateDelegate {
    store: Arc<JsonStore>,
}

impl JsonResourceDelegateDelegate {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    fn path(&self, owner_hdid: &str) -> PathBuf {
        self.store
            .owner_dir(DEPENDENTS_COLLECTION, owner_hdid)
            .join(DEPENDENTS_FILENAME)
    }

    async fn load(&self, owner_hdid: &str) -> DbResult<Vec<ResourceDelegate>> {
        Ok(self
            .store
            .read(&self.path(owner_hdid))
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl ResourceDelegateDelegate for JsonResourceDelegateDelegate {
    async fn get_dependents(&self, owner_hdid: &str) -> DbResult<Vec<ResourceDelegate>> {
        self.load(owner_hdid).await
    }

    async fn exists(&self, owner_hdid: &str, resource_owner_hdid: &str) -> DbResult<bool> {
        Ok(self
            .load(owner_hdid)
            .await?
            .iter()
            .any(|d| d.resource_owner_hdid == resource_owner_hdid))
    }

    async fn add_dependent(&self, link: ResourceDelegate) -> DbResult<()> {
        let _guard = self.store.lock().await;
        let mut links = self.load(&link.owner_hdid).await?;
        if links
            .iter()
            .any(|d| d.resource_owner_hdid == link.resource_owner_hdid)
        {
            return Err(DbError::AlreadyExists);
        }
        let path = self.path(&link.owner_hdid);
        links.push(link);
        self.store.write(&path, &links).await
    }

    async fn remove_dependent(&self, owner_hdid: &str, resource_owner_hdid: &str) -> DbResult<()> {
        let _guard = self.store.lock().await;
        let mut links = self.load(owner_hdid).await?;
        let before = links.len();
        links.retain(|d| d.resource_owner_hdid != resource_owner_hdid);
        if links.len() == before {
            return Err(DbError::NotFound);
        }
        self.store.write(&self.path(owner_hdid), &links).await
    }
}
