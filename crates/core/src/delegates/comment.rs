//! User comment persistence.
//!
//! Comments are stored one document per comment under the owner's directory. Updates and deletes
//! compare the caller's `version` with the stored one.

use crate::constants::COMMENTS_COLLECTION;
use crate::error::{DbError, DbResult};
use crate::models::UserComment;
use crate::store::JsonStore;
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentDelegate: Send + Sync {
    async fn get_comments(&self, hdid: &str) -> DbResult<Vec<UserComment>>;

    async fn add_comment(&self, comment: UserComment) -> DbResult<UserComment>;

    /// Store new text for a comment, returning the stored record with its bumped version.
    async fn update_comment(
        &self,
        hdid: &str,
        id: Uuid,
        version: u32,
        text: String,
    ) -> DbResult<UserComment>;

    async fn delete_comment(&self, hdid: &str, id: Uuid, version: u32) -> DbResult<()>;
}

pub struct JsonCommentDelegate {
    store: Arc<JsonStore>,
}

impl JsonCommentDelegate {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    fn path(&self, hdid: &str, id: Uuid) -> PathBuf {
        self.store
            .owner_dir(COMMENTS_COLLECTION, hdid)
            .join(format!("{}.json", id.simple()))
    }
}

#[async_trait]
impl CommentDelegate for JsonCommentDelegate {
    async fn get_comments(&self, hdid: &str) -> DbResult<Vec<UserComment>> {
        let mut comments: Vec<UserComment> = self
            .store
            .list(&self.store.owner_dir(COMMENTS_COLLECTION, hdid))
            .await?;
        comments.sort_by_key(|c| c.created_date_time);
        Ok(comments)
    }

    async fn add_comment(&self, comment: UserComment) -> DbResult<UserComment> {
        let path = self.path(&comment.user_profile_id, comment.id);
        let _guard = self.store.lock().await;
        if self.store.read::<UserComment>(&path).await?.is_some() {
            return Err(DbError::AlreadyExists);
        }
        self.store.write(&path, &comment).await?;
        Ok(comment)
    }

    async fn update_comment(
        &self,
        hdid: &str,
        id: Uuid,
        version: u32,
        text: String,
    ) -> DbResult<UserComment> {
        let path = self.path(hdid, id);
        let _guard = self.store.lock().await;
        let mut stored = self
            .store
            .read::<UserComment>(&path)
            .await?
            .ok_or(DbError::NotFound)?;
        if stored.version != version {
            return Err(DbError::Concurrency);
        }
        stored.text = text;
        stored.updated_date_time = Utc::now();
        stored.version += 1;
        self.store.write(&path, &stored).await?;
        Ok(stored)
    }

    async fn delete_comment(&self, hdid: &str, id: Uuid, version: u32) -> DbResult<()> {
        let path = self.path(hdid, id);
        let _guard = self.store.lock().await;
        let stored = self
            .store
            .read::<UserComment>(&path)
            .await?
            .ok_or(DbError::NotFound)?;
        if stored.version != version {
            return Err(DbError::Concurrency);
        }
        self.store.remove(&path).await
    }
}
