//! Comments attached to timeline entries.

use crate::constants::MAX_COMMENT_LENGTH;
use crate::delegates::CommentDelegate;
use crate::models::{CommentEntryType, UserComment};
use crate::request_result::{ErrorType, RequestResult};
use chrono::Utc;
use gateway_types::NonEmptyText;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewComment {
    pub parent_entry_id: String,
    pub entry_type_code: CommentEntryType,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentEdit {
    pub id: Uuid,
    pub text: String,
    pub version: u32,
}

pub struct CommentService {
    delegate: Arc<dyn CommentDelegate>,
}

impl CommentService {
    pub fn new(delegate: Arc<dyn CommentDelegate>) -> Self {
        Self { delegate }
    }

    /// Comments on a single entry, oldest first.
    pub async fn get_entry_comments(
        &self,
        hdid: &str,
        parent_entry_id: &str,
    ) -> RequestResult<Vec<UserComment>> {
        match self.delegate.get_comments(hdid).await {
            Ok(comments) => {
                let comments: Vec<UserComment> = comments
                    .into_iter()
                    .filter(|c| c.parent_entry_id == parent_entry_id)
                    .collect();
                let count = comments.len();
                RequestResult::success_with_count(comments, count)
            }
            Err(e) => e.into(),
        }
    }

    /// Every comment the user has written, keyed by parent entry.
    pub async fn get_profile_comments(
        &self,
        hdid: &str,
    ) -> RequestResult<BTreeMap<String, Vec<UserComment>>> {
        match self.delegate.get_comments(hdid).await {
            Ok(comments) => {
                let count = comments.len();
                let mut grouped: BTreeMap<String, Vec<UserComment>> = BTreeMap::new();
                for comment in comments {
                    grouped
                        .entry(comment.parent_entry_id.clone())
                        .or_default()
                        .push(comment);
                }
                RequestResult::success_with_count(grouped, count)
            }
            Err(e) => e.into(),
        }
    }

    pub async fn add_comment(&self, hdid: &str, comment: NewComment) -> RequestResult<UserComment> {
        let text = match NonEmptyText::bounded(&comment.text, MAX_COMMENT_LENGTH) {
            Ok(text) => text,
            Err(e) => return RequestResult::internal_error(ErrorType::InvalidState, e.to_string()),
        };
        let parent_entry_id = match NonEmptyText::new(&comment.parent_entry_id) {
            Ok(id) => id,
            Err(_) => {
                return RequestResult::internal_error(
                    ErrorType::InvalidState,
                    "Comment must reference an entry",
                )
            }
        };

        let now = Utc::now();
        let stored = UserComment {
            id: Uuid::new_v4(),
            user_profile_id: hdid.to_string(),
            parent_entry_id: parent_entry_id.into_inner(),
            text: text.into_inner(),
            entry_type_code: comment.entry_type_code,
            created_date_time: now,
            updated_date_time: now,
            version: 0,
        };
        match self.delegate.add_comment(stored).await {
            Ok(comment) => RequestResult::success(comment),
            Err(e) => e.into(),
        }
    }

    pub async fn update_comment(&self, hdid: &str, edit: CommentEdit) -> RequestResult<UserComment> {
        let text = match NonEmptyText::bounded(&edit.text, MAX_COMMENT_LENGTH) {
            Ok(text) => text,
            Err(e) => return RequestResult::internal_error(ErrorType::InvalidState, e.to_string()),
        };
        match self
            .delegate
            .update_comment(hdid, edit.id, edit.version, text.into_inner())
            .await
        {
            Ok(comment) => RequestResult::success(comment),
            Err(e) => e.into(),
        }
    }

    pub async fn delete_comment(&self, hdid: &str, id: Uuid, version: u32) -> RequestResult<()> {
        match self.delegate.delete_comment(hdid, id, version).await {
            Ok(()) => RequestResult::success(()),
            Err(e) => e.into(),
        }
    }
}
