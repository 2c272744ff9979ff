//! Personal journal notes.

use crate::constants::MAX_NOTE_TITLE_LENGTH;
use crate::delegates::NoteDelegate;
use crate::models::UserNote;
use crate::request_result::{ErrorType, RequestResult};
use chrono::{NaiveDate, Utc};
use gateway_types::NonEmptyText;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    pub text: String,
    pub journal_date: NaiveDate,
}

pub struct NoteService {
    delegate: Arc<dyn NoteDelegate>,
}

impl NoteService {
    pub fn new(delegate: Arc<dyn NoteDelegate>) -> Self {
        Self { delegate }
    }

    pub async fn get_notes(&self, hdid: &str) -> RequestResult<Vec<UserNote>> {
        match self.delegate.get_notes(hdid).await {
            Ok(notes) => {
                let count = notes.len();
                RequestResult::success_with_count(notes, count)
            }
            Err(e) => e.into(),
        }
    }

    pub async fn add_note(&self, hdid: &str, input: NoteInput) -> RequestResult<UserNote> {
        let title = match NonEmptyText::bounded(&input.title, MAX_NOTE_TITLE_LENGTH) {
            Ok(title) => title,
            Err(e) => return RequestResult::internal_error(ErrorType::InvalidState, e.to_string()),
        };
        let now = Utc::now();
        let note = UserNote {
            id: Uuid::new_v4(),
            hdid: hdid.to_string(),
            title: title.into_inner(),
            text: input.text,
            journal_date: input.journal_date,
            created_date_time: now,
            updated_date_time: now,
            version: 0,
        };
        match self.delegate.add_note(note).await {
            Ok(note) => RequestResult::success(note),
            Err(e) => e.into(),
        }
    }

    pub async fn update_note(
        &self,
        hdid: &str,
        id: Uuid,
        version: u32,
        input: NoteInput,
    ) -> RequestResult<UserNote> {
        let title = match NonEmptyText::bounded(&input.title, MAX_NOTE_TITLE_LENGTH) {
            Ok(title) => title,
            Err(e) => return RequestResult::internal_error(ErrorType::InvalidState, e.to_string()),
        };
        let now = Utc::now();
        let note = UserNote {
            id,
            hdid: hdid.to_string(),
            title: title.into_inner(),
            text: input.text,
            journal_date: input.journal_date,
            created_date_time: now,
            updated_date_time: now,
            version,
        };
        match self.delegate.update_note(note).await {
            Ok(note) => RequestResult::success(note),
            Err(e) => e.into(),
        }
    }

    pub async fn delete_note(&self, hdid: &str, id: Uuid, version: u32) -> RequestResult<()> {
        match self.delegate.delete_note(hdid, id, version).await {
            Ok(()) => RequestResult::success(()),
            Err(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegates::note::MockNoteDelegate;
    use crate::error::DbError;
    use crate::services::test_support::HDID;

    fn input(title: &str) -> NoteInput {
        NoteInput {
            title: title.into(),
            text: "body".into(),
            journal_date: NaiveDate::from_ymd_opt(2022, 2, 2).unwrap(),
        }
    }

    #[tokio::test]
    async fn title_is_required_and_bounded() {
        let mut delegate = MockNoteDelegate::new();
        delegate.expect_add_note().never();
        let service = NoteService::new(Arc::new(delegate));

        assert!(!service.add_note(HDID, input("")).await.is_success());
        assert!(!service
            .add_note(HDID, input(&"t".repeat(MAX_NOTE_TITLE_LENGTH + 1)))
            .await
            .is_success());
    }

    #[tokio::test]
    async fn update_passes_caller_version() {
        let id = Uuid::new_v4();
        let mut delegate = MockNoteDelegate::new();
        delegate
            .expect_update_note()
            .withf(move |n| n.id == id && n.version == 4 && n.hdid == HDID)
            .returning(|mut n| {
                n.version += 1;
                Ok(n)
            });
        let service = NoteService::new(Arc::new(delegate));

        let result = service.update_note(HDID, id, 4, input("Title")).await;
        assert_eq!(result.resource_payload.unwrap().version, 5);
    }

    #[tokio::test]
    async fn deleting_missing_note_is_not_found() {
        let mut delegate = MockNoteDelegate::new();
        delegate
            .expect_delete_note()
            .returning(|_, _, _| Err(DbError::NotFound));
        let service = NoteService::new(Arc::new(delegate));
        let result = service.delete_note(HDID, Uuid::new_v4(), 0).await;
        assert_eq!(result.result_error.unwrap().error_code, "DB-NOTFOUND");
    }
}
