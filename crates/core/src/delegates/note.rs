//! User note persistence.

use crate::constants::NOTES_COLLECTION;
use crate::error::{DbError, DbResult};
use crate::models::UserNote;
use crate::store::JsonStore;
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteDelegate: Send + Sync {
    async fn get_notes(&self, hdid: &str) -> DbResult<Vec<UserNote>>;

    async fn add_note(&self, note: UserNote) -> DbResult<UserNote>;

    async fn update_note(&self, note: UserNote) -> DbResult<UserNote>;

    async fn delete_note(&self, hdid: &str, id: Uuid, version: u32) -> DbResult<()>;
}

pub struct JsonNoteDelegate {
    store: Arc<JsonStore>,
}

impl JsonNoteDelegate {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    fn path(&self, hdid: &str, id: Uuid) -> PathBuf {
        self.store
            .owner_dir(NOTES_COLLECTION, hdid)
            .join(format!("{}.json", id.simple()))
    }
}

#[async_trait]
impl NoteDelegate for JsonNoteDelegate {
    async fn get_notes(&self, hdid: &str) -> DbResult<Vec<UserNote>> {
        let mut notes: Vec<UserNote> = self
            .store
            .list(&self.store.owner_dir(NOTES_COLLECTION, hdid))
            .await?;
        notes.sort_by(|a, b| {
            b.journal_date
                .cmp(&a.journal_date)
                .then(b.created_date_time.cmp(&a.created_date_time))
        });
        Ok(notes)
    }

    async fn add_note(&self, note: UserNote) -> DbResult<UserNote> {
        let path = self.path(&note.hdid, note.id);
        let _guard = self.store.lock().await;
        if self.store.read::<UserNote>(&path).await?.is_some() {
            return Err(DbError::AlreadyExists);
        }
        self.store.write(&path, &note).await?;
        Ok(note)
    }

    async fn update_note(&self, note: UserNote) -> DbResult<UserNote> {
        let path = self.path(&note.hdid, note.id);
        let _guard = self.store.lock().await;
        let stored = self
            .store
            .read::<UserNote>(&path)
            .await?
            .ok_or(DbError::NotFound)?;
        if stored.version != note.version {
            return Err(DbError::Concurrency);
        }
        let updated = UserNote {
            created_date_time: stored.created_date_time,
            updated_date_time: Utc::now(),
            version: stored.version + 1,
            ..note
        };
        self.store.write(&path, &updated).await?;
        Ok(updated)
    }

    async fn delete_note(&self, hdid: &str, id: Uuid, version: u32) -> DbResult<()> {
        let path = self.path(hdid, id);
        let _guard = self.store.lock().await;
        let stored = self
            .store
            .read::<UserNote>(&path)
            .await?
            .ok_or(DbError::NotFound)?;
        if stored.version != version {
            return Err(DbError::Concurrency);
        }
        self.store.remove(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn note(title: &str, day: u32) -> UserNote {
        let now = Utc::now();
        UserNote {
            id: Uuid::new_v4(),
            hdid: "H1".into(),
            title: title.into(),
            text: String::new(),
            journal_date: NaiveDate::from_ymd_opt(2022, 3, day).unwrap(),
            created_date_time: now,
            updated_date_time: now,
            version: 0,
        }
    }

    #[tokio::test]
    async fn notes_are_listed_newest_journal_date_first() {
        let tmp = tempfile::tempdir().unwrap();
        let delegate = JsonNoteDelegate::new(Arc::new(JsonStore::open(tmp.path()).unwrap()));
        delegate.add_note(note("old", 1)).await.unwrap();
        delegate.add_note(note("new", 9)).await.unwrap();

        let titles: Vec<String> = delegate
            .get_notes("H1")
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn update_keeps_created_time_and_bumps_version() {
        let tmp = tempfile::tempdir().unwrap();
        let delegate = JsonNoteDelegate::new(Arc::new(JsonStore::open(tmp.path()).unwrap()));
        let added = delegate.add_note(note("a", 1)).await.unwrap();

        let mut edit = added.clone();
        edit.title = "b".into();
        edit.created_date_time = Utc::now() + chrono::Duration::days(1);
        let updated = delegate.update_note(edit).await.unwrap();

        assert_eq!(updated.title, "b");
        assert_eq!(updated.version, 1);
        assert_eq!(updated.created_date_time, added.created_date_time);
    }
}
