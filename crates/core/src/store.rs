//! Sharded JSON document store backing the profile, comment, note and dependent delegates.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//!   <collection>/
//!     <s1>/
//!       <s2>/
//!         <sha256(hdid)>/
//!           profile.json | dependents.json | <uuid>.json ...
//! ```
//!
//! `s1` and `s2` are the first four hex characters of the digest. Hashing the HDID keeps
//! directory names fixed-width and avoids putting patient identifiers on disk in clear text.
//!
//! Read-modify-write sequences must hold [`JsonStore::lock`] so concurrent requests for the same
//! owner cannot lose updates.

use crate::error::{DbError, DbResult};
use crate::{GatewayError, GatewayResult};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> GatewayResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(GatewayError::StorageDirCreation)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Returns `<root>/<collection>/<s1>/<s2>/<digest>/` for the given owner.
    pub fn owner_dir(&self, collection: &str, owner: &str) -> PathBuf {
        let digest = hex::encode(Sha256::digest(owner.as_bytes()));
        let s1 = &digest[0..2];
        let s2 = &digest[2..4];
        self.root.join(collection).join(s1).join(s2).join(&digest)
    }

    /// Serialise writers.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Read a document, returning `None` when it does not exist.
    pub async fn read<T: DeserializeOwned>(&self, path: &Path) -> DbResult<Option<T>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DbError::Io(e)),
        }
    }

    /// Write a document atomically (temp file then rename).
    pub async fn write<T: Serialize>(&self, path: &Path, value: &T) -> DbResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Remove a document. Missing documents are reported as [`DbError::NotFound`].
    pub async fn remove(&self, path: &Path) -> DbResult<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DbError::NotFound),
            Err(e) => Err(DbError::Io(e)),
        }
    }

    /// Read every `*.json` document directly under `dir`.
    pub async fn list<T: DeserializeOwned>(&self, dir: &Path) -> DbResult<Vec<T>> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DbError::Io(e)),
        };

        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(item) = self.read(&path).await? {
                items.push(item);
            }
        }
        Ok(items)
    }
}
