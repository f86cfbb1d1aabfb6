//! JSON-backed profile store.
//!
//! The public operations never fail: read problems degrade to an empty
//! record, write problems to a `false` result, and both are logged. Every
//! read-modify-write of the table runs under an in-process mutex and an
//! exclusive lock file, so concurrent saves for different users cannot
//! overwrite each other.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde_json::{Map, Value};

use crate::config::{CachePolicy, StoreSettings};

use super::cache::ProfileCache;
use super::model::{Profile, UserId};
use super::table::{ProfileTable, RawTable, TableRead};

pub struct ProfileStore {
    table: ProfileTable,
    cache: ProfileCache,
    write_lock: Mutex<()>,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>, cache_policy: CachePolicy) -> Self {
        Self {
            table: ProfileTable::new(path),
            cache: ProfileCache::new(cache_policy),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens the store described by the install configuration, creating the
    /// table directory if needed.
    pub fn open(settings: &StoreSettings) -> Result<Self> {
        let path = settings.table_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed creating profile directory {:?}", parent))?;
        }
        tracing::debug!(path = %path.display(), "opening profile store");
        Ok(Self::new(path, settings.cache_policy))
    }

    pub fn path(&self) -> &Path {
        self.table.path()
    }

    pub fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    /// Returns the stored record, or an empty one when the user has none or
    /// the table cannot be read.
    pub fn load(&self, user_id: &UserId) -> Profile {
        if let Some(profile) = self.cache.get(user_id) {
            return profile;
        }
        match self.read_record(user_id) {
            Ok(profile) => {
                self.cache.fill(user_id, &profile);
                profile
            }
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %format!("{err:#}"), "profile load failed");
                Profile::default()
            }
        }
    }

    /// Merges the set fields of `record` into the stored record and stamps
    /// `updated_at`. Returns `false` (and logs) when the table cannot be
    /// written.
    pub fn save(&self, user_id: &UserId, record: &Profile) -> bool {
        match self.write_record(user_id, record) {
            Ok(merged) => {
                log_profile_save(user_id, &merged);
                true
            }
            Err(err) => {
                tracing::error!(user_id = %user_id, error = %format!("{err:#}"), "profile save failed");
                false
            }
        }
    }

    /// Removes the user's record. Returns `false` when there was nothing to
    /// remove or the table could not be rewritten.
    pub fn delete(&self, user_id: &UserId) -> bool {
        match self.remove_record(user_id) {
            Ok(removed) => {
                if removed {
                    tracing::info!(user_id = %user_id, "profile deleted");
                }
                removed
            }
            Err(err) => {
                tracing::error!(user_id = %user_id, error = %format!("{err:#}"), "profile delete failed");
                false
            }
        }
    }

    /// Snapshot of every readable record in the table.
    pub fn all(&self) -> BTreeMap<UserId, Profile> {
        let table = match self.table.read() {
            Ok(TableRead::Loaded(table)) => table,
            Ok(TableRead::Missing) => return BTreeMap::new(),
            Ok(TableRead::Corrupt(err)) => {
                tracing::error!(path = %self.path().display(), error = %err, "profile table is not valid JSON");
                return BTreeMap::new();
            }
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "failed loading all profiles");
                return BTreeMap::new();
            }
        };
        let mut profiles = BTreeMap::new();
        for (key, value) in table {
            match serde_json::from_value::<Profile>(value) {
                Ok(profile) => {
                    profiles.insert(UserId::new(key), profile);
                }
                Err(err) => {
                    tracing::warn!(user_id = %key, error = %err, "skipping unreadable profile record");
                }
            }
        }
        profiles
    }

    fn read_record(&self, user_id: &UserId) -> Result<Profile> {
        match self.table.read()? {
            TableRead::Missing => {
                tracing::info!(path = %self.path().display(), "profile table not found, it will be created on first save");
                Ok(Profile::default())
            }
            TableRead::Corrupt(err) => {
                tracing::error!(path = %self.path().display(), error = %err, "profile table is not valid JSON");
                Err(anyhow!(err).context("profile table is corrupt"))
            }
            TableRead::Loaded(mut table) => match table.remove(user_id.as_str()) {
                Some(value) => serde_json::from_value(value)
                    .with_context(|| format!("Failed parsing profile record for user {user_id}")),
                None => Ok(Profile::default()),
            },
        }
    }

    fn write_record(&self, user_id: &UserId, record: &Profile) -> Result<Profile> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _file_lock = self.table.lock()?;

        let mut table = self.read_table_for_write()?;
        let fields = match serde_json::to_value(record)? {
            Value::Object(fields) => fields,
            other => return Err(anyhow!("profile serialized to non-object {other}")),
        };

        let entry = table
            .entry(user_id.as_str().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            tracing::warn!(user_id = %user_id, "replacing non-object profile record");
            *entry = Value::Object(Map::new());
        }
        let stored = entry
            .as_object_mut()
            .context("profile record is not an object")?;
        for (key, value) in fields {
            stored.insert(key, value);
        }
        let now = Value::String(Utc::now().to_rfc3339());
        stored
            .entry("created_at")
            .or_insert_with(|| now.clone());
        stored.insert("updated_at".into(), now);
        let merged_value = Value::Object(stored.clone());

        self.table.write(&table)?;

        match serde_json::from_value::<Profile>(merged_value) {
            Ok(merged) => {
                self.cache.record_save(user_id, &merged);
                Ok(merged)
            }
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "saved profile could not be re-read, evicting cache entry");
                self.cache.evict(user_id);
                Ok(record.clone())
            }
        }
    }

    fn remove_record(&self, user_id: &UserId) -> Result<bool> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _file_lock = self.table.lock()?;

        self.cache.evict(user_id);
        let mut table = match self.table.read()? {
            TableRead::Missing => return Ok(false),
            TableRead::Loaded(table) => table,
            TableRead::Corrupt(err) => {
                return Err(anyhow!(err).context("refusing to delete from a corrupt profile table"))
            }
        };
        if table.remove(user_id.as_str()).is_none() {
            return Ok(false);
        }
        self.table.write(&table)?;
        Ok(true)
    }

    /// Current table contents for a save. A corrupt table counts as empty
    /// once its bytes have been moved aside.
    fn read_table_for_write(&self) -> Result<RawTable> {
        match self.table.read()? {
            TableRead::Missing => Ok(RawTable::new()),
            TableRead::Loaded(table) => Ok(table),
            TableRead::Corrupt(err) => {
                let moved = self.table.quarantine()?;
                tracing::error!(
                    error = %err,
                    moved_to = %moved.display(),
                    "profile table was not valid JSON, starting a new one"
                );
                Ok(RawTable::new())
            }
        }
    }
}

fn log_profile_save(user_id: &UserId, profile: &Profile) {
    tracing::info!(
        user_id = %user_id,
        name = profile.name.as_deref().unwrap_or("unknown"),
        age = %profile.age.map(|a| a.to_string()).unwrap_or_else(|| "??".into()),
        city = %profile.city.as_ref().map(|c| c.to_string()).unwrap_or_else(|| "unknown".into()),
        has_photo = profile.photo_ref.is_some(),
        "profile saved"
    );
}
