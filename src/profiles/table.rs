//! Filesystem access to the single JSON profile table.
//!
//! The table is one JSON object keyed by user id. Records are kept as raw
//! JSON objects here so keys this crate does not model survive a rewrite.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use fs2::FileExt;
use serde_json::{Map, Value};

pub type RawTable = Map<String, Value>;

/// Outcome of reading the table file.
#[derive(Debug)]
pub enum TableRead {
    /// No file yet (or an empty one).
    Missing,
    Loaded(RawTable),
    /// The file exists but is not a JSON object.
    Corrupt(serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ProfileTable {
    path: PathBuf,
}

impl ProfileTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the table. Only I/O failures are returned as errors.
    pub fn read(&self) -> Result<TableRead> {
        if !self.path.exists() {
            return Ok(TableRead::Missing);
        }
        let data = fs::read(&self.path)
            .with_context(|| format!("Failed reading profile table {:?}", self.path))?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(TableRead::Missing);
        }
        match serde_json::from_slice::<RawTable>(&data) {
            Ok(table) => Ok(TableRead::Loaded(table)),
            Err(err) => Ok(TableRead::Corrupt(err)),
        }
    }

    /// Writes the whole table through a temp file and an atomic rename.
    pub fn write(&self, table: &RawTable) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed creating table directory {:?}", parent))?;
        }
        let payload = serde_json::to_vec_pretty(table)
            .with_context(|| format!("Failed serializing profile table {:?}", self.path))?;
        let tmp_path = self.sibling(".tmp");
        let mut tmp = File::create(&tmp_path)
            .with_context(|| format!("Failed opening temp table {:?}", tmp_path))?;
        tmp.write_all(&payload)?;
        tmp.sync_all()?;
        drop(tmp);
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed replacing profile table {:?}", self.path))?;
        Ok(())
    }

    /// Takes the exclusive advisory lock guarding read-modify-write cycles.
    ///
    /// The lock file is left on disk so every locker shares the same inode.
    pub fn lock(&self) -> Result<TableLock> {
        let lock_path = self.sibling(".lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed opening lock file {:?}", lock_path))?;
        FileExt::lock_exclusive(&file)
            .with_context(|| format!("Failed locking {:?}", lock_path))?;
        Ok(TableLock { file })
    }

    /// Moves an unparsable table aside so a rewrite does not destroy it.
    pub fn quarantine(&self) -> Result<PathBuf> {
        let suffix = format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3f"));
        let target = self.sibling(&suffix);
        fs::rename(&self.path, &target)
            .with_context(|| format!("Failed moving corrupt table to {:?}", target))?;
        Ok(target)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

/// Held for the duration of a read-modify-write; unlocks on drop.
pub struct TableLock {
    file: File,
}

impl Drop for TableLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
