//! JSON documents on disk
//!
//! Each repository keeps one document in memory behind a lock and writes it
//! back whole. Writes go to a sibling temp file that is synced and renamed
//! over the target, so a crash leaves either the old or the new document.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;

use crate::error::{FinError, FinResult};

use super::lock_error;

/// Read a JSON document, or `T::default()` when the file is missing or empty
pub fn read_json<T, P>(path: P) -> FinResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let storage_err = |what: &str, e: &dyn std::fmt::Display| {
        FinError::Storage(format!("Failed to {} {}: {}", what, path.display(), e))
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(storage_err("open", &e)),
    };
    if file.metadata().map(|m| m.len() == 0).unwrap_or(false) {
        return Ok(T::default());
    }

    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_err("parse", &e))
}

/// Replace the file at `path` with `data` serialized as pretty JSON
pub fn write_json_atomic<T, P>(path: P, data: &T) -> FinResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FinError::Storage(format!("Failed to create directory {}: {}", parent.display(), e))
        })?;
    }

    let temp_path = path.with_extension("json.tmp");
    let result = write_synced(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path)
            .map_err(|e| FinError::Storage(format!("Failed to replace {}: {}", path.display(), e)))
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced<T: Serialize>(path: &Path, data: &T) -> FinResult<()> {
    let file = File::create(path)
        .map_err(|e| FinError::Storage(format!("Failed to create temp file: {}", e)))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| FinError::Storage(format!("Failed to serialize data: {}", e)))?;
    writer
        .flush()
        .map_err(|e| FinError::Storage(format!("Failed to flush data: {}", e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| FinError::Storage(format!("Failed to sync data: {}", e)))
}

/// One JSON document held in memory
pub struct JsonFile<T> {
    path: PathBuf,
    data: RwLock<T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(T::default()),
        }
    }

    /// Replace the in-memory document with the one on disk
    pub fn load(&self) -> FinResult<()> {
        let loaded: T = read_json(&self.path)?;
        *self.write()? = loaded;
        trace!(path = %self.path.display(), "document loaded");
        Ok(())
    }

    /// Write the in-memory document back to disk
    pub fn save(&self) -> FinResult<()> {
        let data = self.read()?;
        write_json_atomic(&self.path, &*data)
    }

    pub fn read(&self) -> FinResult<RwLockReadGuard<'_, T>> {
        self.data.read().map_err(lock_error)
    }

    pub fn write(&self) -> FinResult<RwLockWriteGuard<'_, T>> {
        self.data.write().map_err(lock_error)
    }
}
