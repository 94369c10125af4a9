//! Backing files for the JSON repositories
//!
//! Each repository owns one `DataFile`. Reads tolerate a missing or blank
//! file. Writes go to a sibling `.partial` file that is synced and renamed
//! over the real one, so a failed write never truncates recorded data.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::{BillingError, BillingResult};

/// A repository's JSON file, named in every error it reports
#[derive(Debug, Clone)]
pub struct DataFile {
    name: &'static str,
    path: PathBuf,
}

impl DataFile {
    pub fn new(name: &'static str, path: PathBuf) -> Self {
        Self { name, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file; missing or blank means nothing recorded yet
    pub fn load<T>(&self) -> BillingResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(self.failure("read", e)),
        };

        if text.trim().is_empty() {
            return Ok(T::default());
        }

        serde_json::from_str(&text).map_err(|e| self.failure("parse", e))
    }

    /// Replace the file with `value`
    ///
    /// The value is serialized before anything on disk is touched.
    pub fn store<T: Serialize>(&self, value: &T) -> BillingResult<()> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| self.failure("encode", e))?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.failure("create the folder for", e))?;
        }

        let partial = self.partial_path();
        let written = File::create(&partial).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&partial, &self.path)) {
            let _ = fs::remove_file(&partial);
            return Err(self.failure("write", e));
        }

        debug!(file = self.name, bytes = bytes.len(), "data file stored");
        Ok(())
    }

    fn partial_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".partial");
        self.path.with_file_name(name)
    }

    fn failure(&self, action: &str, cause: impl std::fmt::Display) -> BillingError {
        BillingError::Storage(format!(
            "Could not {} the {} file {}: {}",
            action,
            self.name,
            self.path.display(),
            cause
        ))
    }
}
