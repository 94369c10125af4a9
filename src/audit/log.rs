//! The audit log file
//!
//! One `AuditEntry` per line as JSON. Lines are only ever appended; a line
//! cut short by an interrupted write is skipped when reading back.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use tracing::warn;

use crate::error::{BillingError, BillingResult};

use super::entry::AuditEntry;

/// Append-only JSONL record of every mutation
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one entry
    ///
    /// The entry is encoded first and written with a single call, so a
    /// reader never sees half of a well-formed line.
    pub fn record(&self, entry: &AuditEntry) -> BillingResult<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(&line))
            .map_err(|e| {
                BillingError::Io(format!(
                    "Could not append to audit log {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }

    /// Every entry, oldest first
    pub fn entries(&self) -> BillingResult<Vec<AuditEntry>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(BillingError::Io(format!(
                    "Could not read audit log {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let complete = text.ends_with('\n');
        let lines: Vec<&str> = text.lines().collect();
        let mut entries = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(_) if !complete && index + 1 == lines.len() => {
                    warn!(line = index + 1, "skipping unfinished audit log line");
                }
                Err(e) => {
                    return Err(BillingError::Json(format!(
                        "Audit log line {} is not a valid entry: {}",
                        index + 1,
                        e
                    )))
                }
            }
        }

        Ok(entries)
    }
}
