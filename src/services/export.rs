//! Export service
//!
//! The system of record for submitted billing: accepts batches, keeps the
//! rendered flat-file lines and hands them out as a downloadable file.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, Utc};
use tracing::info;

use crate::audit::AuditEntry;
use crate::config::Settings;
use crate::error::{BillingError, BillingResult};
use crate::export::flat_file;
use crate::models::{BillingEntry, ExportedEntry};
use crate::services::billing::BatchSink;
use crate::storage::Storage;

/// A downloadable export with its suggested name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Service for the accumulated billing output
pub struct ExportService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> ExportService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Lines accumulated so far, oldest first
    pub fn fetch_exported_lines(&self) -> BillingResult<Vec<String>> {
        self.storage.export.lines()
    }

    /// The accumulated output as a file named for today
    pub fn request_export_file(&self) -> BillingResult<ExportFile> {
        self.export_file_for(Local::now().date_naive())
    }

    /// The accumulated output as a file named for the given date
    pub fn export_file_for(&self, date: NaiveDate) -> BillingResult<ExportFile> {
        let lines = self.fetch_exported_lines()?;
        Ok(ExportFile {
            filename: flat_file::file_name(&self.settings.export_file_stem, date),
            bytes: flat_file::to_bytes(&lines),
        })
    }

    /// Drop all accumulated output, returning how many lines were removed
    pub fn clear_exported_output(&self) -> BillingResult<usize> {
        let removed = self.storage.export.clear()?;

        self.storage
            .log_event(AuditEntry::clear(format!("{} line(s) removed", removed)))?;

        info!(removed, "export output cleared");
        Ok(removed)
    }
}

impl BatchSink for ExportService<'_> {
    /// Render every entry first so a bad entry rejects the whole batch
    fn submit_billing_batch(&self, entries: &[BillingEntry]) -> BillingResult<()> {
        let recipients: HashMap<_, _> = self
            .storage
            .recipients
            .get_all()?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        let submitted_at = Utc::now();
        let mut exported = Vec::with_capacity(entries.len());

        for entry in entries {
            if entry.is_empty() {
                continue;
            }
            if let Err(field_error) = entry.validate() {
                return Err(field_error.into());
            }

            let recipient = recipients
                .get(&entry.recipient_id)
                .ok_or_else(|| BillingError::UnknownRecipient(entry.recipient_id.to_string()))?;

            let line = flat_file::format_line(&self.settings.provider_prefix, recipient, entry)?;
            exported.push(ExportedEntry {
                entry: entry.clone(),
                line,
                submitted_at,
            });
        }

        if exported.is_empty() {
            return Ok(());
        }

        let count = exported.len();
        let batch_id = match exported.iter().map(|e| e.entry.date).min() {
            Some(first) => format!("batch-{}", first.format("%Y%m%d")),
            None => "batch".to_string(),
        };
        let batch: Vec<BillingEntry> = exported.iter().map(|e| e.entry.clone()).collect();

        self.storage.export.append(exported)?;

        self.storage.log_event(AuditEntry::submit(
            batch_id.clone(),
            &batch,
            format!("{} billing entr{} submitted", count, if count == 1 { "y" } else { "ies" }),
        ))?;

        info!(batch = %batch_id, entries = count, "billing batch exported");
        Ok(())
    }
}
