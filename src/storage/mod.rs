//! Storage layer for medicaid-billing
//!
//! JSON file storage with atomic writes, plus the audit log every mutation
//! is recorded in.

pub mod data_file;
pub mod export;
pub mod init;
pub mod recipients;
pub mod schedules;

pub use export::ExportRepository;
pub use init::initialize_storage;
pub use recipients::RecipientRepository;
pub use schedules::ScheduleRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLog, EntityType};
use crate::config::paths::BillingPaths;
use crate::error::BillingError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BillingPaths,
    audit: AuditLog,
    pub recipients: RecipientRepository,
    pub schedules: ScheduleRepository,
    pub export: ExportRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BillingPaths) -> Result<Self, BillingError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLog::new(paths.audit_log()),
            recipients: RecipientRepository::new(paths.recipients_file()),
            schedules: ScheduleRepository::new(paths.schedules_file()),
            export: ExportRepository::new(paths.export_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &BillingPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), BillingError> {
        self.recipients.load()?;
        self.schedules.load()?;
        self.export.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), BillingError> {
        self.recipients.save()?;
        self.schedules.save()?;
        self.export.save()?;
        Ok(())
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BillingError> {
        self.audit
            .record(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BillingError> {
        self.audit
            .record(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Record any other prepared entry (submissions, clears)
    pub fn log_event(&self, entry: AuditEntry) -> Result<(), BillingError> {
        self.audit.record(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recipient;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillingPaths::with_base_dir(temp_dir.path().to_path_buf());
        let _storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
    }

    #[test]
    fn test_save_all_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillingPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();

        storage
            .recipients
            .upsert(Recipient::new("Doe", "Jane", "123456789012"))
            .unwrap();
        storage.save_all().unwrap();

        let mut reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.recipients.count().unwrap(), 1);
    }

    #[test]
    fn test_log_create_writes_audit() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillingPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let recipient = Recipient::new("Doe", "Jane", "123456789012");
        storage
            .log_create(
                EntityType::Recipient,
                recipient.id.to_string(),
                Some(recipient.to_string()),
                &recipient,
            )
            .unwrap();

        assert_eq!(storage.audit().entries().unwrap().len(), 1);
    }
}
