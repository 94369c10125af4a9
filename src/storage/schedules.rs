//! Schedule repository for JSON storage
//!
//! Manages loading and saving schedule entries to schedules.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BillingError;
use crate::models::{RecipientId, ScheduleEntry, ScheduleId, UnitKey};

use super::data_file::DataFile;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ScheduleData {
    schedules: Vec<ScheduleEntry>,
}

/// Repository for schedule persistence
pub struct ScheduleRepository {
    file: DataFile,
    data: RwLock<HashMap<ScheduleId, ScheduleEntry>>,
}

impl ScheduleRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: DataFile::new("schedules", path),
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load schedules from disk
    pub fn load(&self) -> Result<(), BillingError> {
        let file_data: ScheduleData = self.file.load()?;

        let mut data = self.data.write().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for entry in file_data.schedules {
            data.insert(entry.id, entry);
        }

        Ok(())
    }

    /// Save schedules to disk
    pub fn save(&self) -> Result<(), BillingError> {
        let schedules = self.get_all()?;
        self.file.store(&ScheduleData { schedules })
    }

    pub fn get(&self, id: ScheduleId) -> Result<Option<ScheduleEntry>, BillingError> {
        let data = self.data.read().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all schedule entries in creation order
    ///
    /// Display ordering needs recipient names and lives in the schedule service.
    pub fn get_all(&self) -> Result<Vec<ScheduleEntry>, BillingError> {
        let data = self.data.read().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut schedules: Vec<_> = data.values().cloned().collect();
        schedules.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.key().cmp(&b.key())));
        Ok(schedules)
    }

    /// Find the entry occupying a (recipient, weekday, service type) slot
    pub fn find_by_key(&self, key: &UnitKey) -> Result<Option<ScheduleEntry>, BillingError> {
        let data = self.data.read().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().find(|s| s.key() == *key).cloned())
    }

    pub fn get_by_recipient(
        &self,
        recipient_id: RecipientId,
    ) -> Result<Vec<ScheduleEntry>, BillingError> {
        let all = self.get_all()?;
        Ok(all
            .into_iter()
            .filter(|s| s.recipient_id == recipient_id)
            .collect())
    }

    pub fn upsert(&self, entry: ScheduleEntry) -> Result<(), BillingError> {
        let mut data = self.data.write().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(entry.id, entry);
        Ok(())
    }

    /// Delete an entry, returning it if it existed
    pub fn delete(&self, id: ScheduleId) -> Result<Option<ScheduleEntry>, BillingError> {
        let mut data = self.data.write().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id))
    }

    /// Delete every entry for a recipient, returning how many were removed
    pub fn delete_by_recipient(&self, recipient_id: RecipientId) -> Result<usize, BillingError> {
        let mut data = self.data.write().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = data.len();
        data.retain(|_, s| s.recipient_id != recipient_id);
        Ok(before - data.len())
    }

    pub fn count(&self) -> Result<usize, BillingError> {
        let data = self.data.read().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ServiceType, Weekday};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ScheduleRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ScheduleRepository::new(temp_dir.path().join("schedules.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_find_by_key() {
        let (_temp_dir, repo) = create_test_repo();
        let recipient = RecipientId::new();
        let entry = ScheduleEntry::new(recipient, Weekday::Monday, ServiceType::Work);
        repo.upsert(entry.clone()).unwrap();

        let found = repo.find_by_key(&entry.key()).unwrap().unwrap();
        assert_eq!(found.id, entry.id);

        let other = UnitKey::new(recipient, Weekday::Monday, ServiceType::Trip);
        assert!(repo.find_by_key(&other).unwrap().is_none());
    }

    #[test]
    fn test_delete_by_recipient() {
        let (_temp_dir, repo) = create_test_repo();
        let keep = RecipientId::new();
        let drop = RecipientId::new();

        repo.upsert(ScheduleEntry::new(keep, Weekday::Monday, ServiceType::Work))
            .unwrap();
        repo.upsert(ScheduleEntry::new(drop, Weekday::Monday, ServiceType::Work))
            .unwrap();
        repo.upsert(ScheduleEntry::new(drop, Weekday::Friday, ServiceType::Trip))
            .unwrap();

        assert_eq!(repo.delete_by_recipient(drop).unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get_by_recipient(keep).unwrap().len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let entry = ScheduleEntry::new(RecipientId::new(), Weekday::Thursday, ServiceType::Trip);
        repo.upsert(entry.clone()).unwrap();
        repo.save().unwrap();

        let repo2 = ScheduleRepository::new(temp_dir.path().join("schedules.json"));
        repo2.load().unwrap();

        let loaded = repo2.get(entry.id).unwrap().unwrap();
        assert_eq!(loaded.weekday, Weekday::Thursday);
        assert_eq!(loaded.service_type, ServiceType::Trip);
    }

    #[test]
    fn test_delete_missing_returns_none() {
        let (_temp_dir, repo) = create_test_repo();
        assert!(repo.delete(ScheduleId::new()).unwrap().is_none());
    }
}
