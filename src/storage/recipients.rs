//! Recipient repository for JSON storage
//!
//! Manages loading and saving recipients to recipients.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BillingError;
use crate::models::{Recipient, RecipientId};

use super::data_file::DataFile;

/// Serializable recipient data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RecipientData {
    recipients: Vec<Recipient>,
}

/// Repository for recipient persistence
pub struct RecipientRepository {
    file: DataFile,
    data: RwLock<HashMap<RecipientId, Recipient>>,
}

impl RecipientRepository {
    /// Create a new recipient repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: DataFile::new("recipients", path),
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load recipients from disk
    pub fn load(&self) -> Result<(), BillingError> {
        let file_data: RecipientData = self.file.load()?;

        let mut data = self.data.write().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for recipient in file_data.recipients {
            data.insert(recipient.id, recipient);
        }

        Ok(())
    }

    /// Save recipients to disk, ordered by surname
    pub fn save(&self) -> Result<(), BillingError> {
        let recipients = self.get_all()?;
        self.file.store(&RecipientData { recipients })
    }

    /// Get a recipient by ID
    pub fn get(&self, id: RecipientId) -> Result<Option<Recipient>, BillingError> {
        let data = self.data.read().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all recipients ordered by last name, then first name (case-insensitive)
    pub fn get_all(&self) -> Result<Vec<Recipient>, BillingError> {
        let data = self.data.read().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut recipients: Vec<_> = data.values().cloned().collect();
        recipients.sort_by_key(|r| r.sort_key());
        Ok(recipients)
    }

    /// Get a recipient by Medicaid ID
    pub fn get_by_medicaid_id(&self, medicaid_id: &str) -> Result<Option<Recipient>, BillingError> {
        let data = self.data.read().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let medicaid_id = medicaid_id.trim();
        Ok(data
            .values()
            .find(|r| r.medicaid_id == medicaid_id)
            .cloned())
    }

    /// Insert or update a recipient
    pub fn upsert(&self, recipient: Recipient) -> Result<(), BillingError> {
        let mut data = self.data.write().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(recipient.id, recipient);
        Ok(())
    }

    /// Delete a recipient
    pub fn delete(&self, id: RecipientId) -> Result<bool, BillingError> {
        let mut data = self.data.write().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    /// Count recipients
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
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, RecipientRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("recipients.json");
        let repo = RecipientRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        let recipient = Recipient::new("Doe", "Jane", "123456789012");
        let id = recipient.id;

        repo.upsert(recipient).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.last_name, "Doe");
        assert!(repo.get_by_medicaid_id("123456789012").unwrap().is_some());
        assert!(repo.get_by_medicaid_id("000000000000").unwrap().is_none());
    }

    #[test]
    fn test_get_all_sorted_by_surname() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Recipient::new("smith", "Ann", "111111111111")).unwrap();
        repo.upsert(Recipient::new("Adams", "Bo", "222222222222")).unwrap();
        repo.upsert(Recipient::new("Smith", "Al", "333333333333")).unwrap();

        let names: Vec<_> = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|r| r.first_name)
            .collect();
        assert_eq!(names, vec!["Bo", "Al", "Ann"]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let recipient = Recipient::new("Doe", "Jane", "123456789012");
        let id = recipient.id;

        repo.upsert(recipient).unwrap();
        repo.save().unwrap();

        let repo2 = RecipientRepository::new(temp_dir.path().join("recipients.json"));
        repo2.load().unwrap();

        let retrieved = repo2.get(id).unwrap().unwrap();
        assert_eq!(retrieved.medicaid_id, "123456789012");
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let recipient = Recipient::new("Doe", "Jane", "123456789012");
        let id = recipient.id;

        repo.upsert(recipient).unwrap();
        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
