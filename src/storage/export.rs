//! Export output repository
//!
//! Accumulates accepted billing entries and their flat-file lines in
//! export.json until the output is cleared. `append` and `clear` write the
//! file before changing memory, so what is held always matches disk.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BillingError;
use crate::models::ExportedEntry;

use super::data_file::DataFile;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExportData {
    entries: Vec<ExportedEntry>,
}

/// Repository for accumulated export output
pub struct ExportRepository {
    file: DataFile,
    data: RwLock<Vec<ExportedEntry>>,
}

impl ExportRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: DataFile::new("export", path),
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> Result<(), BillingError> {
        let file_data: ExportData = self.file.load()?;

        let mut data = self.data.write().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = file_data.entries;

        Ok(())
    }

    pub fn save(&self) -> Result<(), BillingError> {
        let entries = self.get_all()?;
        self.file.store(&ExportData { entries })
    }

    /// All exported entries in submission order
    pub fn get_all(&self) -> Result<Vec<ExportedEntry>, BillingError> {
        let data = self.data.read().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.clone())
    }

    /// Rendered lines in submission order
    pub fn lines(&self) -> Result<Vec<String>, BillingError> {
        let data = self.data.read().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.iter().map(|e| e.line.clone()).collect())
    }

    /// Append a whole batch and persist it
    ///
    /// If the file cannot be written the batch is not kept.
    pub fn append(&self, entries: Vec<ExportedEntry>) -> Result<(), BillingError> {
        let mut data = self.data.write().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let mut combined = data.clone();
        combined.extend(entries);
        self.file.store(&ExportData {
            entries: combined.clone(),
        })?;

        *data = combined;
        Ok(())
    }

    /// Remove everything and persist, returning how many entries were dropped
    pub fn clear(&self) -> Result<usize, BillingError> {
        let mut data = self.data.write().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        self.file.store(&ExportData::default())?;

        let count = data.len();
        data.clear();
        Ok(count)
    }

    pub fn count(&self) -> Result<usize, BillingError> {
        let data = self.data.read().map_err(|e| {
            BillingError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}
