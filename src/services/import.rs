//! CSV import of unit values
//!
//! Reads rows of `recipient,weekday,service_type,units` and turns them into
//! unit inputs for a billing session. Bad rows are collected, not fatal.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::debug;

use crate::error::BillingResult;
use crate::models::{ServiceType, UnitKey, Weekday};
use crate::services::RecipientService;
use crate::storage::Storage;

#[derive(Debug, Deserialize)]
struct UnitRow {
    recipient: String,
    weekday: String,
    service_type: String,
    #[serde(default)]
    units: String,
}

/// A row that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRowError {
    /// Line number in the file (the header is line 1)
    pub line: usize,
    pub message: String,
}

/// Result of reading a unit file
#[derive(Debug, Clone, Default)]
pub struct UnitImport {
    /// Unit values in file order
    pub inputs: Vec<(UnitKey, String)>,
    pub errors: Vec<ImportRowError>,
}

/// Service for importing unit values
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Read unit values from a CSV file
    pub fn parse_units_file(&self, path: &Path) -> BillingResult<UnitImport> {
        let file = std::fs::File::open(path)?;
        self.parse_units_from_reader(file)
    }

    /// Read unit values from any CSV source
    pub fn parse_units_from_reader<R: Read>(&self, source: R) -> BillingResult<UnitImport> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        let mut import = UnitImport::default();

        for (idx, result) in reader.deserialize::<UnitRow>().enumerate() {
            let line = idx + 2;
            let parsed = result
                .map_err(|e| format!("Error reading CSV record: {}", e))
                .and_then(|row| self.parse_row(&row));

            match parsed {
                Ok(input) => import.inputs.push(input),
                Err(message) => import.errors.push(ImportRowError { line, message }),
            }
        }

        debug!(
            inputs = import.inputs.len(),
            errors = import.errors.len(),
            "unit file read"
        );
        Ok(import)
    }

    fn parse_row(&self, row: &UnitRow) -> Result<(UnitKey, String), String> {
        let recipient = RecipientService::new(self.storage)
            .find(&row.recipient)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("Recipient not found: {}", row.recipient))?;

        let weekday = Weekday::parse(&row.weekday)
            .ok_or_else(|| format!("'{}' is not a weekday", row.weekday))?;
        let service_type = ServiceType::parse(&row.service_type)
            .ok_or_else(|| format!("'{}' is not a service type", row.service_type))?;

        Ok((
            UnitKey::new(recipient.id, weekday, service_type),
            row.units.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BillingPaths;
    use crate::models::Recipient;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillingPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_parse_units() {
        let (_temp_dir, storage) = create_test_storage();
        let jane = Recipient::new("Doe", "Jane", "123456789012");
        storage.recipients.upsert(jane.clone()).unwrap();

        let data = "recipient,weekday,service_type,units\n\
                    123456789012,Monday,work,6\n\
                    123456789012, tue ,TRIP,2\n\
                    999999999999,monday,work,4\n\
                    123456789012,sunday,work,4\n";

        let import = ImportService::new(&storage)
            .parse_units_from_reader(data.as_bytes())
            .unwrap();

        assert_eq!(
            import.inputs,
            vec![
                (
                    UnitKey::new(jane.id, Weekday::Monday, ServiceType::Work),
                    "6".to_string()
                ),
                (
                    UnitKey::new(jane.id, Weekday::Tuesday, ServiceType::Trip),
                    "2".to_string()
                ),
            ]
        );
        assert_eq!(import.errors.len(), 2);
        assert_eq!(import.errors[0].line, 4);
        assert_eq!(import.errors[1].line, 5);
    }

    #[test]
    fn test_values_are_kept_raw() {
        let (_temp_dir, storage) = create_test_storage();
        let jane = Recipient::new("Doe", "Jane", "123456789012");
        storage.recipients.upsert(jane).unwrap();

        let data = "recipient,weekday,service_type,units\n123456789012,friday,work,25\n";
        let import = ImportService::new(&storage)
            .parse_units_from_reader(data.as_bytes())
            .unwrap();

        // Range checks happen when the value reaches the billing session
        assert_eq!(import.inputs[0].1, "25");
        assert!(import.errors.is_empty());
    }
}
