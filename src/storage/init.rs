//! Storage initialization
//!
//! Handles first-run setup: directories, empty data files and settings.

use crate::config::paths::BillingPaths;
use crate::config::settings::Settings;
use crate::error::BillingError;

use super::Storage;

/// Initialize storage for a fresh installation
///
/// Existing data files are left untouched; missing ones are written empty.
pub fn initialize_storage(paths: &BillingPaths, settings: &mut Settings) -> Result<(), BillingError> {
    paths.ensure_directories()?;

    if needs_initialization(paths) {
        let mut storage = Storage::new(paths.clone())?;
        storage.load_all()?;
        storage.save_all()?;
    }

    settings.setup_completed = true;
    settings.save(paths)?;

    Ok(())
}

/// Check if any data file is missing
pub fn needs_initialization(paths: &BillingPaths) -> bool {
    !paths.recipients_file().exists()
        || !paths.schedules_file().exists()
        || !paths.export_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recipient;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillingPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();

        assert!(needs_initialization(&paths));

        initialize_storage(&paths, &mut settings).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(settings.setup_completed);
        assert!(paths.is_initialized());
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillingPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();

        initialize_storage(&paths, &mut settings).unwrap();

        let storage = Storage::new(paths.clone()).unwrap();
        storage
            .recipients
            .upsert(Recipient::new("Doe", "Jane", "123456789012"))
            .unwrap();
        storage.recipients.save().unwrap();

        initialize_storage(&paths, &mut settings).unwrap();

        let mut reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.recipients.count().unwrap(), 1);
    }
}
