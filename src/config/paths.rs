//! Path management for medicaid-billing
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `BILLING_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/medicaid-billing` or `~/.config/medicaid-billing`
//! 3. Windows: `%APPDATA%\medicaid-billing`

use std::path::PathBuf;

use crate::error::BillingError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BILLING_DATA_DIR";

const APP_DIR_NAME: &str = "medicaid-billing";

/// Manages all paths used by medicaid-billing
#[derive(Debug, Clone)]
pub struct BillingPaths {
    /// Base directory for all billing data
    base_dir: PathBuf,
}

impl BillingPaths {
    /// Create a new BillingPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the home directory cannot
    /// be determined.
    pub fn new() -> Result<Self, BillingError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BillingPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to recipients.json
    pub fn recipients_file(&self) -> PathBuf {
        self.data_dir().join("recipients.json")
    }

    /// Get the path to schedules.json
    pub fn schedules_file(&self) -> PathBuf {
        self.data_dir().join("schedules.json")
    }

    /// Get the path to export.json (accumulated billing output)
    pub fn export_file(&self) -> PathBuf {
        self.data_dir().join("export.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), BillingError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BillingError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BillingError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the data directory has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BillingError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                BillingError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR_NAME))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BillingError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BillingError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR_NAME))
}
