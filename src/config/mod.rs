//! Configuration module for medicaid-billing
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BillingPaths;
pub use settings::Settings;
