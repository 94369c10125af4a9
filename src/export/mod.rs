//! Export module for medicaid-billing
//!
//! Renders accepted billing entries into the fixed-width flat file the
//! billing office uploads.

pub mod flat_file;

pub use flat_file::{file_name, format_line, to_bytes, LINE_WIDTH};
