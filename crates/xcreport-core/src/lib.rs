//! xcreport Core
//!
//! Configuration, error types and the on-disk result bundle reader.

pub mod bundle;
pub mod config;
pub mod error;

pub use bundle::{JsonBundle, INVOCATION_FILE_NAME, LOGS_DIR, OBJECTS_DIR, PAYLOADS_DIR};
pub use config::{Config, CONFIG_FILE_NAME};
pub use error::{Result, XcReportError};
