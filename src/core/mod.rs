//! Core Module for AntDb
//!
//! Shared infrastructure behind the [`crate::AntDb`] facade: value types,
//! error handling and the database layer that talks to the driver.

pub mod db;
pub mod error;
pub mod value;

// Re-export commonly used types for convenience
pub use error::{AntDbError, ErrorLog, Result, DEFAULT_ERROR_CODE};
pub use value::{ParamType, SqlValue};
