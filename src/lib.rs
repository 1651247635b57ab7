//! AntDb: a small, beginner-friendly wrapper around a SQLite connection.
//!
//! See [`AntDb`] for the entry point.

// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod config;
pub mod db;
pub mod test_utils;

pub use crate::config::{load_config, Config, OptionValue, Options};
pub use crate::core::db::{AssocRow, Connector, FetchStyle, ResultSet, Row, SqliteConnector};
pub use crate::core::{AntDbError, ParamType, Result, SqlValue, DEFAULT_ERROR_CODE};
pub use crate::db::AntDb;
