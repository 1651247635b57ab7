//! AntDb Error Module
//!
//! Error types for the wrapper plus the append-only error log that mirrors
//! every failure back to callers who prefer to inspect it after the fact.
use thiserror::Error;
use tracing::warn;

/// Code recorded for errors that carry no driver-supplied code.
pub const DEFAULT_ERROR_CODE: i32 = 999;

/// Error type for every fallible AntDb operation.
#[derive(Error, Debug)]
pub enum AntDbError {
    /// An operation needed a live connection but none was open.
    #[error("No connection to database is open.")]
    NotConnected,

    /// Errors reported by the SQLite driver (bad SQL, constraints, I/O)
    #[error("{0}")]
    Database(#[from] rusqlite::Error),

    /// The statement builder refused its input
    #[error("Statement error: {0}")]
    Statement(String),

    /// Configuration validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML configuration
    #[error("Configuration error: {0}")]
    Toml(#[from] toml::de::Error),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AntDbError {
    /// Returns the driver's extended result code, or [`DEFAULT_ERROR_CODE`]
    /// when the error did not come from SQLite itself.
    pub fn code(&self) -> i32 {
        match self {
            AntDbError::Database(e) => e
                .sqlite_error()
                .map_or(DEFAULT_ERROR_CODE, |err| err.extended_code),
            _ => DEFAULT_ERROR_CODE,
        }
    }
}

/// Type alias for Result to use AntDbError as the error type.
pub type Result<T> = std::result::Result<T, AntDbError>;

/// Ordered list of `"code : message"` records.
///
/// Entries are only ever appended or popped from the end; nothing clears the
/// log implicitly.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorLog {
    entries: Vec<String>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a formatted record. `None` stands in for [`DEFAULT_ERROR_CODE`].
    pub fn add(&mut self, message: &str, code: Option<i32>) {
        let entry = format!("{} : {}", code.unwrap_or(DEFAULT_ERROR_CODE), message);
        warn!("{}", entry);
        self.entries.push(entry);
    }

    /// Appends the record for an error value.
    pub fn record(&mut self, err: &AntDbError) {
        self.add(&err.to_string(), Some(err.code()));
    }

    pub fn has_any(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn all(&self) -> &[String] {
        &self.entries
    }

    /// Removes and returns the most recent record.
    pub fn pop_last(&mut self) -> Option<String> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
