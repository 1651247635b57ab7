//! Connection Management Module
//!
//! Owns zero-or-one live connection and the [`Connector`] used to open new
//! ones.

use crate::config::Config;
use rusqlite::Connection;
use tracing::{debug, info};

/// Path that selects an in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Opens driver connections from a [`Config`].
pub trait Connector {
    /// Opens a new connection for `config`.
    fn open(&self, config: &Config) -> rusqlite::Result<Connection>;
}

/// Default connector: a SQLite database file named by `config.name`.
///
/// A missing name or `":memory:"` opens a private in-memory database. The
/// configured `init_command`, when set, runs as a batch right after the
/// open.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteConnector;

impl Connector for SqliteConnector {
    fn open(&self, config: &Config) -> rusqlite::Result<Connection> {
        let conn = match config.name.as_deref() {
            None | Some(MEMORY_PATH) => Connection::open_in_memory()?,
            Some(path) => Connection::open(path)?,
        };

        if let Some(init) = config.options.init_command.as_deref() {
            debug!("running init command: {}", init);
            conn.execute_batch(init)?;
        }

        Ok(conn)
    }
}

/// Connection manager for database operations
pub struct ConnectionManager {
    connection: Option<Connection>,
    connector: Box<dyn Connector>,
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        ConnectionManager::new(SqliteConnector)
    }
}

impl ConnectionManager {
    /// Creates a disconnected manager that opens connections with `connector`.
    pub fn new(connector: impl Connector + 'static) -> Self {
        ConnectionManager {
            connection: None,
            connector: Box::new(connector),
        }
    }

    /// Returns the live connection, opening or adopting one if needed.
    ///
    /// An already-open connection is returned as is and `existing` is
    /// dropped. Otherwise `existing` is adopted, or the connector opens a
    /// fresh connection for `config`.
    ///
    /// # Errors
    ///
    /// Returns the driver error when the connector fails; the manager stays
    /// disconnected.
    pub fn connect(
        &mut self,
        config: &Config,
        existing: Option<Connection>,
    ) -> rusqlite::Result<&Connection> {
        let conn = match (self.connection.take(), existing) {
            (Some(current), _) => current,
            (None, Some(supplied)) => {
                info!("adopting supplied connection");
                supplied
            }
            (None, None) => {
                info!(
                    "opening database {}",
                    config.name.as_deref().unwrap_or(MEMORY_PATH)
                );
                self.connector.open(config)?
            }
        };

        Ok(self.connection.insert(conn))
    }

    /// Closes the current connection. A no-op when already disconnected.
    pub fn disconnect(&mut self) {
        if self.connection.take().is_some() {
            info!("connection closed");
        }
    }

    /// Checks if there's an active database connection
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }
}
