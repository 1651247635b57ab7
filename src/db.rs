//! The [`AntDb`] facade.
//!
//! Every fallible method returns a [`Result`] and, on failure, also appends
//! a `"code : message"` record to the instance's error log. Callers can
//! handle the `Err` directly or inspect the log afterwards with
//! [`AntDb::has_error`], [`AntDb::errors`] and [`AntDb::last_error`].
//!
//! ```
//! use antdb::{params, AntDb, Config};
//!
//! let mut db = AntDb::new(Config::with_name(":memory:"));
//! db.write("CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT)", params![], &[])
//!     .unwrap();
//! db.insert("users", [("username", "joe")], &[]).unwrap();
//!
//! let row = db
//!     .fetch_assoc("SELECT username FROM users WHERE id = ?", params![1])
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(row.get("username").and_then(|v| v.as_str()), Some("joe"));
//! ```

use crate::config::{Config, OptionValue};
use crate::core::db::{
    statement, AssocRow, ConnectionManager, Connector, FetchStyle, QueryExecutor, ResultSet,
    SqliteConnector, Statement,
};
use crate::core::value::{ParamType, SqlValue};
use crate::core::{AntDbError, ErrorLog, Result};
use rusqlite::Connection;

/// Beginner-friendly wrapper around one SQLite connection.
#[derive(Debug)]
pub struct AntDb {
    config: Config,
    manager: ConnectionManager,
    errors: ErrorLog,
}

impl AntDb {
    /// Builds a wrapper that opens connections with [`SqliteConnector`].
    ///
    /// With `autoconnect` on (the default) a connection is opened right
    /// away; a failure there is recorded in the error log and the wrapper
    /// starts disconnected.
    pub fn new(config: Config) -> Self {
        Self::with_connector(config, SqliteConnector)
    }

    /// Builds a wrapper that opens connections with a custom connector.
    pub fn with_connector(config: Config, connector: impl Connector + 'static) -> Self {
        let autoconnect = config.options.autoconnect;
        let mut db = AntDb {
            config,
            manager: ConnectionManager::new(connector),
            errors: ErrorLog::new(),
        };
        if autoconnect {
            let _ = db.connect(None);
        }
        db
    }

    /// Builds a wrapper around an already-open connection, ignoring
    /// `autoconnect`.
    pub fn with_connection(config: Config, connection: Connection) -> Self {
        let mut db = AntDb {
            config,
            manager: ConnectionManager::default(),
            errors: ErrorLog::new(),
        };
        let _ = db.connect(Some(connection));
        db
    }

    /// Check if any error occurred.
    pub fn has_error(&self) -> bool {
        self.errors.has_any()
    }

    /// Removes and returns the most recent error record.
    pub fn last_error(&mut self) -> Option<String> {
        self.errors.pop_last()
    }

    /// All error records, oldest first.
    pub fn errors(&self) -> &[String] {
        self.errors.all()
    }

    /// Opens, adopts or returns the connection.
    ///
    /// When already connected the current connection is returned unchanged
    /// and `existing` is dropped.
    pub fn connect(&mut self, existing: Option<Connection>) -> Result<&Connection> {
        match self.manager.connect(&self.config, existing) {
            Ok(conn) => Ok(conn),
            Err(e) => {
                let err = AntDbError::from(e);
                self.errors.record(&err);
                Err(err)
            }
        }
    }

    /// Close connection. Safe to call when already disconnected.
    pub fn disconnect(&mut self) {
        self.manager.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.manager.is_connected()
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.manager.connection()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get config option value. See [`Config::option`].
    pub fn option(&self, name: &str) -> Option<OptionValue> {
        self.config.option(name)
    }

    /// Changes the row shape used by reads issued from now on.
    pub fn set_fetch_mode(&mut self, style: FetchStyle) -> &mut Self {
        self.config.options.fetch_style = style;
        self
    }

    pub fn fetch_style(&self) -> FetchStyle {
        self.config.options.fetch_style
    }

    /// Inserts one row and returns the number of affected rows.
    ///
    /// ```
    /// # use antdb::{params, AntDb, Config, ParamType};
    /// # let mut db = AntDb::new(Config::with_name(":memory:"));
    /// # db.write("CREATE TABLE users (username TEXT, password TEXT)", params![], &[]).unwrap();
    /// db.insert(
    ///     "users",
    ///     [("username", "user1"), ("password", "pass1")],
    ///     &[("username", ParamType::Str), ("password", ParamType::Str)],
    /// )
    /// .unwrap();
    /// ```
    pub fn insert<I, K, V>(
        &mut self,
        table: &str,
        data: I,
        types: &[(&str, ParamType)],
    ) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        let stmt = self.track(statement::insert(table, &statement::fields(data), types))?;
        self.execute_write(&stmt)
    }

    /// Updates the rows matching every `conditions` pair.
    ///
    /// `types` is keyed by column and covers both `data` and `conditions`.
    pub fn update<D, DK, DV, W, WK, WV>(
        &mut self,
        table: &str,
        data: D,
        conditions: W,
        types: &[(&str, ParamType)],
    ) -> Result<usize>
    where
        D: IntoIterator<Item = (DK, DV)>,
        DK: Into<String>,
        DV: Into<SqlValue>,
        W: IntoIterator<Item = (WK, WV)>,
        WK: Into<String>,
        WV: Into<SqlValue>,
    {
        let stmt = self.track(statement::update(
            table,
            &statement::fields(data),
            &statement::fields(conditions),
            types,
        ))?;
        self.execute_write(&stmt)
    }

    /// Deletes the rows matching every `conditions` pair.
    pub fn delete<W, K, V>(
        &mut self,
        table: &str,
        conditions: W,
        types: &[(&str, ParamType)],
    ) -> Result<usize>
    where
        W: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        let stmt = self.track(statement::delete(table, &statement::fields(conditions), types))?;
        self.execute_write(&stmt)
    }

    /// Runs a row-returning statement. Rows come back in the configured
    /// fetch style.
    pub fn read(
        &mut self,
        sql: &str,
        params: Vec<SqlValue>,
        types: &[ParamType],
    ) -> Result<ResultSet> {
        self.execute_read(&Statement::new(sql, params, types))
    }

    /// Runs a statement for its effect and reports affected rows.
    ///
    /// Without parameters every statement in `sql` runs in order and the
    /// count of the last one is returned. Rows a statement yields are
    /// discarded.
    pub fn write(
        &mut self,
        sql: &str,
        params: Vec<SqlValue>,
        types: &[ParamType],
    ) -> Result<usize> {
        self.execute_write(&Statement::new(sql, params, types))
    }

    /// First row of the result keyed by column name, `None` when the query
    /// matched nothing.
    pub fn fetch_assoc(&mut self, sql: &str, params: Vec<SqlValue>) -> Result<Option<AssocRow>> {
        self.execute_first(&Statement::new(sql, params, &[]))
    }

    /// First row of the result by position, `None` when the query matched
    /// nothing.
    pub fn fetch_array(
        &mut self,
        sql: &str,
        params: Vec<SqlValue>,
    ) -> Result<Option<Vec<SqlValue>>> {
        let row = self.execute_first(&Statement::new(sql, params, &[]))?;
        Ok(row.map(AssocRow::into_values))
    }

    fn execute_read(&mut self, statement: &Statement) -> Result<ResultSet> {
        let fetch_style = self.fetch_style();
        let result = match self.manager.connection() {
            Some(conn) => QueryExecutor::new(conn).read(statement, fetch_style),
            None => Err(AntDbError::NotConnected),
        };
        self.track(result)
    }

    fn execute_first(&mut self, statement: &Statement) -> Result<Option<AssocRow>> {
        let result = match self.manager.connection() {
            Some(conn) => QueryExecutor::new(conn).read_first(statement),
            None => Err(AntDbError::NotConnected),
        };
        self.track(result)
    }

    fn execute_write(&mut self, statement: &Statement) -> Result<usize> {
        let result = match self.manager.connection() {
            Some(conn) => QueryExecutor::new(conn).write(statement),
            None => Err(AntDbError::NotConnected),
        };
        self.track(result)
    }

    /// Records the error of a failed result before handing it back.
    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ref err) = result {
            self.errors.record(err);
        }
        result
    }
}

impl Drop for AntDb {
    fn drop(&mut self) {
        self.disconnect();
    }
}
