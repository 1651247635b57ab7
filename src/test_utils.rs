//! # Test Utilities Module
//!
//! Fixtures shared by unit tests, integration tests and doc examples.
//!
//! Every fixture is an isolated in-memory database, so tests never share
//! state and can run in parallel.

use crate::config::Config;
use crate::core::Result;
use crate::db::AntDb;
use rusqlite::Connection;

/// Table used by the standard fixture.
pub const USERS_TABLE: &str = "users";

const USERS_SCHEMA: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username VARCHAR(255),
        password VARCHAR(255)
    );
";

const USERS_SEED: &[(&str, &str)] = &[("steve", "steve_pass"), ("nancy", "nancy_pass")];

/// Isolated database test fixture
pub struct DatabaseFixture {
    pub connection: Connection,
}

impl DatabaseFixture {
    /// Create an empty in-memory database
    pub fn new() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(DatabaseFixture { connection })
    }

    /// `users` table seeded with `steve` (id 1) and `nancy` (id 2).
    ///
    /// # Panics
    ///
    /// Panics if the in-memory database cannot be created.
    pub fn with_users() -> Self {
        let fixture = Self::new().expect("in-memory database");
        fixture.setup_users().expect("users fixture");
        fixture
    }

    fn setup_users(&self) -> Result<()> {
        self.connection.execute_batch(USERS_SCHEMA)?;
        for (username, password) in USERS_SEED {
            self.connection.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                [username, password],
            )?;
        }
        Ok(())
    }

    /// Hands the connection to a wrapper with default options.
    pub fn into_db(self) -> AntDb {
        AntDb::with_connection(Config::default(), self.connection)
    }

    /// Hands the connection to a wrapper with the given options.
    pub fn into_db_with(self, config: Config) -> AntDb {
        AntDb::with_connection(config, self.connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_fixture_is_seeded() {
        let fixture = DatabaseFixture::with_users();
        let count: i64 = fixture
            .connection
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_fixtures_are_isolated() {
        let first = DatabaseFixture::with_users();
        first.connection.execute("DELETE FROM users", []).unwrap();

        let second = DatabaseFixture::with_users();
        let count: i64 = second
            .connection
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }
}
