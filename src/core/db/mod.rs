//! Database Module
//!
//! The database layer is split into three concerns:
//! - **Connection Management** (`connection.rs`): owns the live connection and
//!   the connector that opens it
//! - **Statement Building** (`statement.rs`): turns column/value pairs into parameterized SQL
//! - **Query Execution** (`query.rs`): binds, runs and materializes statements
//!
//! All fallible operations return [`crate::core::Result`].
pub mod connection;
pub mod query;
pub mod statement;

pub use connection::*;
pub use query::*;
pub use statement::{Fields, Statement};
