//! Query Execution Module
//!
//! Runs built statements against a borrowed connection. The read path
//! materializes rows into a [`ResultSet`] (or steps once for a single row);
//! the write path reports the number of affected rows.

use crate::core::db::statement::Statement;
use crate::core::value::SqlValue;
use crate::core::Result;
use rusqlite::{Batch, Connection};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Shape in which rows are handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStyle {
    /// Column name to value, in column order.
    Assoc,
    /// Values by position.
    Num,
    /// A JSON object keyed by column name.
    #[default]
    Object,
}

/// A row keyed by column name. Keeps the column order of the query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssocRow(Vec<(String, SqlValue)>);

impl AssocRow {
    /// Looks a value up by column name. With duplicate names the last
    /// column wins.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.0.iter().rev().find(|(name, _)| name == column).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Drops the names and keeps the values in column order.
    pub fn into_values(self) -> Vec<SqlValue> {
        self.0.into_iter().map(|(_, v)| v).collect()
    }

    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for AssocRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        AssocRow(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One fetched row in the requested [`FetchStyle`].
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Assoc(AssocRow),
    Num(Vec<SqlValue>),
    Object(serde_json::Map<String, serde_json::Value>),
}

impl Row {
    /// JSON rendering regardless of shape. Positional rows become arrays.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Row::Assoc(row) => serde_json::Value::Object(row.to_json()),
            Row::Num(values) => values.iter().map(SqlValue::to_json).collect(),
            Row::Object(map) => serde_json::Value::Object(map.clone()),
        }
    }
}

/// Rows returned by a read, handed out front to back.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: VecDeque<Vec<SqlValue>>,
    fetch_style: FetchStyle,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>, fetch_style: FetchStyle) -> Self {
        ResultSet {
            columns,
            rows: rows.into(),
            fetch_style,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows not yet fetched.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    pub fn fetch_style(&self) -> FetchStyle {
        self.fetch_style
    }

    /// Changes the shape of rows fetched from now on.
    pub fn set_fetch_mode(&mut self, style: FetchStyle) -> &mut Self {
        self.fetch_style = style;
        self
    }

    /// Next row in the configured shape, `None` once exhausted.
    pub fn fetch(&mut self) -> Option<Row> {
        self.fetch_with(self.fetch_style)
    }

    /// Next row in an explicit shape, leaving the configured shape alone.
    pub fn fetch_with(&mut self, style: FetchStyle) -> Option<Row> {
        let values = self.rows.pop_front()?;
        Some(match style {
            FetchStyle::Num => Row::Num(values),
            FetchStyle::Assoc => Row::Assoc(self.name(values)),
            FetchStyle::Object => Row::Object(self.name(values).to_json()),
        })
    }

    pub fn fetch_assoc(&mut self) -> Option<AssocRow> {
        let values = self.rows.pop_front()?;
        Some(self.name(values))
    }

    pub fn fetch_num(&mut self) -> Option<Vec<SqlValue>> {
        self.rows.pop_front()
    }

    /// Drains every remaining row in the configured shape.
    pub fn fetch_all(&mut self) -> Vec<Row> {
        std::iter::from_fn(|| self.fetch()).collect()
    }

    fn name(&self, values: Vec<SqlValue>) -> AssocRow {
        AssocRow(self.columns.iter().cloned().zip(values).collect())
    }
}

impl Iterator for ResultSet {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.fetch()
    }
}

/// Query execution service that operates on a database connection
pub struct QueryExecutor<'a> {
    connection: &'a Connection,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new QueryExecutor for the given connection
    pub fn new(connection: &'a Connection) -> Self {
        QueryExecutor { connection }
    }

    /// Prepares, binds and runs a row-returning statement.
    ///
    /// # Errors
    ///
    /// Returns `AntDbError::Database` if the driver rejects the SQL, the
    /// parameter count does not match the placeholders, or stepping fails.
    pub fn read(&self, statement: &Statement, fetch_style: FetchStyle) -> Result<ResultSet> {
        debug!("read: {} ({} params)", statement.sql(), statement.params().len());

        let mut stmt = self.prepare_bound(statement)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = stmt.column_count();

        let mut rows = Vec::new();
        let mut cursor = stmt.raw_query();
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(SqlValue::from(row.get_ref(i)?));
            }
            rows.push(values);
        }

        debug!("read returned {} rows", rows.len());
        Ok(ResultSet::new(columns, rows, fetch_style))
    }

    /// Prepares, binds and steps a statement once, returning only its first
    /// row. Later rows are never produced, so they cannot fail the call.
    pub fn read_first(&self, statement: &Statement) -> Result<Option<AssocRow>> {
        debug!("read first: {} ({} params)", statement.sql(), statement.params().len());

        let mut stmt = self.prepare_bound(statement)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut cursor = stmt.raw_query();
        let Some(row) = cursor.next()? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            values.push(SqlValue::from(row.get_ref(i)?));
        }
        Ok(Some(AssocRow(columns.into_iter().zip(values).collect())))
    }

    /// Runs a statement for its effect and reports the number of affected
    /// rows.
    ///
    /// Parameterless SQL runs as a batch and reports the count of its last
    /// statement; anything with parameters is prepared and bound first.
    /// Statements that yield rows (`RETURNING`, pragmas) are stepped to the
    /// end and their rows discarded.
    pub fn write(&self, statement: &Statement) -> Result<usize> {
        debug!("write: {} ({} params)", statement.sql(), statement.params().len());

        let affected = if statement.params().is_empty() {
            let mut affected = 0;
            let mut batch = Batch::new(self.connection, statement.sql());
            while let Some(mut stmt) = batch.next()? {
                let expected = stmt.parameter_count();
                if expected != 0 {
                    return Err(rusqlite::Error::InvalidParameterCount(0, expected).into());
                }
                affected = self.run_to_completion(&mut stmt)?;
            }
            affected
        } else {
            let mut stmt = self.prepare_bound(statement)?;
            self.run_to_completion(&mut stmt)?
        };

        debug!("write affected {} rows", affected);
        Ok(affected)
    }

    fn run_to_completion(&self, stmt: &mut rusqlite::Statement<'_>) -> Result<usize> {
        if stmt.column_count() == 0 {
            return Ok(stmt.raw_execute()?);
        }

        {
            let mut rows = stmt.raw_query();
            while rows.next()?.is_some() {}
        }
        if stmt.readonly() {
            Ok(0)
        } else {
            Ok(self.connection.changes() as usize)
        }
    }

    fn prepare_bound(&self, statement: &Statement) -> Result<rusqlite::Statement<'a>> {
        let mut stmt = self.connection.prepare(statement.sql())?;

        let params = statement.bound_params();
        let expected = stmt.parameter_count();
        if params.len() != expected {
            return Err(rusqlite::Error::InvalidParameterCount(params.len(), expected).into());
        }
        for (i, value) in params.iter().enumerate() {
            stmt.raw_bind_parameter(i + 1, value)?;
        }

        Ok(stmt)
    }
}

/// Represents different SQL statement types for introspection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementType {
    /// SELECT statement (including `WITH ... SELECT`)
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// PRAGMA statement
    Pragma,
    /// EXPLAIN statement
    Explain,
    /// Other statement types
    Other,
}

impl StatementType {
    /// Determines the statement type from a SQL string
    pub fn from_sql(sql: &str) -> Self {
        let sql_upper = sql.trim_start().to_uppercase();

        if sql_upper.starts_with("SELECT") || sql_upper.starts_with("WITH") {
            StatementType::Select
        } else if sql_upper.starts_with("INSERT") {
            StatementType::Insert
        } else if sql_upper.starts_with("UPDATE") {
            StatementType::Update
        } else if sql_upper.starts_with("DELETE") {
            StatementType::Delete
        } else if sql_upper.starts_with("PRAGMA") {
            StatementType::Pragma
        } else if sql_upper.starts_with("EXPLAIN") {
            StatementType::Explain
        } else {
            StatementType::Other
        }
    }

    /// Whether statements of this type produce a result set.
    pub fn returns_rows(self) -> bool {
        matches!(
            self,
            StatementType::Select | StatementType::Pragma | StatementType::Explain
        )
    }
}
