//! Statement Builder Module
//!
//! Turns ordered column/value pairs into parameterized INSERT, UPDATE and
//! DELETE statements. Placeholders are positional (`?`) and appear in the
//! same order as the pairs that produced them, so the parameter list lines
//! up with the SQL text.
//!
//! Table and column names are interpolated verbatim. Only values travel as
//! parameters.

use crate::core::value::{ParamType, SqlValue};
use crate::core::{AntDbError, Result};

/// Ordered column/value pairs.
pub type Fields = Vec<(String, SqlValue)>;

/// Collects any iterator of `(column, value)` pairs into [`Fields`].
pub fn fields<I, K, V>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<SqlValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// SQL text plus the parameters that go with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<SqlValue>,
    types: Option<Vec<ParamType>>,
}

impl Statement {
    /// Wraps raw SQL and positional parameters.
    ///
    /// An empty `types` slice means "bind every value as it is"; otherwise
    /// each position takes its hint and positions past the end of `types`
    /// fall back to [`ParamType::Str`].
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>, types: &[ParamType]) -> Self {
        Statement {
            sql: sql.into(),
            params,
            types: if types.is_empty() {
                None
            } else {
                Some(types.to_vec())
            },
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn param_types(&self) -> Option<&[ParamType]> {
        self.types.as_deref()
    }

    /// The parameters exactly as they will be handed to the driver.
    pub fn bound_params(&self) -> Vec<SqlValue> {
        match &self.types {
            None => self.params.clone(),
            Some(types) => self
                .params
                .iter()
                .enumerate()
                .map(|(i, value)| value.coerce(types.get(i).copied().unwrap_or_default()))
                .collect(),
        }
    }
}

/// Builds `INSERT INTO {table} (c1, c2) VALUES (?, ?)`.
pub fn insert(
    table: &str,
    data: &[(String, SqlValue)],
    types: &[(&str, ParamType)],
) -> Result<Statement> {
    require_columns("INSERT", "data", data)?;

    let columns: Vec<&str> = data.iter().map(|(c, _)| c.as_str()).collect();
    let placeholders = vec!["?"; data.len()];
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );

    Ok(build(sql, &[data], types))
}

/// Builds `UPDATE {table} SET c1 = ?, c2 = ? WHERE w1 = ? AND w2 = ?`.
///
/// Parameters are the data values followed by the condition values.
pub fn update(
    table: &str,
    data: &[(String, SqlValue)],
    conditions: &[(String, SqlValue)],
    types: &[(&str, ParamType)],
) -> Result<Statement> {
    require_columns("UPDATE", "data", data)?;
    require_columns("UPDATE", "conditions", conditions)?;

    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        table,
        assignments(data, ", "),
        assignments(conditions, " AND ")
    );

    Ok(build(sql, &[data, conditions], types))
}

/// Builds `DELETE FROM {table} WHERE w1 = ? AND w2 = ?`.
pub fn delete(
    table: &str,
    conditions: &[(String, SqlValue)],
    types: &[(&str, ParamType)],
) -> Result<Statement> {
    require_columns("DELETE", "conditions", conditions)?;

    let sql = format!(
        "DELETE FROM {} WHERE {}",
        table,
        assignments(conditions, " AND ")
    );

    Ok(build(sql, &[conditions], types))
}

fn require_columns(verb: &str, what: &str, pairs: &[(String, SqlValue)]) -> Result<()> {
    if pairs.is_empty() {
        return Err(AntDbError::Statement(format!(
            "{} requires at least one column in {}",
            verb, what
        )));
    }
    Ok(())
}

fn assignments(pairs: &[(String, SqlValue)], separator: &str) -> String {
    pairs
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Flattens the pair groups into positional parameters and resolves the
/// column-keyed hints to the positions those columns occupy.
fn build(sql: String, groups: &[&[(String, SqlValue)]], types: &[(&str, ParamType)]) -> Statement {
    let pairs = groups.iter().flat_map(|group| group.iter());

    let params: Vec<SqlValue> = pairs.clone().map(|(_, v)| v.clone()).collect();
    let positional: Vec<ParamType> = if types.is_empty() {
        Vec::new()
    } else {
        pairs
            .map(|(column, _)| {
                types
                    .iter()
                    .find(|(name, _)| *name == column.as_str())
                    .map(|(_, ty)| *ty)
                    .unwrap_or_default()
            })
            .collect()
    };

    Statement::new(sql, params, &positional)
}
