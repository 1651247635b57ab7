//! Parameter and column value types.
//!
//! [`SqlValue`] is what callers bind and what result sets hand back.
//! [`ParamType`] is the optional per-position hint that coerces a value
//! before it reaches the driver.
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::{Serialize, Serializer};
use std::fmt;

/// A value that can be bound to a statement parameter or read from a
/// result column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Binary blob.
    Blob(Vec<u8>),
}

/// Binding hint for a single parameter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamType {
    /// Bind as text. Used for any position that has no explicit hint.
    #[default]
    Str,
    /// Bind as a 64-bit integer.
    Int,
    /// Bind as `0` / `1`.
    Bool,
    /// Bind SQL NULL regardless of the value.
    Null,
    /// Bind as a blob.
    Lob,
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Returns the text content, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, if this is an integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Converts the value into the representation `ty` asks for.
    ///
    /// NULL stays NULL under every hint; text that does not parse as a
    /// number becomes `0` under [`ParamType::Int`].
    pub fn coerce(&self, ty: ParamType) -> SqlValue {
        match (ty, self) {
            (ParamType::Null, _) | (_, SqlValue::Null) => SqlValue::Null,
            (ParamType::Str, SqlValue::Text(_)) => self.clone(),
            (ParamType::Str, SqlValue::Integer(i)) => SqlValue::Text(i.to_string()),
            (ParamType::Str, SqlValue::Real(f)) => SqlValue::Text(f.to_string()),
            (ParamType::Str, SqlValue::Blob(b)) => {
                SqlValue::Text(String::from_utf8_lossy(b).into_owned())
            }
            (ParamType::Int, SqlValue::Integer(_)) => self.clone(),
            (ParamType::Int, SqlValue::Real(f)) => SqlValue::Integer(*f as i64),
            (ParamType::Int, SqlValue::Text(s)) => SqlValue::Integer(parse_leading_int(s)),
            (ParamType::Int, SqlValue::Blob(b)) => {
                SqlValue::Integer(parse_leading_int(&String::from_utf8_lossy(b)))
            }
            (ParamType::Bool, value) => SqlValue::Integer(i64::from(value.is_truthy())),
            (ParamType::Lob, SqlValue::Blob(_)) => self.clone(),
            (ParamType::Lob, SqlValue::Text(s)) => SqlValue::Blob(s.as_bytes().to_vec()),
            (ParamType::Lob, SqlValue::Integer(i)) => SqlValue::Blob(i.to_string().into_bytes()),
            (ParamType::Lob, SqlValue::Real(f)) => SqlValue::Blob(f.to_string().into_bytes()),
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            SqlValue::Null => false,
            SqlValue::Integer(i) => *i != 0,
            SqlValue::Real(f) => *f != 0.0,
            SqlValue::Text(s) => !s.is_empty() && s != "0",
            SqlValue::Blob(b) => !b.is_empty(),
        }
    }

    /// JSON rendering used by the object fetch shape.
    ///
    /// Non-finite floats have no JSON form and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SqlValue::Null => serde_json::Value::Null,
            SqlValue::Integer(i) => serde_json::Value::from(*i),
            SqlValue::Real(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SqlValue::Text(s) => serde_json::Value::String(s.clone()),
            SqlValue::Blob(b) => serde_json::Value::from(b.clone()),
        }
    }
}

/// Reads the leading integer of `s` the way loose numeric casts do:
/// `"42abc"` is 42, `"abc"` is 0. Out-of-range digit runs saturate at
/// `i64::MAX` / `i64::MIN`.
fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    let digits = &s[..end];
    match digits.parse() {
        Ok(n) => n,
        Err(_) if !digits.bytes().any(|b| b.is_ascii_digit()) => 0,
        Err(_) if digits.starts_with('-') => i64::MIN,
        Err(_) => i64::MAX,
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write!(f, "{}", r),
            SqlValue::Text(t) => write!(f, "{}", t),
            SqlValue::Blob(b) => write!(f, "<BLOB: {} bytes>", b.len()),
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            SqlValue::Null => ValueRef::Null,
            SqlValue::Integer(i) => ValueRef::Integer(*i),
            SqlValue::Real(f) => ValueRef::Real(*f),
            SqlValue::Text(s) => ValueRef::Text(s.as_bytes()),
            SqlValue::Blob(b) => ValueRef::Blob(b),
        }))
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SqlValue::Null => serializer.serialize_none(),
            SqlValue::Integer(i) => serializer.serialize_i64(*i),
            SqlValue::Real(f) => serializer.serialize_f64(*f),
            SqlValue::Text(s) => serializer.serialize_str(s),
            SqlValue::Blob(b) => b.serialize(serializer),
        }
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Integer(i64::from(v))
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        SqlValue::Integer(i64::from(v))
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Integer(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        SqlValue::Text(v.clone())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Blob(v)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(v: &[u8]) -> Self {
        SqlValue::Blob(v.to_vec())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// Builds a `Vec<SqlValue>` parameter list from mixed literals.
///
/// Usage: `params!["steve", 42, None::<i64>]`
#[macro_export]
macro_rules! params {
    ($($val:expr),* $(,)?) => {
        vec![$($crate::SqlValue::from($val)),*]
    };
}
