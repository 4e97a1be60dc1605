//! Scalar values bound into SQL statements.
//!
//! Request fields reach the database as sent: a JSON number binds as a
//! number, a string as text, `null` or a missing field as NULL. Coercion
//! against the column type is left to the database.

use std::fmt;

use serde::Deserialize;
use sqlx::query::Query;

use super::Db;

type DbArguments<'q> = <Db as sqlx::Database>::Arguments<'q>;

/// A JSON scalar destined for a bind parameter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL NULL.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number, including integers beyond `i64`.
    Float(f64),
    /// Text.
    Text(String),
}

impl SqlValue {
    /// Check if this is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(v) => write!(f, "{v}"),
            SqlValue::Int(v) => write!(f, "{v}"),
            SqlValue::Float(v) => write!(f, "{v}"),
            SqlValue::Text(v) => write!(f, "{v:?}"),
        }
    }
}

/// Bind `value` as the next parameter of `query`.
pub(crate) fn bind_value<'q>(
    query: Query<'q, Db, DbArguments<'q>>,
    value: &'q SqlValue,
) -> Query<'q, Db, DbArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(v) => query.bind(*v),
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.as_str()),
    }
}
