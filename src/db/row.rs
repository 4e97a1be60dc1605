//! Row to JSON conversion.
//!
//! Each column is decoded by the runtime type of its value, so the object
//! follows whatever columns the table has.

use serde_json::{Map, Number, Value};
use sqlx::{Column, Row, TypeInfo, ValueRef};

use super::DbRow;
use crate::{NoticeBoardError, Result};

/// Convert a row into a JSON object keyed by column name, in column order.
pub fn row_to_json(row: &DbRow) -> Result<Map<String, Value>> {
    let mut object = Map::with_capacity(row.len());
    for column in row.columns() {
        let value = decode_column(row, column.ordinal()).map_err(|e| {
            NoticeBoardError::Database(format!("column {}: {}", column.name(), e))
        })?;
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

#[cfg(feature = "sqlite")]
fn decode_column(row: &DbRow, index: usize) -> std::result::Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    // SQLite reports the storage class of the value, not the declared type.
    let type_name = raw.type_info().name().to_ascii_uppercase();

    let value = match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" => float_value(row.try_get_unchecked::<f64, _>(index)?),
        "BLOB" => bytes_value(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}

#[cfg(feature = "mysql")]
fn decode_column(row: &DbRow, index: usize) -> std::result::Result<Value, sqlx::Error> {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_ascii_uppercase();

    let value = match type_name.as_str() {
        name if name.ends_with("UNSIGNED") => {
            Value::from(row.try_get_unchecked::<u64, _>(index)?)
        }
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            Value::from(row.try_get_unchecked::<i64, _>(index)?)
        }
        "FLOAT" => float_value(f64::from(row.try_get_unchecked::<f32, _>(index)?)),
        "DOUBLE" => float_value(row.try_get_unchecked::<f64, _>(index)?),
        "DATE" => Value::String(row.try_get_unchecked::<NaiveDate, _>(index)?.to_string()),
        "TIME" => Value::String(row.try_get_unchecked::<NaiveTime, _>(index)?.to_string()),
        "DATETIME" => {
            Value::String(row.try_get_unchecked::<NaiveDateTime, _>(index)?.to_string())
        }
        "TIMESTAMP" => Value::String(
            row.try_get_unchecked::<DateTime<Utc>, _>(index)?
                .naive_utc()
                .to_string(),
        ),
        "JSON" => {
            let text = row.try_get_unchecked::<String, _>(index)?;
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        }
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
        | "GEOMETRY" => bytes_value(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        // DECIMAL travels as text and keeps its exact digits.
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}

fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn bytes_value(bytes: Vec<u8>) -> Value {
    Value::String(String::from_utf8_lossy(&bytes).into_owned())
}
