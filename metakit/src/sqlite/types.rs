//! Value conversion between metakit and sqlx's SQLite driver

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row as _, Sqlite, TypeInfo, ValueRef};

use crate::error::Result;
use crate::value::Value;

pub(super) type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Bind one argument to a query.
///
/// SQLite has no decimal or JSON storage class, so both bind as text.
pub(super) fn bind_value(query: SqliteQuery<'_>, value: Value) -> SqliteQuery<'_> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(v) => query.bind(v),
        Value::I32(v) => query.bind(v),
        Value::I64(v) => query.bind(v),
        Value::U64(v) => match i64::try_from(v) {
            Ok(v) => query.bind(v),
            Err(_) => query.bind(v.to_string()),
        },
        Value::F64(v) => query.bind(v),
        Value::String(v) => query.bind(v),
        Value::Bytes(v) => query.bind(v),
        Value::Date(v) => query.bind(v),
        Value::DateTime(v) => query.bind(v),
        Value::Time(v) => query.bind(v),
        Value::Decimal(v) => query.bind(v.to_string()),
        Value::Json(v) => query.bind(v.to_string()),
    }
}

/// Decode column `index` by its storage class.
///
/// Declared column types are only affinities in SQLite; the value's own
/// storage class decides the variant.
pub(super) fn from_sqlite_column(row: &SqliteRow, index: usize) -> Result<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let value = match raw.type_info().name() {
        "INTEGER" | "BOOLEAN" => Value::I64(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" => Value::F64(row.try_get_unchecked::<f64, _>(index)?),
        "BLOB" => Value::Bytes(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };

    Ok(value)
}
