//! Value conversion between metakit and sqlx's PostgreSQL driver

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgArgumentBuffer, PgArguments, PgRow, PgTypeInfo};
use sqlx::{Encode, Postgres, Row as _, Type, TypeInfo, ValueRef};

use crate::error::{Error, Result};
use crate::value::Value;

pub(super) type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// A NULL parameter declared with OID 0, leaving its type to the server.
///
/// Binding `Option<T>` would pin the parameter to `T`, and a text NULL
/// compared against a bigint column has no matching operator.
struct UntypedNull;

impl Type<Postgres> for UntypedNull {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_oid(Oid(0))
    }
}

impl Encode<'_, Postgres> for UntypedNull {
    fn encode_by_ref(
        &self,
        _buf: &mut PgArgumentBuffer,
    ) -> std::result::Result<IsNull, BoxDynError> {
        Ok(IsNull::Yes)
    }
}

/// Bind one argument to a query.
///
/// Postgres has no unsigned integers; a `U64` outside `i64` range binds as
/// numeric.
pub(super) fn bind_value(query: PgQuery<'_>, value: Value) -> PgQuery<'_> {
    match value {
        Value::Null => query.bind(UntypedNull),
        Value::Bool(v) => query.bind(v),
        Value::I32(v) => query.bind(v),
        Value::I64(v) => query.bind(v),
        Value::U64(v) => match i64::try_from(v) {
            Ok(v) => query.bind(v),
            Err(_) => query.bind(Decimal::from(v)),
        },
        Value::F64(v) => query.bind(v),
        Value::String(v) => query.bind(v),
        Value::Bytes(v) => query.bind(v),
        Value::Date(v) => query.bind(v),
        Value::DateTime(v) => query.bind(v),
        Value::Time(v) => query.bind(v),
        Value::Decimal(v) => query.bind(v),
        Value::Json(v) => query.bind(v),
    }
}

/// Decode column `index` by its declared Postgres type.
pub(super) fn from_pg_column(row: &PgRow, index: usize) -> Result<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        "BOOL" => Value::Bool(row.try_get(index)?),
        "INT2" => Value::I32(row.try_get::<i16, _>(index)?.into()),
        "INT4" => Value::I32(row.try_get(index)?),
        "INT8" => Value::I64(row.try_get(index)?),
        "FLOAT4" => Value::F64(row.try_get::<f32, _>(index)?.into()),
        "FLOAT8" => Value::F64(row.try_get(index)?),
        "NUMERIC" => Value::Decimal(row.try_get(index)?),
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => Value::String(row.try_get(index)?),
        "BYTEA" => Value::Bytes(row.try_get(index)?),
        "DATE" => Value::Date(row.try_get::<NaiveDate, _>(index)?),
        "TIMESTAMP" => Value::DateTime(row.try_get::<NaiveDateTime, _>(index)?),
        "TIMESTAMPTZ" => Value::DateTime(row.try_get::<DateTime<Utc>, _>(index)?.naive_utc()),
        "TIME" => Value::Time(row.try_get::<NaiveTime, _>(index)?),
        "JSON" | "JSONB" => Value::Json(row.try_get(index)?),
        _ => {
            return Err(Error::TypeConversion {
                expected: "supported postgres column type",
                actual: type_name,
            })
        }
    };

    Ok(value)
}
