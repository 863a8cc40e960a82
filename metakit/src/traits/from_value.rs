//! FromValue trait for converting decoded column values to Rust types

use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;

/// Trait for types that can be constructed from a database value.
pub trait FromValue: Sized {
    /// Convert a database value to this type.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(expected: &'static str, value: &Value) -> Result<T> {
    Err(Error::TypeConversion {
        expected,
        actual: value.type_name().to_string(),
    })
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            // MySQL TINYINT(1) and SQLite INTEGER booleans
            Value::I32(v) => Ok(v != 0),
            Value::I64(v) => Ok(v != 0),
            Value::U64(v) => Ok(v != 0),
            _ => mismatch("bool", &value),
        }
    }
}

/// Integer conversion that reports the out-of-range value.
fn narrow<S, T>(expected: &'static str, v: S) -> Result<T>
where
    S: TryInto<T> + Copy + fmt::Display,
{
    v.try_into().map_err(|_| Error::TypeConversion {
        expected,
        actual: format!("{} out of range", v),
    })
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I32(v) => Ok(v),
            Value::I64(v) => narrow("i32", v),
            Value::U64(v) => narrow("i32", v),
            _ => mismatch("i32", &value),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I32(v) => Ok(v.into()),
            Value::I64(v) => Ok(v),
            Value::U64(v) => narrow("i64", v),
            // COUNT(*) on some MySQL versions comes back as a decimal string
            Value::String(ref s) => s.parse().or_else(|_| mismatch("i64", &value)),
            _ => mismatch("i64", &value),
        }
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::U64(v) => Ok(v),
            Value::I32(v) => narrow("u64", v),
            Value::I64(v) => narrow("u64", v),
            _ => mismatch("u64", &value),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::I32(v) => Ok(v.into()),
            Value::I64(v) => Ok(v as f64),
            Value::Decimal(v) => v.to_f64().map_or_else(|| mismatch("f64", &value), Ok),
            _ => mismatch("f64", &value),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            Value::Bytes(v) => String::from_utf8(v).map_err(|e| Error::TypeConversion {
                expected: "string",
                actual: format!("invalid utf-8: {}", e),
            }),
            _ => mismatch("string", &value),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(v) => Ok(v),
            Value::String(v) => Ok(v.into_bytes()),
            _ => mismatch("bytes", &value),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(v) => Ok(v),
            Value::DateTime(v) => Ok(v.date()),
            _ => mismatch("date", &value),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(v) => Ok(v),
            Value::Date(v) => Ok(v.and_time(chrono::NaiveTime::MIN)),
            _ => mismatch("datetime", &value),
        }
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(v) => Ok(v),
            Value::I64(v) => Ok(Decimal::from(v)),
            Value::String(v) => v.parse().map_err(|_| Error::TypeConversion {
                expected: "decimal",
                actual: format!("invalid decimal string: {}", v),
            }),
            _ => mismatch("decimal", &value),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Json(v) => Ok(v),
            Value::String(v) => serde_json::from_str(&v).map_err(|e| Error::TypeConversion {
                expected: "json",
                actual: format!("invalid json: {}", e),
            }),
            _ => mismatch("json", &value),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(value)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i64_from_count_string() {
        assert_eq!(i64::from_value(Value::String("120".into())).unwrap(), 120);
        assert!(i64::from_value(Value::String("abc".into())).is_err());
    }

    #[test]
    fn test_i32_out_of_range() {
        let err = i32::from_value(Value::I64(i64::MAX)).unwrap_err();
        assert!(matches!(err, Error::TypeConversion { expected: "i32", .. }));
    }

    #[test]
    fn test_option_null() {
        assert_eq!(Option::<String>::from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i64>::from_value(Value::I32(4)).unwrap(), Some(4));
    }
}
