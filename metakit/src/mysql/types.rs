//! Value conversion between metakit and mysql_async

use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use mysql_async::Value as MySqlValue;

/// Convert a bound argument to a mysql_async value
///
/// Dates outside years `0..=65535` have no MySQL encoding and are rejected.
pub fn to_mysql_value(value: &Value) -> Result<MySqlValue> {
    let value = match value {
        Value::Null => MySqlValue::NULL,
        Value::Bool(v) => MySqlValue::from(*v),
        Value::I32(v) => MySqlValue::from(*v),
        Value::I64(v) => MySqlValue::from(*v),
        Value::U64(v) => MySqlValue::from(*v),
        Value::F64(v) => MySqlValue::from(*v),
        Value::String(v) => MySqlValue::from(v.as_str()),
        Value::Bytes(v) => MySqlValue::from(v.as_slice()),
        Value::Date(v) => encode_datetime(*v, NaiveTime::MIN)?,
        Value::DateTime(v) => encode_datetime(v.date(), v.time())?,
        Value::Time(v) => MySqlValue::Time(
            false,
            0,
            v.hour() as u8,
            v.minute() as u8,
            v.second() as u8,
            micros(v),
        ),
        // No lossless native encoding; the server casts the text
        Value::Decimal(v) => MySqlValue::from(v.to_string()),
        Value::Json(v) => MySqlValue::from(v.to_string()),
    };
    Ok(value)
}

fn encode_datetime(date: NaiveDate, time: NaiveTime) -> Result<MySqlValue> {
    let year = u16::try_from(date.year())
        .map_err(|_| conversion("date with year 0..=65535", date.to_string()))?;
    Ok(MySqlValue::Date(
        year,
        date.month() as u8,
        date.day() as u8,
        time.hour() as u8,
        time.minute() as u8,
        time.second() as u8,
        micros(&time),
    ))
}

fn micros(time: &NaiveTime) -> u32 {
    time.nanosecond() / 1_000
}

/// Convert a mysql_async column value to a metakit value
pub fn from_mysql_value(value: MySqlValue) -> Result<Value> {
    let value = match value {
        MySqlValue::NULL => Value::Null,
        // Text, DECIMAL and JSON columns all arrive as bytes
        MySqlValue::Bytes(v) => match String::from_utf8(v) {
            Ok(s) => Value::String(s),
            Err(e) => Value::Bytes(e.into_bytes()),
        },
        MySqlValue::Int(v) => Value::I64(v),
        MySqlValue::UInt(v) => Value::U64(v),
        MySqlValue::Float(v) => Value::F64(v.into()),
        MySqlValue::Double(v) => Value::F64(v),
        MySqlValue::Date(year, month, day, hour, min, sec, micro) => {
            let date = NaiveDate::from_ymd_opt(year.into(), month.into(), day.into())
                .ok_or_else(|| conversion("date", format!("{}-{}-{}", year, month, day)))?;
            let time = decode_time(hour, min, sec, micro)?;
            if time == NaiveTime::MIN {
                Value::Date(date)
            } else {
                Value::DateTime(NaiveDateTime::new(date, time))
            }
        }
        // NaiveTime only covers a single day
        MySqlValue::Time(false, 0, hour, min, sec, micro) if hour < 24 => {
            Value::Time(decode_time(hour, min, sec, micro)?)
        }
        MySqlValue::Time(negative, days, hour, min, sec, _) => {
            let sign = if negative { "-" } else { "" };
            let hours = days * 24 + u32::from(hour);
            return Err(conversion(
                "time (00:00:00 to 23:59:59)",
                format!("{}{}:{:02}:{:02}", sign, hours, min, sec),
            ));
        }
    };
    Ok(value)
}

fn decode_time(hour: u8, min: u8, sec: u8, micro: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_micro_opt(hour.into(), min.into(), sec.into(), micro)
        .ok_or_else(|| conversion("time", format!("{}:{}:{}.{}", hour, min, sec, micro)))
}

fn conversion(expected: &'static str, actual: String) -> Error {
    Error::TypeConversion { expected, actual }
}
