//! MySQL row decoding

use crate::error::{Error, Result};
use crate::traits::ValueRow;

use super::types::from_mysql_value;

/// Rows returned by [`MySqlPool`](super::MySqlPool).
pub type MySqlRow = ValueRow;

pub(super) fn decode_row(row: mysql_async::Row) -> Result<MySqlRow> {
    let columns = row.columns();
    columns
        .iter()
        .zip(row.unwrap_raw())
        .map(|(column, value)| {
            let name = column.name_str().into_owned();
            // A value is only missing if it was taken out of the row
            let value = value.ok_or_else(|| Error::ColumnNotFound(name.clone()))?;
            Ok((name, from_mysql_value(value)?))
        })
        .collect()
}
