//! SQLite row decoding

use crate::error::Result;
use crate::traits::ValueRow;

use super::types::from_sqlite_column;

/// Rows returned by [`SqlitePool`](super::SqlitePool).
pub type SqliteRow = ValueRow;

pub(super) fn decode_row(row: &sqlx::sqlite::SqliteRow) -> Result<SqliteRow> {
    use sqlx::{Column, Row as _};

    row.columns()
        .iter()
        .map(|column| {
            let value = from_sqlite_column(row, column.ordinal())?;
            Ok((column.name().to_string(), value))
        })
        .collect()
}
