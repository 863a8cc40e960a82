//! PostgreSQL row decoding

use crate::error::Result;
use crate::traits::ValueRow;

use super::types::from_pg_column;

/// Rows returned by [`PgPool`](super::PgPool).
pub type PgRow = ValueRow;

pub(super) fn decode_row(row: &sqlx::postgres::PgRow) -> Result<PgRow> {
    use sqlx::{Column, Row as _};

    row.columns()
        .iter()
        .map(|column| {
            let value = from_pg_column(row, column.ordinal())?;
            Ok((column.name().to_string(), value))
        })
        .collect()
}
