//! Core traits for metakit

mod connection;
mod from_row;
mod from_value;

pub use connection::{Connection, ExecuteResult, Rows};
pub use from_row::{FromRow, Row, RowExt, ValueRow};
pub use from_value::FromValue;
