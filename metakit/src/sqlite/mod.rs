//! SQLite backend for metakit

mod pool;
mod row;
mod types;

pub use pool::{SqlitePool, SqlitePoolBuilder};
pub use row::SqliteRow;
