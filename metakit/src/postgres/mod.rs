//! PostgreSQL backend for metakit

mod pool;
mod row;
mod types;

pub use pool::{PgPool, PgPoolBuilder};
pub use row::PgRow;
