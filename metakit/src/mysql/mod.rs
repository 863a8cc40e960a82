//! MySQL backend for metakit

mod pool;
mod row;
mod types;

pub use pool::{MySqlPool, MySqlPoolBuilder};
pub use row::MySqlRow;
