//! metakit - offset/limit pagination metadata
//!
//! Normalizes page/page-size/sort parameters, computes total pages and row
//! offsets, and applies the resulting window to a query.
//!
//! # Features
//!
//! - **Metadata**: serde-ready request/response record with normalization rules
//! - **Builder scopes**: `paginate(&mut meta)` for any [`OffsetLimit`] builder,
//!   including the bundled [`Select`] builder
//! - **Raw SQL**: [`s_paginate`] (literal window) and
//!   [`query_context_paginate`] (bound window, per-dialect placeholders,
//!   cancellable)
//! - **Backends**: MySQL via `mysql_async`, SQLite and PostgreSQL via `sqlx`
//!
//! # Example
//!
//! ```ignore
//! use metakit::{query_context_paginate, Dialect, Metadata, MySqlPool, QueryContext, Value};
//!
//! async fn list_items(pool: &MySqlPool, mut meta: Metadata) -> metakit::Result<Metadata> {
//!     meta.total_rows = count_items(pool).await?;
//!
//!     let rows = query_context_paginate(
//!         &QueryContext::background(),
//!         pool,
//!         Dialect::MySql,
//!         "SELECT id, name FROM items WHERE owner_id = ?",
//!         &mut meta,
//!         vec![Value::I64(42)],
//!     )
//!     .await?;
//!
//!     for row in rows {
//!         // ...
//!     }
//!     Ok(meta)
//! }
//! ```

pub mod config;
pub mod context;
pub mod dialect;
pub mod error;
pub mod metadata;
pub mod paginator;
pub mod query;
pub mod scope;
pub mod traits;
pub mod value;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod testing;

// Re-export main types
pub use config::PaginationConfig;
pub use context::QueryContext;
pub use dialect::{Dialect, PaginatedSql};
pub use error::{Error, Result};
pub use metadata::Metadata;
pub use paginator::{query_context_paginate, s_paginate, Paginator};
pub use query::{Select, SortOrder};
pub use scope::{paginate, paginate_with, OffsetLimit, Scopes};
pub use traits::{
    Connection, ExecuteResult, FromRow, FromValue, Row, RowExt, Rows, ValueRow,
};
pub use value::Value;

#[cfg(feature = "mysql")]
pub use mysql::{MySqlPool, MySqlPoolBuilder, MySqlRow};
#[cfg(feature = "postgres")]
pub use postgres::{PgPool, PgPoolBuilder, PgRow};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqlitePool, SqlitePoolBuilder, SqliteRow};
