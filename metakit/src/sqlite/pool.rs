//! SQLite connection pool implementation

use std::str::FromStr;
use std::time::Duration;

use crate::error::Result;
use crate::traits::{Connection, ExecuteResult, Rows};
use crate::value::Value;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::row::{decode_row, SqliteRow};
use super::types::bind_value;

/// A SQLite connection pool.
///
/// Wraps `sqlx::SqlitePool`; clones share the same connections.
///
/// ```ignore
/// use metakit::{query_context_paginate, Dialect, Metadata, QueryContext, SqlitePool};
///
/// let pool = SqlitePool::connect("sqlite://app.db").await?;
/// let mut meta = Metadata::new(1, 20).with_sort("id", "asc");
/// let rows = query_context_paginate(
///     &QueryContext::background(),
///     &pool,
///     Dialect::Sqlite,
///     "SELECT * FROM items",
///     &mut meta,
///     vec![],
/// )
/// .await?;
/// ```
#[derive(Clone, Debug)]
pub struct SqlitePool {
    inner: sqlx::SqlitePool,
}

impl SqlitePool {
    /// Connect with default pool options.
    pub async fn connect(url: &str) -> Result<Self> {
        SqlitePoolBuilder::new(url).build().await
    }

    /// A private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` opens its own database, so the
    /// pool is pinned to a single connection that never expires.
    pub async fn in_memory() -> Result<Self> {
        SqlitePoolBuilder::new("sqlite::memory:")
            .max_connections(1)
            .idle_timeout(None)
            .build()
            .await
    }

    /// Wrap an existing sqlx pool.
    pub fn from_pool(inner: sqlx::SqlitePool) -> Self {
        Self { inner }
    }

    /// Get a reference to the underlying sqlx pool.
    pub fn inner(&self) -> &sqlx::SqlitePool {
        &self.inner
    }

    /// Close every connection in the pool.
    pub async fn close(&self) {
        self.inner.close().await;
    }

    /// See [`SqlitePoolBuilder`].
    pub fn builder(url: &str) -> SqlitePoolBuilder {
        SqlitePoolBuilder::new(url)
    }
}

/// Builder for a [`SqlitePool`].
pub struct SqlitePoolBuilder {
    url: String,
    max_connections: Option<u32>,
    idle_timeout: Option<Option<Duration>>,
    create_if_missing: bool,
}

impl SqlitePoolBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            max_connections: None,
            idle_timeout: None,
            create_if_missing: false,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// `None` keeps idle connections open forever.
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub async fn build(self) -> Result<SqlitePool> {
        let connect_opts =
            SqliteConnectOptions::from_str(&self.url)?.create_if_missing(self.create_if_missing);

        let mut pool_opts = SqlitePoolOptions::new();
        if let Some(max) = self.max_connections {
            pool_opts = pool_opts.max_connections(max);
        }
        if let Some(timeout) = self.idle_timeout {
            pool_opts = pool_opts.idle_timeout(timeout);
            if timeout.is_none() {
                pool_opts = pool_opts.max_lifetime(None);
            }
        }

        let inner = pool_opts.connect_with(connect_opts).await?;
        Ok(SqlitePool { inner })
    }
}

#[async_trait]
impl Connection for SqlitePool {
    type Row = SqliteRow;

    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Rows<Self::Row>> {
        let query = params.into_iter().fold(sqlx::query(sql), bind_value);
        let rows = query.fetch_all(&self.inner).await?;

        let rows = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(Rows::new(rows))
    }

    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecuteResult> {
        let query = params.into_iter().fold(sqlx::query(sql), bind_value);
        let result = query.execute(&self.inner).await?;

        Ok(ExecuteResult {
            rows_affected: result.rows_affected(),
            last_insert_id: u64::try_from(result.last_insert_rowid()).ok(),
        })
    }
}
