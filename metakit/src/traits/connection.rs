//! Connection trait and the row iterator it returns

use crate::error::Result;
use crate::traits::{FromRow, Row};
use crate::value::Value;
use async_trait::async_trait;

/// Result of a statement execution
#[derive(Debug, Clone)]
pub struct ExecuteResult {
    /// Number of rows affected by the statement
    pub rows_affected: u64,
    /// Last insert ID (for INSERT statements, where the backend reports one)
    pub last_insert_id: Option<u64>,
}

/// Trait for database connection handles.
///
/// This is the only thing the raw-SQL paginators need from a driver: run a
/// query with positional arguments and hand back the rows. The placeholder
/// syntax inside `sql` must match the backend (`?` for MySQL and SQLite,
/// `$N` for PostgreSQL).
#[async_trait]
pub trait Connection: Send + Sync {
    /// Row type produced by this backend.
    type Row: Row + Send;

    /// Run a query and return its rows.
    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Rows<Self::Row>>;

    /// Run a statement that produces no rows.
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecuteResult>;
}

#[async_trait]
impl<C: Connection + ?Sized> Connection for &C {
    type Row = C::Row;

    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Rows<Self::Row>> {
        (**self).query(sql, params).await
    }

    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecuteResult> {
        (**self).execute(sql, params).await
    }
}

/// Rows returned by a paginated query.
///
/// The rows are owned; dropping the iterator releases them, so every exit
/// path of the consuming code frees the result set.
#[derive(Debug)]
pub struct Rows<R> {
    inner: std::vec::IntoIter<R>,
}

impl<R> Rows<R> {
    /// Wrap already-fetched rows.
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            inner: rows.into_iter(),
        }
    }

    /// Whether no rows remain.
    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }
}

impl<R: Row> Rows<R> {
    /// Map every remaining row into `T`.
    pub fn decode<T: FromRow>(self) -> Result<Vec<T>> {
        self.map(|row| T::from_row(&row)).collect()
    }
}

impl<R> Iterator for Rows<R> {
    type Item = R;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<R> ExactSizeIterator for Rows<R> {}

impl<R> From<Vec<R>> for Rows<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::new(rows)
    }
}
