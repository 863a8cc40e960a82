//! Raw-SQL paginators
//!
//! Both entry points normalize the metadata, append `ORDER BY`, `LIMIT` and
//! `OFFSET` to a caller-supplied base query, and run it on a [`Connection`].
//! The base query must not carry its own ordering or window.
//!
//! Driver errors come back unchanged; nothing here retries or logs them.

use crate::config::PaginationConfig;
use crate::context::QueryContext;
use crate::dialect::{paginate_literal, Dialect, PaginatedSql};
use crate::error::Result;
use crate::metadata::Metadata;
use crate::traits::{Connection, Rows};
use crate::value::Value;

/// Paginators bound to a [`PaginationConfig`].
///
/// The free functions [`s_paginate`] and [`query_context_paginate`] use
/// [`Paginator::default`].
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PaginationConfig,
}

impl Paginator {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// See [`s_paginate`].
    pub async fn s_paginate<C: Connection>(
        &self,
        conn: &C,
        query: &str,
        m: &mut Metadata,
    ) -> Result<Rows<C::Row>> {
        m.normalize_with(&self.config);
        let sql = paginate_literal(query, m.order(), m.page_size, m.offset());

        tracing::debug!(%sql, "executing paginated query");
        conn.query(&sql, Vec::new()).await
    }

    /// See [`query_context_paginate`].
    pub async fn query_context_paginate<C: Connection>(
        &self,
        ctx: &QueryContext,
        conn: &C,
        dialect: Dialect,
        query: &str,
        m: &mut Metadata,
        args: Vec<Value>,
    ) -> Result<Rows<C::Row>> {
        m.normalize_with(&self.config);
        let PaginatedSql { sql, params } =
            dialect.paginate(query, m.order(), m.page_size, m.offset(), args);

        tracing::debug!(%dialect, %sql, params = params.len(), "executing paginated query");
        ctx.run(conn.query(&sql, params)).await
    }
}

/// Paginate `query` with the page window written into the SQL text.
///
/// Runs `"{query} ORDER BY {sort} {sort_direction} LIMIT {page_size} OFFSET
/// {offset}"` with no bound arguments. `ORDER BY` is left out when `sort` is
/// empty.
///
/// `sort` and `sort_direction` are copied into the statement as-is. They must
/// not come straight from a request: check them with
/// [`Metadata::validate_sort`] first, or use [`query_context_paginate`].
pub async fn s_paginate<C: Connection>(
    conn: &C,
    query: &str,
    m: &mut Metadata,
) -> Result<Rows<C::Row>> {
    Paginator::default().s_paginate(conn, query, m).await
}

/// Paginate `query` with bound `LIMIT`/`OFFSET` arguments.
///
/// `args` are the values already bound by `query`. `page_size` and `offset`
/// are appended after them, using `$N` placeholders that continue the
/// numbering on PostgreSQL and `?` on MySQL and SQLite. The query runs under
/// `ctx`, so cancelling it or passing its deadline abandons the query.
///
/// The sort field is still interpolated; see [`s_paginate`].
pub async fn query_context_paginate<C: Connection>(
    ctx: &QueryContext,
    conn: &C,
    dialect: Dialect,
    query: &str,
    m: &mut Metadata,
    args: Vec<Value>,
) -> Result<Rows<C::Row>> {
    Paginator::default()
        .query_context_paginate(ctx, conn, dialect, query, m, args)
        .await
}
