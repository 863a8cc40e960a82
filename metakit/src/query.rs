//! SELECT builder with pagination scope support

use std::fmt;

use crate::config::PaginationConfig;
use crate::dialect::{Dialect, PaginatedSql};
use crate::error::Result;
use crate::metadata::Metadata;
use crate::scope::{paginate_with, OffsetLimit, Scopes};
use crate::traits::{Connection, FromRow, Rows};
use crate::value::Value;

/// Sort order for [`Select::order_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Parse a request sort direction; anything but `desc` sorts ascending.
    pub fn from_direction(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A SELECT statement builder.
///
/// Filter clauses are written with `?` markers and values are attached with
/// [`bind`](Self::bind) in the same order. [`to_sql`](Self::to_sql) rewrites
/// the markers for the target dialect. A literal `?` inside a filter string
/// is treated as a marker too.
///
/// # Example
///
/// ```ignore
/// use metakit::{Dialect, Metadata, Select, SortOrder};
///
/// let mut meta = Metadata::new(2, 20).with_total_rows(total);
/// let items: Vec<Item> = Select::of::<Item>("items")
///     .filter("owner_id = ?")
///     .bind(owner_id)
///     .order_by("id", SortOrder::Asc)
///     .paginate(&mut meta)
///     .fetch_all(&pool, Dialect::MySql)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Select {
    table: String,
    columns: Vec<String>,
    filters: Vec<String>,
    params: Vec<Value>,
    order_by: Vec<(String, SortOrder)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Select {
    /// Select every column of `table`.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            params: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Select the columns `T` reads from `table`.
    pub fn of<T: FromRow>(table: impl Into<String>) -> Self {
        Self::from(table).columns(T::column_names())
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a WHERE condition. Several conditions are parenthesized and
    /// joined with AND.
    pub fn filter(mut self, clause: impl Into<String>) -> Self {
        self.filters.push(clause.into());
        self
    }

    /// Bind a value to the next `?` marker.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by.push((field.into(), order));
        self
    }

    /// Order by the metadata's sort field, if it has one.
    pub fn order_by_metadata(self, m: &Metadata) -> Self {
        match m.order() {
            Some((field, direction)) => {
                let order = SortOrder::from_direction(direction);
                self.order_by(field, order)
            }
            None => self,
        }
    }

    /// Paginate with the default bounds; see [`paginate`](crate::paginate).
    pub fn paginate(self, m: &mut Metadata) -> Self {
        self.paginate_with(m, PaginationConfig::default())
    }

    pub fn paginate_with(self, m: &mut Metadata, config: PaginationConfig) -> Self {
        self.scopes(paginate_with(m, config))
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Render the statement for `dialect`.
    pub fn to_sql(&self, dialect: Dialect) -> PaginatedSql {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}", columns, self.table);

        if !self.filters.is_empty() {
            let mut index = 0;
            let grouped = self.filters.len() > 1;
            let conditions: Vec<String> = self
                .filters
                .iter()
                .map(|clause| {
                    let clause = renumber(clause, dialect, &mut index);
                    if grouped {
                        format!("({})", clause)
                    } else {
                        clause
                    }
                })
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        if !self.order_by.is_empty() {
            let parts: Vec<String> = self
                .order_by
                .iter()
                .map(|(field, order)| format!("{} {}", field, order))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&parts.join(", "));
        }

        sql.push_str(&dialect.limit_clause(self.limit, self.offset));

        PaginatedSql {
            sql,
            params: self.params.clone(),
        }
    }

    /// Execute and return the raw rows.
    pub async fn fetch<C: Connection>(self, conn: &C, dialect: Dialect) -> Result<Rows<C::Row>> {
        let PaginatedSql { sql, params } = self.to_sql(dialect);
        tracing::debug!(%dialect, %sql, params = params.len(), "executing select");
        conn.query(&sql, params).await
    }

    /// Execute and map every row into `T`.
    pub async fn fetch_all<T: FromRow, C: Connection>(
        self,
        conn: &C,
        dialect: Dialect,
    ) -> Result<Vec<T>> {
        self.fetch(conn, dialect).await?.decode()
    }
}

impl OffsetLimit for Select {
    fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

fn renumber(clause: &str, dialect: Dialect, index: &mut usize) -> String {
    let mut out = String::with_capacity(clause.len());
    for ch in clause.chars() {
        if ch == '?' {
            *index += 1;
            out.push_str(&dialect.placeholder(*index));
        } else {
            out.push(ch);
        }
    }
    out
}
