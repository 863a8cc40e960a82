//! SQL dialects and the paginated statement each one gets

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::value::Value;

/// Database engine a raw query is written for.
///
/// The only difference that matters here is placeholder syntax: PostgreSQL
/// numbers its parameters (`$1`, `$2`, ...) while MySQL and SQLite use
/// positional `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[serde(alias = "mariadb")]
    MySql,
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
    Sqlite,
}

/// A statement with its bound arguments, ready for a [`Connection`](crate::Connection).
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedSql {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Dialect {
    /// Placeholder for the 1-based parameter `index`.
    pub fn placeholder(self, index: usize) -> Cow<'static, str> {
        match self {
            Dialect::Postgres => Cow::Owned(format!("${}", index)),
            Dialect::MySql | Dialect::Sqlite => Cow::Borrowed("?"),
        }
    }

    /// Append ordering and a bound `LIMIT`/`OFFSET` to `query`.
    ///
    /// `args` are the arguments already bound by `query`; `limit` and
    /// `offset` are appended after them, in that order, and their
    /// placeholders continue the numbering for PostgreSQL.
    pub fn paginate(
        self,
        query: &str,
        order: Option<(&str, &str)>,
        limit: i64,
        offset: i64,
        mut args: Vec<Value>,
    ) -> PaginatedSql {
        let mut sql = String::from(query);
        push_order(&mut sql, order);

        let limit_at = args.len() + 1;
        sql.push_str(" LIMIT ");
        sql.push_str(&self.placeholder(limit_at));
        sql.push_str(" OFFSET ");
        sql.push_str(&self.placeholder(limit_at + 1));

        args.push(Value::I64(limit));
        args.push(Value::I64(offset));

        PaginatedSql { sql, params: args }
    }

    /// Literal `LIMIT`/`OFFSET` tail for a builder window.
    ///
    /// MySQL and SQLite reject `OFFSET` without `LIMIT`, so an offset-only
    /// window gets the engine's "no limit" value.
    pub fn limit_clause(self, limit: Option<i64>, offset: Option<i64>) -> String {
        match (limit, offset) {
            (None, None) => String::new(),
            (Some(limit), None) => format!(" LIMIT {}", limit),
            (Some(limit), Some(offset)) => format!(" LIMIT {} OFFSET {}", limit, offset),
            (None, Some(offset)) => match self {
                Dialect::Postgres => format!(" OFFSET {}", offset),
                Dialect::MySql => format!(" LIMIT 18446744073709551615 OFFSET {}", offset),
                Dialect::Sqlite => format!(" LIMIT -1 OFFSET {}", offset),
            },
        }
    }

    /// Name as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
        }
    }
}

/// Append ordering and a literal `LIMIT`/`OFFSET` to `query`.
///
/// Used by the single-dialect paginator. The numbers are generated here, but
/// the sort field and direction are copied verbatim into the statement.
pub fn paginate_literal(
    query: &str,
    order: Option<(&str, &str)>,
    limit: i64,
    offset: i64,
) -> String {
    let mut sql = String::from(query);
    push_order(&mut sql, order);
    sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
    sql
}

fn push_order(sql: &mut String, order: Option<(&str, &str)>) {
    if let Some((field, direction)) = order {
        sql.push_str(" ORDER BY ");
        sql.push_str(field);
        if !direction.is_empty() {
            sql.push(' ');
            sql.push_str(direction);
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(Error::Config(format!("unknown SQL dialect: {}", other))),
        }
    }
}
