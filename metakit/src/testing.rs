//! In-memory connection for unit tests

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::traits::{Connection, ExecuteResult, Rows, ValueRow};
use crate::value::Value;

/// Serves a fixed table and honors the trailing `LIMIT x OFFSET y` of every
/// query, whether the numbers are literal or bound (`?` / `$N`).
pub(crate) struct MockConnection {
    rows: Vec<ValueRow>,
    fail_with: Option<String>,
    log: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockConnection {
    pub(crate) fn with_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        let rows = ids
            .into_iter()
            .map(|id| {
                ValueRow::from_iter([
                    ("id", Value::I64(id)),
                    ("name", Value::String(format!("Item {}", id))),
                ])
            })
            .collect();

        Self {
            rows,
            fail_with: None,
            log: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            rows: Vec::new(),
            fail_with: Some(message.to_string()),
            log: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn last_sql(&self) -> Option<String> {
        self.last().map(|(sql, _)| sql)
    }

    pub(crate) fn last_params(&self) -> Option<Vec<Value>> {
        self.last().map(|(_, params)| params)
    }

    fn last(&self) -> Option<(String, Vec<Value>)> {
        self.log.lock().unwrap().last().cloned()
    }

    fn window(sql: &str, params: &[Value]) -> (usize, usize) {
        let tail = sql.rsplit_once(" LIMIT ").map(|(_, t)| t).unwrap_or("");
        let mut tokens = tail.split_whitespace();
        let limit = tokens.next();
        let offset = tokens.nth(1);

        let bound = |token: Option<&str>, from_end: usize| -> Option<i64> {
            match token {
                Some("?") => params.get(params.len().checked_sub(from_end)?)?.as_i64(),
                Some(t) if t.starts_with('$') => {
                    let index: usize = t[1..].parse().ok()?;
                    params.get(index.checked_sub(1)?)?.as_i64()
                }
                Some(t) => t.parse().ok(),
                None => None,
            }
        };

        let limit = bound(limit, 2).unwrap_or(i64::MAX).max(0) as usize;
        let offset = bound(offset, 1).unwrap_or(0).max(0) as usize;
        (limit, offset)
    }
}

#[async_trait]
impl Connection for MockConnection {
    type Row = ValueRow;

    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Rows<Self::Row>> {
        let (limit, offset) = Self::window(sql, &params);
        self.log.lock().unwrap().push((sql.to_string(), params));

        if let Some(message) = &self.fail_with {
            return Err(Error::Query(message.clone()));
        }

        let page = self.rows.iter().skip(offset).take(limit).cloned().collect();
        Ok(Rows::new(page))
    }

    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecuteResult> {
        self.log.lock().unwrap().push((sql.to_string(), params));
        Ok(ExecuteResult {
            rows_affected: 0,
            last_insert_id: None,
        })
    }
}
