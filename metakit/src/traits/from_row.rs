//! Row access and row-to-struct mapping

use crate::error::{Error, Result};
use crate::value::Value;

/// A database row that can be queried by column name.
///
/// Every backend decodes its driver rows into an implementation of this
/// trait, so paginated results read the same way on MySQL, PostgreSQL and
/// SQLite.
pub trait Row {
    /// Get a value from the row by column name as a dynamic Value.
    ///
    /// Returns an error if the column doesn't exist.
    fn get_value(&self, column: &str) -> Result<Value>;
}

/// Extension trait for typed access to row values.
pub trait RowExt: Row {
    /// Get a typed value from the row by column name.
    ///
    /// A NULL read into a non-`Option` type is reported as
    /// [`Error::UnexpectedNull`] naming the column.
    fn get<T: crate::FromValue>(&self, column: &str) -> Result<T> {
        let value = self.get_value(column)?;
        let is_null = value.is_null();
        T::from_value(value).map_err(|err| match err {
            Error::TypeConversion { .. } if is_null => Error::UnexpectedNull(column.to_string()),
            other => other,
        })
    }
}

impl<R: Row> RowExt for R {}

/// A row decoded into owned values, in select-list order.
///
/// Every bundled backend returns these. Lookups are linear, which beats
/// hashing for the handful of columns a page row carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRow {
    columns: Vec<(String, Value)>,
}

impl ValueRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.columns.push((column.into(), value));
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names and values, in select-list order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Row for ValueRow {
    /// The first column with this name wins, as with duplicate names in a
    /// select list.
    fn get_value(&self, column: &str) -> Result<Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for ValueRow {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// Trait for types that can be constructed from a database row.
///
/// ```ignore
/// use metakit::{FromRow, Row, RowExt, Result};
///
/// pub struct Item {
///     pub id: i64,
///     pub name: String,
/// }
///
/// impl FromRow for Item {
///     fn from_row<R: Row>(row: &R) -> Result<Self> {
///         Ok(Self {
///             id: row.get("id")?,
///             name: row.get("name")?,
///         })
///     }
///
///     fn column_names() -> &'static [&'static str] {
///         &["id", "name"]
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Construct an instance of this type from a database row.
    fn from_row<R: Row>(row: &R) -> Result<Self>;

    /// Get the column names that this type reads from.
    ///
    /// [`Select::of`](crate::Select::of) uses these as the projection.
    fn column_names() -> &'static [&'static str];
}
