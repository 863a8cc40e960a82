//! Pagination metadata and the normalization rules applied to it

use serde::{Deserialize, Serialize};

use crate::config::{defaults, PaginationConfig};
use crate::error::{Error, Result};

/// Pagination state for one request.
///
/// The request side (`page`, `page_size`, `sort`, `sort_direction`) usually
/// comes from query-string binding. `total_rows` is filled in by the caller,
/// typically from a count query, and `total_pages` is written by the
/// paginators. Both are response-only and skipped when deserializing.
///
/// Every paginator takes `&mut Metadata` and rewrites `page`, `page_size`,
/// `sort_direction` and `total_pages` in place. Sharing one value between
/// concurrent calls needs external synchronization.
///
/// # Example
///
/// ```
/// use metakit::Metadata;
///
/// let mut m = Metadata::new(0, 0).with_total_rows(100);
/// m.normalize();
///
/// assert_eq!(m.page, 1);
/// assert_eq!(m.page_size, 10);
/// assert_eq!(m.total_pages, 10);
/// assert_eq!(m.offset(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Current page, 1-based once normalized
    #[serde(default)]
    pub page: i64,

    /// Number of items per page
    #[serde(default)]
    pub page_size: i64,

    /// Column to order by
    #[serde(default)]
    pub sort: String,

    /// `asc` or `desc`; anything else is passed through untouched
    #[serde(default)]
    pub sort_direction: String,

    /// Total number of rows matching the query, supplied by the caller
    #[serde(default, skip_deserializing)]
    pub total_rows: i64,

    /// Total number of pages, derived from `total_rows` and `page_size`
    #[serde(default, skip_deserializing)]
    pub total_pages: i64,
}

impl Metadata {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page,
            page_size,
            ..Default::default()
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sort = sort.into();
        self.sort_direction = direction.into();
        self
    }

    pub fn with_total_rows(mut self, total_rows: i64) -> Self {
        self.total_rows = total_rows;
        self
    }

    /// Set the sort field.
    pub fn sort_params(&mut self, sort: impl Into<String>) {
        self.sort = sort.into();
    }

    /// Default an empty sort direction to `asc`.
    pub fn sort_direction_params(&mut self) {
        self.sort_direction_with(&PaginationConfig::default());
    }

    /// Treat a zero or negative page as the first page.
    pub fn set_page(&mut self) {
        self.page = normalize_page(self.page);
    }

    /// Clamp the page size to `1..=100`, defaulting non-positive sizes to 10.
    pub fn set_page_size(&mut self) {
        self.page_size = normalize_page_size(self.page_size, &PaginationConfig::default());
    }

    /// Run every normalization rule with the default bounds and recompute
    /// `total_pages`.
    pub fn normalize(&mut self) {
        self.normalize_with(&PaginationConfig::default());
    }

    /// Run every normalization rule with the given bounds and recompute
    /// `total_pages`.
    pub fn normalize_with(&mut self, config: &PaginationConfig) {
        self.page = normalize_page(self.page);
        self.page_size = normalize_page_size(self.page_size, config);
        self.sort_direction_with(config);
        self.total_pages = total_pages(self.total_rows, self.page_size);

        tracing::trace!(
            page = self.page,
            page_size = self.page_size,
            total_rows = self.total_rows,
            total_pages = self.total_pages,
            "normalized pagination metadata"
        );
    }

    /// Rows to skip before the current page.
    ///
    /// Only meaningful after normalization. A page past the last one yields
    /// an offset past the end of the result set, which simply returns no rows.
    pub fn offset(&self) -> i64 {
        offset(self.page, self.page_size)
    }

    /// The `ORDER BY` pair, or `None` when no sort field is set.
    pub fn order(&self) -> Option<(&str, &str)> {
        if self.sort.is_empty() {
            None
        } else {
            Some((self.sort.as_str(), self.sort_direction.as_str()))
        }
    }

    /// Check `sort` against an allow-list and `sort_direction` against
    /// `asc`/`desc` (case-insensitive).
    ///
    /// The raw-SQL paginators interpolate both values into the statement
    /// text. Call this first whenever they come from untrusted input.
    pub fn validate_sort(&self, allowed_fields: &[&str]) -> Result<()> {
        if !self.sort.is_empty() && !allowed_fields.contains(&self.sort.as_str()) {
            return Err(Error::InvalidSort(format!(
                "sort field `{}` is not allowed",
                self.sort
            )));
        }

        if !self.sort_direction.is_empty()
            && !self.sort_direction.eq_ignore_ascii_case("asc")
            && !self.sort_direction.eq_ignore_ascii_case("desc")
        {
            return Err(Error::InvalidSort(format!(
                "sort direction `{}` must be asc or desc",
                self.sort_direction
            )));
        }

        Ok(())
    }

    fn sort_direction_with(&mut self, config: &PaginationConfig) {
        if self.sort_direction.is_empty() {
            self.sort_direction = config.default_sort_direction.clone();
        }
    }
}

/// Any page `<= 0` means "unset" and becomes the first page.
pub fn normalize_page(page: i64) -> i64 {
    if page <= 0 {
        defaults::FIRST_PAGE
    } else {
        page
    }
}

/// Clamp a requested page size to `1..=config.max_page_size`.
///
/// The config is not trusted to be valid: a max below 1 counts as 1 and the
/// default is clamped into the same range.
pub fn normalize_page_size(page_size: i64, config: &PaginationConfig) -> i64 {
    let max = config.max_page_size.max(1);
    if page_size > max {
        max
    } else if page_size <= 0 {
        config.default_page_size.clamp(1, max)
    } else {
        page_size
    }
}

/// `ceil(total_rows / page_size)` in integer arithmetic.
///
/// Same result as `(total_rows + page_size - 1) / page_size`, without the
/// overflow near `i64::MAX`. Negative totals count as zero rows, and a
/// non-positive page size yields a single page.
pub fn total_pages(total_rows: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 1;
    }
    let rows = total_rows.max(0);
    rows / page_size + i64::from(rows % page_size != 0)
}

/// `(page - 1) * page_size`, saturating at `i64::MAX`.
pub fn offset(page: i64, page_size: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(page_size).max(0)
}
