//! Default pagination values - single source of truth

/// Page size used when the caller supplies zero or a negative value
pub const PAGE_SIZE: i64 = 10;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sort direction used when the caller leaves it empty
pub const SORT_DIRECTION: &str = "asc";

/// Page a non-positive page number is normalized to
pub const FIRST_PAGE: i64 = 1;

/// Environment variable prefix read by [`PaginationConfig::load`](super::PaginationConfig::load)
pub const ENV_PREFIX: &str = "METAKIT";
