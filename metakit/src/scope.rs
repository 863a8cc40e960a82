//! Query-builder scopes
//!
//! A scope is a closure `B -> B` over a query builder, applied with
//! [`Scopes::scopes`]. [`paginate`] produces one that normalizes the
//! metadata and sets `OFFSET`/`LIMIT` on any builder implementing
//! [`OffsetLimit`].

use crate::config::PaginationConfig;
use crate::metadata::Metadata;

/// Query builders that can be windowed with `OFFSET` and `LIMIT`.
pub trait OffsetLimit: Sized {
    fn offset(self, offset: i64) -> Self;
    fn limit(self, limit: i64) -> Self;
}

/// Apply closures to a builder in a method chain.
///
/// ```ignore
/// let query = Select::from("items")
///     .filter("owner_id = ?")
///     .bind(owner)
///     .order_by("id", SortOrder::Asc)
///     .scopes(paginate(&mut meta));
/// ```
pub trait Scopes: Sized {
    fn scopes<F>(self, scope: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        scope(self)
    }
}

impl<B: OffsetLimit> Scopes for B {}

/// Scope that paginates a builder according to `m`.
///
/// When the scope runs, `m` is normalized, `total_pages` is recomputed from
/// `total_rows`, and the builder gets `.offset((page - 1) * page_size)` and
/// `.limit(page_size)`.
///
/// No ordering is applied: sort the builder yourself before paginating, or
/// page boundaries are whatever order the database happens to return.
pub fn paginate<B: OffsetLimit>(m: &mut Metadata) -> impl FnOnce(B) -> B + '_ {
    paginate_with(m, PaginationConfig::default())
}

/// [`paginate`] with explicit bounds.
pub fn paginate_with<B: OffsetLimit>(
    m: &mut Metadata,
    config: PaginationConfig,
) -> impl FnOnce(B) -> B + '_ {
    move |builder| {
        m.normalize_with(&config);
        builder.offset(m.offset()).limit(m.page_size)
    }
}
