//! Cancellation and deadlines for context-aware queries

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Cancellation token plus an optional deadline, passed into
/// [`query_context_paginate`](crate::query_context_paginate).
///
/// The query future is raced against both. When either fires the driver
/// future is dropped, which is how the async drivers abandon a query, and
/// the caller gets [`Error::Cancelled`] or [`Error::DeadlineExceeded`].
///
/// Clones share the same token, so cancelling any clone cancels them all.
///
/// ```ignore
/// let ctx = QueryContext::background().with_timeout(Duration::from_secs(2));
/// let rows = query_context_paginate(&ctx, &pool, Dialect::MySql, sql, &mut meta, vec![]).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl QueryContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Wrap an existing token, e.g. one tied to server shutdown.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Set the deadline to `timeout` from now, keeping an earlier one.
    ///
    /// A timeout too large to represent as an instant sets no deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Set the deadline, keeping an earlier one.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// A context cancelled together with this one but cancellable on its
    /// own without affecting the parent.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Drive `fut` until it completes, the token is cancelled, or the
    /// deadline passes.
    ///
    /// An already cancelled or expired context fails without polling `fut`.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if matches!(self.deadline, Some(deadline) if deadline <= Instant::now()) {
            return Err(Error::DeadlineExceeded);
        }

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(Error::Cancelled),
                result = fut => result,
            }
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .map_err(|_| Error::DeadlineExceeded)?,
            None => guarded.await,
        }
    }
}
