//! List service facade.
//!
//! The one entry point transports call: resolve the sort, decode the cursor,
//! clamp the limit, build the predicate, and run it.

use crate::error::{ListError, ListResult};
use crate::executor::PageExecutor;
use crate::record::ResourceRecord;
use crate::storage::QueryExecutor;
use list_core::{codec, predicate, Collection, Cursor, LimitPolicy, SortSpec};
use list_types::ListQuery;

/// One page fetched from raw request fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Sort the page was fetched under; cursors for it are built from this.
    pub spec: SortSpec,
    /// Whether the page was fetched with a `before` cursor.
    pub backward: bool,
    /// Records as returned by [`ListService::list`].
    pub records: Vec<ResourceRecord>,
}

/// Cursor-paginated listings over soft-deletable collections.
#[derive(Debug)]
pub struct ListService<E> {
    pages: PageExecutor<E>,
    limits: LimitPolicy,
}

impl<E: QueryExecutor> ListService<E> {
    /// Create a service over a backend.
    pub fn new(executor: E, limits: LimitPolicy) -> Self {
        Self {
            pages: PageExecutor::new(executor),
            limits,
        }
    }

    /// Page size policy in effect.
    pub fn limits(&self) -> LimitPolicy {
        self.limits
    }

    /// Get access to the backend.
    pub fn executor(&self) -> &E {
        self.pages.executor()
    }

    /// Fetch one page.
    ///
    /// `after` pages come back in sort order. `before` pages come back
    /// nearest-the-cursor first, i.e. in reverse sort order.
    pub async fn list(
        &self,
        collection: &Collection,
        filter: Option<&str>,
        spec: &SortSpec,
        cursor: &Cursor,
        limit: Option<i64>,
    ) -> ListResult<Vec<ResourceRecord>> {
        let limit = self.limits.clamp(limit);
        let predicate = predicate::build(collection, filter, spec, cursor, limit)?;

        let records = self.pages.execute(collection, &predicate).await?;

        tracing::debug!(
            table = collection.table,
            sort = spec.field(),
            order = %predicate.order(),
            limit,
            rows = records.len(),
            "Listed page"
        );

        Ok(records)
    }

    /// Fetch one page from the raw request fields.
    pub async fn list_query(
        &self,
        collection: &Collection,
        query: &ListQuery,
    ) -> ListResult<Page> {
        let spec = collection.sort_spec(query.sort_by.as_deref(), query.sort_order)?;
        let cursor = codec::decode(&spec, query)?;

        let records = self
            .list(collection, query.query.as_deref(), &spec, &cursor, query.limit)
            .await?;

        Ok(Page {
            spec,
            backward: cursor.is_before(),
            records,
        })
    }
}
