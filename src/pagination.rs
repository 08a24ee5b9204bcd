//! Pagination engine.
//!
//! A [`PageQuery`] holds everything a paginated list needs (filter, sort,
//! projection, page and limit) and runs it against a [`DocumentStore`] in two
//! separable steps: a total count ([`PageQuery::paginator`]) and a bounded
//! fetch ([`PageQuery::fetch`]). [`PageQuery::execute`] issues the count first,
//! then the fetch. The two calls are independent round-trips, so the count may
//! describe a collection that changed before the fetch ran.

use crate::access::Document;
use crate::executor::SortKey;
use crate::filter::Predicate;
use crate::store::{DocumentStore, FindOptions, StoreError};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the requested limit is below 1
pub const DEFAULT_LIMIT: i64 = 25;
/// Page used when the requested page is below 1
pub const DEFAULT_PAGE: i64 = 1;

#[derive(Error, Debug)]
pub enum PaginationError {
    #[error("A filter is required for this query")]
    FilterRequired,

    #[error(transparent)]
    QueryExecutionFailed(#[from] StoreError),
}

pub type PaginationResult<T> = Result<T, PaginationError>;

/// Whether a query may run without a filter object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterPolicy {
    /// A missing filter matches every document
    #[default]
    Optional,
    /// A missing filter fails with [`PaginationError::FilterRequired`].
    /// An empty filter that was supplied still passes.
    Required,
}

/// Pagination state derived from one count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginator {
    pub total_records: i64,
    pub total_pages: i64,
    pub offset: i64,
    pub limit: i64,
    pub page: i64,
    /// `page - 1`, or `page` itself on the first page
    pub prev_page: i64,
    /// `page + 1` (saturating), or `page` itself on the last page
    pub next_page: i64,
}

impl Paginator {
    /// Derive the paginator for a normalized page and limit.
    pub fn new(total_records: i64, page: i64, limit: i64) -> Self {
        let page = normalize_page(page);
        let limit = normalize_limit(limit);
        let total_pages = total_pages(total_records, limit);

        let prev_page = if page > 1 { page - 1 } else { page };
        let next_page = if page == total_pages {
            page
        } else {
            page.saturating_add(1)
        };

        Self {
            total_records,
            total_pages,
            offset: skip(page, limit),
            limit,
            page,
            prev_page,
            next_page,
        }
    }

    /// Render the wire metadata; an absent prev/next becomes `0`
    pub fn pagination_data(&self) -> PaginationData {
        let has_records = self.total_records > 0;
        let prev = if self.prev_page != self.page && has_records {
            self.prev_page
        } else {
            0
        };
        let next = if self.next_page != self.page && has_records && self.page <= self.total_pages
        {
            self.next_page
        } else {
            0
        };

        PaginationData {
            total: self.total_records,
            page: self.page,
            per_page: self.limit,
            prev,
            next,
            total_pages: self.total_pages,
        }
    }
}

/// Pagination metadata as returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationData {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub prev: i64,
    pub next: i64,
    pub total_pages: i64,
}

/// Paginated result envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedData<T> {
    pub data: T,
    pub pagination: PaginationData,
}

impl<T> PaginatedData<T> {
    /// Convert the data with a fallible function, keeping the metadata
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<PaginatedData<U>, E> {
        Ok(PaginatedData {
            data: f(self.data)?,
            pagination: self.pagination,
        })
    }
}

/// Normalize a requested page to at least 1
pub fn normalize_page(page: i64) -> i64 {
    if page < 1 {
        DEFAULT_PAGE
    } else {
        page
    }
}

/// Normalize a requested limit to at least 1
pub fn normalize_limit(limit: i64) -> i64 {
    if limit < 1 {
        DEFAULT_LIMIT
    } else {
        limit
    }
}

/// `ceil(total_records / limit)` for a normalized (non-zero) limit
pub fn total_pages(total_records: i64, limit: i64) -> i64 {
    let total_records = total_records.max(0);
    let limit = normalize_limit(limit);
    total_records / limit + i64::from(total_records % limit != 0)
}

/// Number of documents before `page`, never negative
pub fn skip(page: i64, limit: i64) -> i64 {
    (page - 1).saturating_mul(limit).max(0)
}

/// Configuration of one paginated query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageQuery {
    pub filter: Option<Predicate>,
    pub sort: Vec<SortKey>,
    /// Inclusion-only field list; empty means the full document
    pub projection: Vec<String>,
    pub limit: i64,
    pub page: i64,
    pub filter_policy: FilterPolicy,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        normalize_page(self.page)
    }

    pub fn limit(&self) -> i64 {
        normalize_limit(self.limit)
    }

    pub fn skip(&self) -> i64 {
        skip(self.page(), self.limit())
    }

    fn predicate(&self) -> PaginationResult<Predicate> {
        match (&self.filter, self.filter_policy) {
            (Some(filter), _) => Ok(filter.clone()),
            (None, FilterPolicy::Optional) => Ok(Predicate::empty()),
            (None, FilterPolicy::Required) => Err(PaginationError::FilterRequired),
        }
    }

    /// Count step: total matching records and the derived paginator
    pub fn paginator<S: DocumentStore + ?Sized>(&self, store: &S) -> PaginationResult<Paginator> {
        let predicate = self.predicate()?;
        let total = store.count(&predicate)?;
        let total = i64::try_from(total).unwrap_or(i64::MAX);
        Ok(Paginator::new(total, self.page(), self.limit()))
    }

    /// Fetch step: sorted, skipped, limited and projected documents
    pub fn fetch<S: DocumentStore + ?Sized>(&self, store: &S) -> PaginationResult<Vec<Document>> {
        let options = FindOptions::new(self.predicate()?)
            .projection(self.projection.clone())
            .sort(self.sort.clone())
            .skip(self.skip() as u64)
            .limit(self.limit() as u64);
        Ok(store.find(&options)?)
    }

    /// Count, then fetch, then assemble the envelope
    pub fn execute<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
    ) -> PaginationResult<PaginatedData<Vec<Document>>> {
        let paginator = self.paginator(store)?;
        let data = self.fetch(store)?;
        debug!(
            "page {}/{} returned {} of {} records",
            paginator.page,
            paginator.total_pages,
            data.len(),
            paginator.total_records
        );

        Ok(PaginatedData {
            data,
            pagination: paginator.pagination_data(),
        })
    }
}

/// Run a paginated query with an optional filter
pub fn paginate<S: DocumentStore + ?Sized>(
    store: &S,
    predicate: Option<Predicate>,
    projection: Vec<String>,
    sort: Vec<SortKey>,
    page: i64,
    limit: i64,
) -> PaginationResult<PaginatedData<Vec<Document>>> {
    PageQuery {
        filter: predicate,
        sort,
        projection,
        limit,
        page,
        filter_policy: FilterPolicy::Optional,
    }
    .execute(store)
}
