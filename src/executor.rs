//! Executor layer for query execution.
//!
//! This module implements the Volcano-style iterator model used by the
//! in-memory document store. Each executor produces documents one at a time
//! via the `next()` method, so a find is composed as
//! `SeqScan -> Filter -> Sort -> Limit -> Projection`.

use crate::access::Document;
use anyhow::Result;

pub mod filter;
pub mod limit;
pub mod projection;
pub mod seq_scan;
pub mod sort;

// Re-export executors
pub use filter::FilterExecutor;
pub use limit::LimitExecutor;
pub use projection::ProjectionExecutor;
pub use seq_scan::SeqScanExecutor;
pub use sort::{SortExecutor, SortKey, SortOrder};

/// Trait for all query executors
pub trait Executor: Send {
    /// Initialize the executor. This must be called before `next()`.
    fn init(&mut self) -> Result<()>;

    /// Get the next document from the executor.
    /// Returns None when there are no more documents.
    fn next(&mut self) -> Result<Option<Document>>;
}

/// Drain an executor into a vector, initializing it first
pub fn collect(executor: &mut dyn Executor) -> Result<Vec<Document>> {
    executor.init()?;
    let mut documents = Vec::new();
    while let Some(document) = executor.next()? {
        documents.push(document);
    }
    Ok(documents)
}
