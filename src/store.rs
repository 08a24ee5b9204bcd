//! Document store interface.
//!
//! The pagination engine and the service only talk to a store through
//! [`DocumentStore`]: a total count over a predicate, and a bounded, sorted,
//! projected find. [`MemoryStore`] is the in-process implementation.

pub mod memory;

pub use memory::MemoryStore;

use crate::access::Document;
use crate::executor::SortKey;
use crate::filter::Predicate;
use thiserror::Error;

/// Errors raised by a document store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Query execution failed: {0}")]
    Execution(#[from] anyhow::Error),

    #[error("Failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Options of a find: predicate, projection, sort, skip and limit.
///
/// Sort applies before skip and limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub predicate: Predicate,
    /// Inclusion-only field list; empty means the full document
    pub projection: Vec<String>,
    pub sort: Vec<SortKey>,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            ..Self::default()
        }
    }

    pub fn projection(mut self, fields: Vec<String>) -> Self {
        self.projection = fields;
        self
    }

    pub fn sort(mut self, keys: Vec<SortKey>) -> Self {
        self.sort = keys;
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Query executor over one collection
pub trait DocumentStore: Send + Sync {
    /// Count the documents matching a predicate, ignoring skip and limit
    fn count(&self, predicate: &Predicate) -> StoreResult<u64>;

    /// Fetch the documents selected by `options`
    fn find(&self, options: &FindOptions) -> StoreResult<Vec<Document>>;

    /// Fetch the first document matching a predicate
    fn find_one(&self, predicate: &Predicate) -> StoreResult<Option<Document>> {
        let options = FindOptions::new(predicate.clone()).limit(1);
        Ok(self.find(&options)?.into_iter().next())
    }
}
