//! In-memory document store.
//!
//! The collection lives behind a lock as an `Arc` snapshot. Every `count` or
//! `find` reads one snapshot, so a write that lands between two calls is seen
//! by the second call only.

use crate::access::{Document, Value, ID_FIELD};
use crate::executor::{
    collect, Executor, FilterExecutor, LimitExecutor, ProjectionExecutor, SeqScanExecutor,
    SortExecutor,
};
use crate::filter::Predicate;
use crate::store::{DocumentStore, FindOptions, StoreResult};
use log::debug;
use parking_lot::RwLock;
use std::sync::Arc;

/// Field holding the public identifier of a record
pub const RECORD_ID_FIELD: &str = "id";

#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: RwLock<Arc<Vec<Document>>>,
}

impl MemoryStore {
    /// Build a store holding exactly these documents
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self {
            collection: RwLock::new(Arc::new(documents)),
        }
    }

    /// Build a store from `(identifier, record)` pairs.
    ///
    /// Records missing an `id` get their identifier; records missing an `_id`
    /// get a sequential integer in iteration order.
    pub fn seed(records: impl IntoIterator<Item = (String, Document)>) -> Self {
        let documents = records
            .into_iter()
            .enumerate()
            .map(|(i, (identifier, mut document))| {
                if !document.contains(RECORD_ID_FIELD) {
                    document.insert(RECORD_ID_FIELD, identifier);
                }
                if !document.contains(ID_FIELD) {
                    document.insert(ID_FIELD, i as i64 + 1);
                }
                document
            })
            .collect();
        Self::from_documents(documents)
    }

    /// Append a document, assigning the next `_id` when it has none
    pub fn insert(&self, mut document: Document) {
        let mut collection = self.collection.write();
        if !document.contains(ID_FIELD) {
            let next_id = collection
                .iter()
                .filter_map(|d| match d.get(ID_FIELD) {
                    Some(Value::Int64(id)) => Some(*id),
                    _ => None,
                })
                .max()
                .unwrap_or(0)
                + 1;
            document.insert(ID_FIELD, next_id);
        }
        Arc::make_mut(&mut *collection).push(document);
    }

    pub fn len(&self) -> usize {
        self.collection.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Arc<Vec<Document>> {
        self.collection.read().clone()
    }

    fn scan(&self, predicate: &Predicate) -> Box<dyn Executor> {
        let scan = Box::new(SeqScanExecutor::new(self.snapshot()));
        Box::new(FilterExecutor::new(scan, predicate.clone()))
    }
}

impl DocumentStore for MemoryStore {
    fn count(&self, predicate: &Predicate) -> StoreResult<u64> {
        let mut plan = self.scan(predicate);
        plan.init()?;

        let mut count = 0;
        while plan.next()?.is_some() {
            count += 1;
        }
        debug!("count matched {} documents", count);
        Ok(count)
    }

    fn find(&self, options: &FindOptions) -> StoreResult<Vec<Document>> {
        let mut plan = self.scan(&options.predicate);

        if !options.sort.is_empty() {
            plan = Box::new(SortExecutor::new(plan, options.sort.clone()));
        }

        if options.skip > 0 || options.limit.is_some() {
            let offset = usize::try_from(options.skip).unwrap_or(usize::MAX);
            let limit = options
                .limit
                .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX));
            plan = Box::new(LimitExecutor::with_offset(plan, limit, offset));
        }

        if !options.projection.is_empty() {
            plan = Box::new(ProjectionExecutor::new(plan, options.projection.clone()));
        }

        let documents = collect(plan.as_mut())?;
        debug!(
            "find returned {} documents (skip {}, limit {:?})",
            documents.len(),
            options.skip,
            options.limit
        );
        Ok(documents)
    }
}
