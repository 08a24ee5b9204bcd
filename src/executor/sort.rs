//! Sort executor implementation.
//!
//! This executor materializes every document from its child and returns them
//! ordered by a list of sort keys. Missing fields sort as null, and values of
//! different classes follow the store's class order (see `ValueClass`).

use crate::access::{Document, Value};
use crate::executor::Executor;
use anyhow::{bail, Result};
use std::cmp::Ordering;

/// Sort order for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Resolve a sort index: positive sorts ascending, negative descending
    pub fn from_index(index: i64) -> Self {
        if index < 0 {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn index(&self) -> i64 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// One `(field, order)` pair of a sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

impl SortKey {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }
}

/// Executor that sorts documents by a list of keys
pub struct SortExecutor {
    /// Child executor that produces documents
    child: Box<dyn Executor>,
    /// Sort keys (in order of precedence)
    keys: Vec<SortKey>,
    /// Materialized and sorted documents
    sorted: Vec<Document>,
    /// Current position in `sorted`
    current_position: usize,
    /// Whether the executor has been initialized
    initialized: bool,
}

impl SortExecutor {
    pub fn new(child: Box<dyn Executor>, keys: Vec<SortKey>) -> Self {
        Self {
            child,
            keys,
            sorted: Vec::new(),
            current_position: 0,
            initialized: false,
        }
    }

    fn compare_documents(keys: &[SortKey], a: &Document, b: &Document) -> Ordering {
        for key in keys {
            let v1 = a.get(&key.field).unwrap_or(&Value::Null);
            let v2 = b.get(&key.field).unwrap_or(&Value::Null);

            let cmp = match key.order {
                SortOrder::Asc => v1.sort_cmp(v2),
                SortOrder::Desc => v2.sort_cmp(v1),
            };
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    }
}

impl Executor for SortExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.child.init()?;

        // Materialize all documents from child
        self.sorted.clear();
        while let Some(document) = self.child.next()? {
            self.sorted.push(document);
        }

        // Stable, so ties keep storage order
        let keys = &self.keys;
        self.sorted
            .sort_by(|a, b| Self::compare_documents(keys, a, b));

        self.current_position = 0;
        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Document>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        if self.current_position >= self.sorted.len() {
            return Ok(None);
        }

        let document = self.sorted[self.current_position].clone();
        self.current_position += 1;
        Ok(Some(document))
    }
}
