//! Limit executor implementation.
//!
//! This executor limits the number of documents returned from a child executor.
//! It supports both LIMIT and OFFSET functionality for pagination.

use crate::access::Document;
use crate::executor::Executor;
use anyhow::{bail, Result};

/// Executor that skips and limits the documents of its child
pub struct LimitExecutor {
    /// Child executor that produces documents
    child: Box<dyn Executor>,
    /// Maximum number of documents to return, unbounded when `None`
    limit: Option<usize>,
    /// Number of documents to skip before returning
    offset: usize,
    /// Number of documents skipped so far
    skipped: usize,
    /// Number of documents returned so far
    returned: usize,
    /// Whether the executor has been initialized
    initialized: bool,
}

impl LimitExecutor {
    /// Create a new limit executor with only limit
    pub fn new(child: Box<dyn Executor>, limit: usize) -> Self {
        Self::with_offset(child, Some(limit), 0)
    }

    /// Create a new limit executor with an optional limit and an offset
    ///
    /// # Arguments
    /// * `child` - The child executor that produces documents
    /// * `limit` - The maximum number of documents to return
    /// * `offset` - The number of documents to skip before returning
    pub fn with_offset(child: Box<dyn Executor>, limit: Option<usize>, offset: usize) -> Self {
        Self {
            child,
            limit,
            offset,
            skipped: 0,
            returned: 0,
            initialized: false,
        }
    }
}

impl Executor for LimitExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.child.init()?;
        self.skipped = 0;
        self.returned = 0;
        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Document>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        if self.limit.is_some_and(|limit| self.returned >= limit) {
            return Ok(None);
        }

        while self.skipped < self.offset {
            match self.child.next()? {
                Some(_) => self.skipped += 1,
                None => return Ok(None),
            }
        }

        match self.child.next()? {
            Some(document) => {
                self.returned += 1;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }
}
