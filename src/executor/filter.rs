//! Filter executor implementation.
//!
//! This executor filters documents from a child executor based on a compiled
//! predicate. It produces one matching document at a time.

use crate::access::Document;
use crate::executor::Executor;
use crate::filter::Predicate;
use anyhow::{bail, Result};

/// Executor that filters documents based on a predicate
pub struct FilterExecutor {
    /// Child executor that produces documents
    child: Box<dyn Executor>,
    /// Predicate a document must satisfy
    predicate: Predicate,
    /// Whether the executor has been initialized
    initialized: bool,
}

impl FilterExecutor {
    /// Create a new filter executor
    ///
    /// # Arguments
    /// * `child` - The child executor that produces documents
    /// * `predicate` - The predicate each returned document satisfies
    pub fn new(child: Box<dyn Executor>, predicate: Predicate) -> Self {
        Self {
            child,
            predicate,
            initialized: false,
        }
    }
}

impl Executor for FilterExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.child.init()?;
        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Document>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        // Keep pulling from the child until a document matches
        while let Some(document) = self.child.next()? {
            if self.predicate.matches(&document) {
                return Ok(Some(document));
            }
        }
        Ok(None)
    }
}
