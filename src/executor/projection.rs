//! Projection executor implementation.
//!
//! This executor keeps only the listed fields of each document from its
//! child (inclusion projection). The `_id` field is always kept.

use crate::access::Document;
use crate::executor::Executor;
use anyhow::{bail, Result};

/// Executor that projects specific fields from child documents
pub struct ProjectionExecutor {
    /// Child executor that produces documents
    child: Box<dyn Executor>,
    /// Fields to keep
    fields: Vec<String>,
    /// Whether the executor has been initialized
    initialized: bool,
}

impl ProjectionExecutor {
    /// Create a new projection executor
    ///
    /// # Example
    /// ```ignore
    /// // If child produces {_id, name, altitude, region}
    /// // fields ["name", "region"] would produce {_id, name, region}
    /// ```
    pub fn new(child: Box<dyn Executor>, fields: Vec<String>) -> Self {
        Self {
            child,
            fields,
            initialized: false,
        }
    }
}

impl Executor for ProjectionExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        if self.fields.iter().any(|field| field.is_empty()) {
            bail!("Projection field names must not be empty");
        }

        self.child.init()?;
        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Document>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        Ok(self
            .child
            .next()?
            .map(|document| document.project(&self.fields)))
    }
}
