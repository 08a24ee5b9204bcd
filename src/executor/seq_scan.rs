//! Sequential scan executor implementation.

use crate::access::Document;
use crate::executor::Executor;
use anyhow::{bail, Result};
use std::sync::Arc;

/// Executor for sequential scans over a collection snapshot
pub struct SeqScanExecutor {
    snapshot: Arc<Vec<Document>>,
    position: usize,
    initialized: bool,
}

impl SeqScanExecutor {
    /// Create a new sequential scan over a snapshot of the collection
    pub fn new(snapshot: Arc<Vec<Document>>) -> Self {
        Self {
            snapshot,
            position: 0,
            initialized: false,
        }
    }
}

impl Executor for SeqScanExecutor {
    fn init(&mut self) -> Result<()> {
        self.position = 0;
        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Document>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        match self.snapshot.get(self.position) {
            Some(document) => {
                self.position += 1;
                Ok(Some(document.clone()))
            }
            None => Ok(None),
        }
    }
}
