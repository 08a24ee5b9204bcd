//! Name index over the dataset.
//!
//! The index is an immutable, sorted snapshot of record identifiers, loaded
//! once at startup and shared by reference with every request. It answers the
//! navigation questions of a single-record lookup: where a record sits, which
//! identifiers surround it, and a random pick.

use crate::access::Document;
use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::path::Path;

/// Position of an identifier and its alphabetical neighbors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbors<'a> {
    pub index: usize,
    pub prev: Option<&'a str>,
    pub next: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MunroIndex {
    names: Vec<String>,
}

impl MunroIndex {
    /// Build the index; identifiers are sorted and deduplicated
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Locate an identifier. The first and last identifiers have no prev and
    /// next neighbor respectively.
    pub fn locate(&self, name: &str) -> Option<Neighbors<'_>> {
        let index = self
            .names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()?;

        let prev = index
            .checked_sub(1)
            .and_then(|i| self.names.get(i))
            .map(String::as_str);
        let next = self.names.get(index + 1).map(String::as_str);

        Some(Neighbors { index, prev, next })
    }

    /// Draw one identifier uniformly from the whole index
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.names.choose(rng).map(String::as_str)
    }
}

/// Read the dataset file: a JSON object mapping identifiers to records
pub fn load_dataset(path: &Path) -> Result<BTreeMap<String, Document>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset at {}", path.display()))?;
    let records: BTreeMap<String, Document> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse dataset at {}", path.display()))?;
    Ok(records)
}
