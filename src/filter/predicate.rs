//! Predicate tree produced by the filter compiler.
//!
//! A predicate is a map of field terms plus an optional conjunction of
//! fragments, mirroring the shape of a document-store filter document:
//!
//! ```text
//! {"region": {"$regex": "Cairn"}, "$and": [{"age": {"$gte": 30}}, {}]}
//! ```
//!
//! An empty predicate matches every document.

use crate::access::{Document, Value};
use crate::filter::error::{FilterError, FilterResult};
use crate::filter::operator::Comparison;
use regex::Regex;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Unanchored, unescaped regular expression applied to string fields
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> FilterResult<Self> {
        let regex = Regex::new(source).map_err(|source_err| FilterError::InvalidPattern {
            pattern: source.to_string(),
            source: source_err,
        })?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// Condition attached to one field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `field == value`
    Equals(Value),
    /// `field <op> value` for the keyed comparisons
    Compare(Comparison, Value),
    /// `field ~ pattern`
    Matches(Pattern),
}

impl Condition {
    /// Evaluate the condition against a field value (`None` when the field is missing).
    ///
    /// Array fields match when any element matches, except for `$ne` which
    /// requires that no element equals the value.
    pub fn matches(&self, field: Option<&Value>) -> bool {
        match self {
            Condition::Equals(expected) => field.is_some_and(|v| equals(v, expected)),
            Condition::Compare(Comparison::Ne, expected) => {
                !field.is_some_and(|v| equals(v, expected))
            }
            Condition::Compare(cmp, expected) => {
                field.is_some_and(|v| any_element(v, |e| compare(e, *cmp, expected)))
            }
            Condition::Matches(pattern) => field.is_some_and(|v| {
                any_element(v, |e| e.as_str().is_some_and(|s| pattern.is_match(s)))
            }),
        }
    }
}

fn equals(actual: &Value, expected: &Value) -> bool {
    actual.loose_eq(expected) || any_element(actual, |e| e.loose_eq(expected))
}

fn compare(actual: &Value, cmp: Comparison, expected: &Value) -> bool {
    let Some(ordering) = actual.partial_cmp_same_class(expected) else {
        return false;
    };
    match cmp {
        Comparison::Gt => ordering == Ordering::Greater,
        Comparison::Gte => ordering != Ordering::Less,
        Comparison::Lt => ordering == Ordering::Less,
        Comparison::Lte => ordering != Ordering::Greater,
        Comparison::Ne => ordering != Ordering::Equal,
    }
}

fn any_element(value: &Value, test: impl Fn(&Value) -> bool) -> bool {
    match value {
        Value::Array(items) => items.iter().any(test),
        other => test(other),
    }
}

/// Structured filter: field terms AND-ed with every fragment in `all_of`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    terms: BTreeMap<String, Condition>,
    all_of: Vec<Predicate>,
}

impl Predicate {
    /// Predicate that matches every document
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single-term predicate
    pub fn term(field: impl Into<String>, condition: Condition) -> Self {
        let mut predicate = Self::empty();
        predicate.insert(field, condition);
        predicate
    }

    /// Set the condition for a field, replacing any previous one
    pub fn insert(&mut self, field: impl Into<String>, condition: Condition) {
        self.terms.insert(field.into(), condition);
    }

    /// Replace the conjunction fragments
    pub fn set_all_of(&mut self, fragments: Vec<Predicate>) {
        self.all_of = fragments;
    }

    pub fn condition(&self, field: &str) -> Option<&Condition> {
        self.terms.get(field)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&String, &Condition)> {
        self.terms.iter()
    }

    pub fn all_of(&self) -> &[Predicate] {
        &self.all_of
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.all_of.is_empty()
    }

    /// Evaluate the predicate against a document
    pub fn matches(&self, document: &Document) -> bool {
        self.terms
            .iter()
            .all(|(field, condition)| condition.matches(document.get(field)))
            && self.all_of.iter().all(|fragment| fragment.matches(document))
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.terms.len() + usize::from(!self.all_of.is_empty());
        let mut map = serializer.serialize_map(Some(len))?;
        for (field, condition) in &self.terms {
            map.serialize_entry(field, condition)?;
        }
        if !self.all_of.is_empty() {
            map.serialize_entry("$and", &self.all_of)?;
        }
        map.end()
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Condition::Equals(value) => value.serialize(serializer),
            Condition::Compare(cmp, value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(cmp.tag(), value)?;
                map.end()
            }
            Condition::Matches(pattern) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$regex", pattern.as_str())?;
                map.end()
            }
        }
    }
}
