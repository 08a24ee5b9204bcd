//! Access layer for document-oriented records.
//!
//! - **Value**: dynamically typed field values, comparable across numbers
//! - **Document**: one record, a field name to value map

pub mod document;
pub mod value;

pub use document::{Document, ID_FIELD};
pub use value::{Value, ValueClass};
