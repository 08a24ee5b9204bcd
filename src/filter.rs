//! Filter compilation for list queries.
//!
//! This module provides:
//! - Operator detection for `field<op>value` clauses
//! - Numeric coercion of value literals
//! - The predicate tree and its evaluation against documents
//! - The compiler that turns a filter string into a predicate

pub mod compiler;
pub mod error;
pub mod literal;
pub mod operator;
pub mod predicate;

pub use compiler::{compile, FilterCompiler, FilterOptions};
pub use error::{FilterError, FilterResult};
pub use literal::coerce_literal;
pub use operator::{Comparison, FilterOperator};
pub use predicate::{Condition, Pattern, Predicate};
