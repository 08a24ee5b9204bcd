//! Error types for filter compilation.

use thiserror::Error;

/// Errors that can occur while compiling a filter string
#[derive(Error, Debug)]
pub enum FilterError {
    /// Splitting the clause on its operator did not yield exactly a field and a value
    #[error("Malformed filter clause '{clause}': expected <field>{operator}<value>")]
    MalformedFilterClause {
        clause: String,
        operator: &'static str,
    },

    /// No known operator occurs in the clause (strict mode only)
    #[error("Unrecognized filter clause '{clause}': no operator found")]
    UnrecognizedClause { clause: String },

    /// The value of a `~` clause is not a valid regular expression
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
