//! Value literal coercion for filter clauses.

use crate::access::Value;
use regex::Regex;
use std::sync::LazyLock;

static NUMERIC_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)$").expect("numeric literal pattern is valid")
});

/// Check whether a literal reads as a number
pub fn is_numeric(literal: &str) -> bool {
    NUMERIC_LITERAL.is_match(literal)
}

/// Coerce a literal into a value.
///
/// Numeric literals become `Int64`, with any fractional part truncated
/// (`4.5` becomes `4`, `.5` becomes `0`). An integer part too large for
/// `i64` saturates. When `keep_fraction` is set, literals with a fractional
/// part become `Float64` instead. Everything else stays a string.
pub fn coerce_literal(literal: &str, keep_fraction: bool) -> Value {
    if !is_numeric(literal) {
        return Value::String(literal.to_string());
    }

    if keep_fraction && literal.contains('.') {
        if let Ok(value) = literal.parse::<f64>() {
            return Value::Float64(value);
        }
    }

    Value::Int64(truncate_to_i64(literal))
}

fn truncate_to_i64(literal: &str) -> i64 {
    let (negative, unsigned) = match literal.as_bytes().first() {
        Some(b'-') => (true, &literal[1..]),
        Some(b'+') => (false, &literal[1..]),
        _ => (false, literal),
    };
    let integer_part = unsigned.split('.').next().unwrap_or("");

    let mut value: i64 = 0;
    for digit in integer_part.bytes().map(|b| i64::from(b - b'0')) {
        let next = value.checked_mul(10).and_then(|v| {
            if negative {
                v.checked_sub(digit)
            } else {
                v.checked_add(digit)
            }
        });
        match next {
            Some(v) => value = v,
            None => return if negative { i64::MIN } else { i64::MAX },
        }
    }
    value
}
