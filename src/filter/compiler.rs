//! Filter string compiler.
//!
//! Grammar: comma-separated clauses, each `field<op>value` with
//! `<op>` one of `==`, `>=`, `<=`, `>`, `<`, `!=`, `~`. There is no escaping
//! and no whitespace trimming, so a value containing `,` or an operator token
//! splits in unspecified ways.

use crate::filter::error::{FilterError, FilterResult};
use crate::filter::literal::coerce_literal;
use crate::filter::operator::FilterOperator;
use crate::filter::predicate::{Condition, Pattern, Predicate};
use log::{debug, warn};

/// Knobs for the filter compiler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Fail on clauses without an operator instead of dropping them
    pub reject_unknown_operators: bool,
    /// Keep the fractional part of numeric literals (`4.5` stays `4.5`)
    pub fractional_literals: bool,
}

/// A parsed clause before it is placed into a predicate
#[derive(Debug, Clone, PartialEq)]
struct Clause {
    field: String,
    operator: FilterOperator,
    condition: Condition,
}

/// Compiles filter strings into predicates
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterCompiler {
    options: FilterOptions,
}

impl FilterCompiler {
    pub fn new(options: FilterOptions) -> Self {
        Self { options }
    }

    /// Compile a filter string.
    ///
    /// A single clause compiles straight into the top-level terms. Several
    /// clauses compile into one `$and` fragment each, except that `~` clauses
    /// are merged into the top-level terms and leave their fragment empty.
    pub fn compile(&self, input: &str) -> FilterResult<Predicate> {
        let mut predicate = Predicate::empty();
        if input.is_empty() {
            return Ok(predicate);
        }

        let clauses: Vec<&str> = input.split(',').collect();

        if let [clause] = clauses.as_slice() {
            if let Some(clause) = self.parse_clause(clause)? {
                predicate.insert(clause.field, clause.condition);
            }
        } else {
            let mut fragments = Vec::with_capacity(clauses.len());
            for raw in clauses {
                let mut fragment = Predicate::empty();
                match self.parse_clause(raw)? {
                    Some(clause) if clause.operator == FilterOperator::Pattern => {
                        predicate.insert(clause.field, clause.condition);
                    }
                    Some(clause) => fragment.insert(clause.field, clause.condition),
                    None => {}
                }
                fragments.push(fragment);
            }
            predicate.set_all_of(fragments);
        }

        debug!(
            "Compiled filter '{}' into {}",
            input,
            serde_json::to_string(&predicate).unwrap_or_default()
        );
        Ok(predicate)
    }

    fn parse_clause(&self, raw: &str) -> FilterResult<Option<Clause>> {
        let Some(operator) = FilterOperator::detect(raw) else {
            if self.options.reject_unknown_operators {
                return Err(FilterError::UnrecognizedClause {
                    clause: raw.to_string(),
                });
            }
            warn!("Dropping filter clause '{}': no operator found", raw);
            return Ok(None);
        };

        let parts: Vec<&str> = raw.split(operator.token()).collect();
        let (field, value) = match parts.as_slice() {
            [field, value] if !field.is_empty() => (*field, *value),
            _ => {
                return Err(FilterError::MalformedFilterClause {
                    clause: raw.to_string(),
                    operator: operator.token(),
                })
            }
        };

        let literal = || coerce_literal(value, self.options.fractional_literals);
        let condition = match (operator, operator.comparison()) {
            (FilterOperator::Pattern, _) => Condition::Matches(Pattern::new(value)?),
            (_, Some(cmp)) => Condition::Compare(cmp, literal()),
            _ => Condition::Equals(literal()),
        };

        Ok(Some(Clause {
            field: field.to_string(),
            operator,
            condition,
        }))
    }
}

/// Compile a filter string with the default (permissive) options
pub fn compile(input: &str) -> FilterResult<Predicate> {
    FilterCompiler::default().compile(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Value;
    use crate::filter::operator::Comparison;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn test_empty_filter_matches_all() -> Result<()> {
        let predicate = compile("")?;
        assert!(predicate.is_empty());
        assert_eq!(serde_json::to_value(&predicate)?, json!({}));
        Ok(())
    }

    #[test]
    fn test_single_equality_clause() -> Result<()> {
        assert_eq!(
            compile("altitude==1200")?,
            Predicate::term("altitude", Condition::Equals(Value::Int64(1200)))
        );
        assert_eq!(
            compile("name==Ben")?,
            Predicate::term("name", Condition::Equals(Value::from("Ben")))
        );
        assert_eq!(serde_json::to_value(compile("name==Ben")?)?, json!({"name": "Ben"}));
        Ok(())
    }

    #[test]
    fn test_single_comparison_clauses() -> Result<()> {
        let cases = [
            ("altitude>1000", json!({"altitude": {"$gt": 1000}})),
            ("altitude<1000", json!({"altitude": {"$lt": 1000}})),
            ("altitude>=1000", json!({"altitude": {"$gte": 1000}})),
            ("altitude<=1000", json!({"altitude": {"$lte": 1000}})),
            ("region!=Skye", json!({"region": {"$ne": "Skye"}})),
            ("region~Cairn", json!({"region": {"$regex": "Cairn"}})),
        ];
        for (input, expected) in cases {
            assert_eq!(serde_json::to_value(compile(input)?)?, expected, "{input}");
        }
        Ok(())
    }

    #[test]
    fn test_float_literals_truncate() -> Result<()> {
        assert_eq!(
            compile("rating>=4.5")?,
            Predicate::term("rating", Condition::Compare(Comparison::Gte, Value::Int64(4)))
        );
        Ok(())
    }

    #[test]
    fn test_fractional_literals_option() -> Result<()> {
        let compiler = FilterCompiler::new(FilterOptions {
            fractional_literals: true,
            ..FilterOptions::default()
        });
        assert_eq!(
            compiler.compile("rating>=4.5")?,
            Predicate::term("rating", Condition::Compare(Comparison::Gte, Value::Float64(4.5)))
        );
        Ok(())
    }

    #[test]
    fn test_multi_clause_with_pattern_merges_to_top_level() -> Result<()> {
        assert_eq!(
            serde_json::to_value(compile("age>=30,region~Cairngorm")?)?,
            json!({
                "region": {"$regex": "Cairngorm"},
                "$and": [{"age": {"$gte": 30}}, {}]
            })
        );
        Ok(())
    }

    #[test]
    fn test_multi_clause_conjunction() -> Result<()> {
        let predicate = compile("altitude>=1000,region==Cairngorms,rating<4")?;
        assert_eq!(predicate.terms().count(), 0);
        assert_eq!(
            serde_json::to_value(&predicate)?,
            json!({"$and": [
                {"altitude": {"$gte": 1000}},
                {"region": "Cairngorms"},
                {"rating": {"$lt": 4}}
            ]})
        );
        Ok(())
    }

    #[test]
    fn test_pattern_value_is_not_coerced() -> Result<()> {
        assert_eq!(
            compile("altitude~12")?,
            Predicate::term("altitude", Condition::Matches(Pattern::new("12")?))
        );
        Ok(())
    }

    #[test]
    fn test_unknown_operator_is_dropped() -> Result<()> {
        assert!(compile("altitude")?.is_empty());

        // In a conjunction the dropped clause still takes an (empty) slot
        assert_eq!(
            serde_json::to_value(compile("altitude,name==Ben")?)?,
            json!({"$and": [{}, {"name": "Ben"}]})
        );
        Ok(())
    }

    #[test]
    fn test_unknown_operator_rejected_in_strict_mode() {
        let compiler = FilterCompiler::new(FilterOptions {
            reject_unknown_operators: true,
            ..FilterOptions::default()
        });
        let err = compiler.compile("name==Ben,altitude").unwrap_err();
        assert!(matches!(err, FilterError::UnrecognizedClause { clause } if clause == "altitude"));
    }

    #[test]
    fn test_malformed_clauses() {
        for input in ["a==b==c", "==5", "name==Ben,>3", "x>1>2"] {
            let err = compile(input).unwrap_err();
            assert!(
                matches!(err, FilterError::MalformedFilterClause { .. }),
                "{input} should be malformed"
            );
        }
    }

    #[test]
    fn test_empty_value_is_kept() -> Result<()> {
        assert_eq!(
            compile("description==")?,
            Predicate::term("description", Condition::Equals(Value::from("")))
        );
        Ok(())
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let err = compile("name~(Ben").unwrap_err();
        assert!(matches!(err, FilterError::InvalidPattern { .. }));
    }

    #[test]
    fn test_later_clause_wins_for_same_field() -> Result<()> {
        let predicate = compile("region~Skye,region~Cairn")?;
        assert_eq!(
            predicate.condition("region"),
            Some(&Condition::Matches(Pattern::new("Cairn")?))
        );
        Ok(())
    }

    #[test]
    fn test_compile_is_idempotent() -> Result<()> {
        let input = "altitude>=900,region~Cairn,name!=Ben Nevis";
        assert_eq!(compile(input)?, compile(input)?);
        Ok(())
    }
}
