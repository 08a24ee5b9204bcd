//! Operator definitions for filter clauses.

/// Operators recognized inside a filter clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Eq,
    Gte,
    Lte,
    Gt,
    Lt,
    Ne,
    Pattern,
}

impl FilterOperator {
    /// Detection order. A clause is classified by the first operator whose
    /// token it contains, so two-character tokens come before their prefixes.
    pub const DETECTION_ORDER: [FilterOperator; 7] = [
        FilterOperator::Eq,
        FilterOperator::Gte,
        FilterOperator::Lte,
        FilterOperator::Gt,
        FilterOperator::Lt,
        FilterOperator::Ne,
        FilterOperator::Pattern,
    ];

    /// Find the operator of a clause by substring containment
    pub fn detect(clause: &str) -> Option<FilterOperator> {
        Self::DETECTION_ORDER
            .into_iter()
            .find(|op| clause.contains(op.token()))
    }

    /// Get the token for this operator as written in a filter string
    pub fn token(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "==",
            FilterOperator::Gte => ">=",
            FilterOperator::Lte => "<=",
            FilterOperator::Gt => ">",
            FilterOperator::Lt => "<",
            FilterOperator::Ne => "!=",
            FilterOperator::Pattern => "~",
        }
    }

    /// The comparison this operator compiles to, if it is one
    pub fn comparison(&self) -> Option<Comparison> {
        match self {
            FilterOperator::Gte => Some(Comparison::Gte),
            FilterOperator::Lte => Some(Comparison::Lte),
            FilterOperator::Gt => Some(Comparison::Gt),
            FilterOperator::Lt => Some(Comparison::Lt),
            FilterOperator::Ne => Some(Comparison::Ne),
            FilterOperator::Eq | FilterOperator::Pattern => None,
        }
    }
}

/// Keyed comparisons a predicate term can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Gt,
    Lt,
    Gte,
    Lte,
    Ne,
}

impl Comparison {
    /// Get the query-document tag for this comparison
    pub fn tag(&self) -> &'static str {
        match self {
            Comparison::Gt => "$gt",
            Comparison::Lt => "$lt",
            Comparison::Gte => "$gte",
            Comparison::Lte => "$lte",
            Comparison::Ne => "$ne",
        }
    }
}
