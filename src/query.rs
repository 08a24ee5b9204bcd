//! List request parsing.
//!
//! Turns the raw `/munros` query parameters into a [`PageRequest`] and then
//! into a [`PageQuery`] for the pagination engine.

use crate::access::ID_FIELD;
use crate::executor::{SortKey, SortOrder};
use crate::filter::{FilterCompiler, FilterResult, Predicate};
use crate::pagination::{FilterPolicy, PageQuery};
use serde::Deserialize;

/// Field sorted on when `sort_param` is absent or empty
pub const DEFAULT_SORT_FIELD: &str = ID_FIELD;

/// Raw query-string parameters of a list request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_param: Option<String>,
    pub sort_direction: Option<String>,
    pub fields: Option<String>,
    pub filter: Option<String>,
}

/// Requested sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    Desc,
    #[default]
    None,
}

impl SortDirection {
    /// `asc` and `desc` are recognized; anything else means no direction
    pub fn parse(raw: &str) -> Self {
        match raw {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => SortDirection::None,
        }
    }
}

/// Resolve the sort index for a field and direction.
///
/// `_id` and `name` invert the usual meaning: `asc` resolves to `-1` and both
/// `desc` and no direction resolve to `1`. Every other field maps `asc` to
/// `1` and `desc` or no direction to `-1`.
pub fn sort_index(field: &str, direction: SortDirection) -> i64 {
    let inverted = field == ID_FIELD || field == "name";
    match (direction, inverted) {
        (SortDirection::Asc, true) => -1,
        (SortDirection::Asc, false) => 1,
        (SortDirection::Desc, true) => 1,
        (SortDirection::Desc, false) => -1,
        (SortDirection::None, true) => 1,
        (SortDirection::None, false) => -1,
    }
}

/// Parsed list request
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Requested page, not yet normalized
    pub page: i64,
    /// Requested page size, not yet normalized
    pub limit: i64,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    /// Fields to return; empty means all
    pub fields: Vec<String>,
    /// Compiled filter, `None` when no `filter` parameter was sent
    pub filter: Option<Predicate>,
}

impl PageRequest {
    /// Parse the raw parameters, compiling the filter with `compiler`.
    ///
    /// `page` and `limit` values that are not integers read as `0` and are
    /// normalized later by the pagination engine.
    pub fn from_params(params: &ListParams, compiler: &FilterCompiler) -> FilterResult<Self> {
        let page = parse_int(params.page.as_deref());
        let limit = parse_int(params.limit.as_deref());

        let sort_field = match params.sort_param.as_deref() {
            Some(field) if !field.is_empty() => field.to_string(),
            _ => DEFAULT_SORT_FIELD.to_string(),
        };
        let sort_direction = params
            .sort_direction
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or_default();

        let fields: Vec<String> = params
            .fields
            .as_deref()
            .map(|fields| {
                fields
                    .split(',')
                    .filter(|field| !field.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let filter = params
            .filter
            .as_deref()
            .map(|filter| compiler.compile(filter))
            .transpose()?;

        Ok(Self {
            page,
            limit,
            sort_field,
            sort_direction,
            fields,
            filter,
        })
    }

    pub fn sort_index(&self) -> i64 {
        sort_index(&self.sort_field, self.sort_direction)
    }

    pub fn sort_key(&self) -> SortKey {
        SortKey::new(self.sort_field.clone(), SortOrder::from_index(self.sort_index()))
    }

    /// Build the pagination configuration for this request
    pub fn into_page_query(self, filter_policy: FilterPolicy) -> PageQuery {
        let sort = vec![self.sort_key()];
        PageQuery {
            filter: self.filter,
            sort,
            projection: self.fields,
            limit: self.limit,
            page: self.page,
            filter_policy,
        }
    }
}

fn parse_int(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.parse().ok()).unwrap_or(0)
}
