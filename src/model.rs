//! Record shapes returned by the API.

use crate::access::Document;
use crate::store::StoreResult;
use serde::{Deserialize, Serialize};

fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

fn is_zero_f64(value: &f64) -> bool {
    *value == 0.0
}

/// A munro record. Zero and empty fields are left out of the JSON output,
/// which is how a projected record comes back without the dropped fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Munro {
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub altitude: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub climbers: i64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub rating: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
}

impl Munro {
    /// Decode a stored document. Unknown fields such as `_id` are ignored.
    pub fn from_document(document: &Document) -> StoreResult<Self> {
        let value = serde_json::to_value(document)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Response of a single-record lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetMunroResponse {
    pub munro: Munro,
    /// Position of the record in the sorted name index
    pub index: Option<usize>,
    /// Alphabetically previous identifier
    pub prev: Option<String>,
    /// Alphabetically next identifier
    pub next: Option<String>,
    /// Identifier drawn uniformly from the name index
    pub random: Option<String>,
}
