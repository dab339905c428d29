//! Structured bulk-load pages.
//!
//! A page is a JSON document of the shape
//!
//! ```text
//! { "result": { "count": 1,
//!               "pagination": { "page": 1, "pages": 5 },
//!               "data": [ { "id": "item1",
//!                           "attributes": [ { "id": "code", "value": "C123" } ] } ] } }
//! ```
//!
//! Unknown keys are ignored. Parsing is all-or-nothing: [`parse_page`] either
//! yields the whole page or an error, so nothing is applied from a rejected page.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use smallcache_foundation::{Error, Result, WireValue};

/// Top-level page document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PageResponse {
    /// Page body.
    pub result: PageResult,
}

impl PageResponse {
    /// Returns the total page count the source declared.
    #[must_use]
    pub fn pages(&self) -> usize {
        self.result.pagination.pages
    }
}

/// Page body.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageResult {
    /// Entity count hint.
    pub count: usize,
    /// Position of this page in the sequence.
    pub pagination: Pagination,
    /// Entity records.
    pub data: Vec<ItemRecord>,
}

/// Page position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// This page's number.
    pub page: usize,
    /// Total number of pages.
    pub pages: usize,
}

/// One entity in a page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ItemRecord {
    /// Entity id.
    pub id: String,
    /// Full attribute set of the entity.
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

/// One attribute of an entity record.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AttributeRecord {
    /// Attribute name.
    pub id: String,
    /// Attribute value; `null` or a missing key is unset.
    #[serde(default, deserialize_with = "wire_value")]
    pub value: WireValue,
}

/// Parses a page document.
///
/// # Errors
///
/// Returns a parse error, with line and column, if the text is not valid
/// JSON or does not have the page structure.
pub fn parse_page(text: &str) -> Result<PageResponse> {
    serde_json::from_str(text).map_err(|e| {
        let full = e.to_string();
        let suffix = format!(" at line {} column {}", e.line(), e.column());
        let message = full.strip_suffix(&suffix).unwrap_or(&full);
        Error::parse(message, e.line(), e.column())
    })
}

fn wire_value<'de, D>(deserializer: D) -> std::result::Result<WireValue, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => Ok(WireValue::Unset),
        JsonValue::Bool(b) => Ok(WireValue::Bool(b)),
        JsonValue::Number(n) => n
            .as_f64()
            .map(WireValue::Number)
            .ok_or_else(|| de::Error::custom(format!("number {n} is out of range"))),
        JsonValue::String(s) => Ok(WireValue::String(s)),
        JsonValue::Array(items) => Ok(WireValue::List(items.into_iter().map(raw_string).collect())),
        JsonValue::Object(_) => Err(de::Error::invalid_type(
            Unexpected::Map,
            &"a boolean, number, string, array of strings, or null",
        )),
    }
}

/// List elements keep their text; non-string elements keep their JSON text.
fn raw_string(item: JsonValue) -> String {
    match item {
        JsonValue::String(s) => s,
        other => other.to_string(),
    }
}
