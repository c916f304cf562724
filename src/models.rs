use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};

pub const ITINERARIES_KEY: &str = "itineraries";
pub const DOCUMENT_VERSION: &str = "v1";

/// An itinerary file as found on disk.
///
/// The three shapes are kept apart so each write goes back out in the
/// shape it came in.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// `{version, country, itineraries: [...]}`; the map always holds an
    /// `itineraries` array. Other top-level keys are carried through untouched.
    Wrapped(Map<String, Value>),
    /// `[itinerary, ...]`
    List(Vec<Value>),
    /// A single itinerary-shaped object.
    Object(Map<String, Value>),
}

impl Document {
    /// Fresh document for a file that does not exist yet.
    pub fn new_wrapped(country: &str, first: Value) -> Self {
        let mut map = Map::new();
        map.insert("version".to_string(), Value::String(DOCUMENT_VERSION.to_string()));
        map.insert("country".to_string(), Value::String(country.to_string()));
        map.insert(ITINERARIES_KEY.to_string(), Value::Array(vec![first]));
        Document::Wrapped(map)
    }

    pub fn decode(value: Value) -> ApiResult<Self> {
        match value {
            Value::Array(items) => Ok(Document::List(items)),
            Value::Object(map) => match map.get(ITINERARIES_KEY) {
                None => Ok(Document::Object(map)),
                Some(Value::Array(_)) => Ok(Document::Wrapped(map)),
                Some(_) => Err(ApiError::Internal(format!(
                    "'{ITINERARIES_KEY}' is not a list"
                ))),
            },
            other => Err(ApiError::Internal(format!(
                "unsupported document: expected object or list, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn encode(self) -> Value {
        match self {
            Document::Wrapped(map) | Document::Object(map) => Value::Object(map),
            Document::List(items) => Value::Array(items),
        }
    }

    /// The itinerary list, for the two shapes that have one.
    pub fn itineraries(&self) -> Option<&Vec<Value>> {
        match self {
            Document::Wrapped(map) => map.get(ITINERARIES_KEY).and_then(Value::as_array),
            Document::List(items) => Some(items),
            Document::Object(_) => None,
        }
    }

    pub fn itineraries_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Document::Wrapped(map) => map.get_mut(ITINERARIES_KEY).and_then(Value::as_array_mut),
            Document::List(items) => Some(items),
            Document::Object(_) => None,
        }
    }

    pub fn total_itineraries(&self) -> usize {
        self.itineraries().map_or(1, Vec::len)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Identifier of an itinerary record: `id`, else `itin_id`.
/// Null, false, zero and empty values count as absent.
pub fn itinerary_id(record: &Value) -> Option<&Value> {
    record.as_object().and_then(record_id)
}

pub fn record_id(record: &Map<String, Value>) -> Option<&Value> {
    ["id", "itin_id"]
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|id| is_truthy(id))
}

/// Whether a JSON value counts as set: everything except null, false,
/// zero and empty strings, lists and objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Identifier as shown in messages and logs: strings bare, anything else as JSON.
pub fn id_label(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Number of day entries in an itinerary (`days_plan`, falling back to `steps`).
pub fn steps_count(record: &Map<String, Value>) -> usize {
    let steps = record.get("days_plan").or_else(|| record.get("steps"));
    match steps {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.len(),
        Some(Value::String(s)) => s.chars().count(),
        _ => 0,
    }
}

// -----------------------------
// Request bodies
// -----------------------------

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub path: Option<String>,
    pub data: Option<Value>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "itinId")]
    pub itin_id_camel: Option<String>,
    pub itin_id: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "allLanguages")]
    pub all_languages: Option<Value>,
    pub languages: Option<Value>,
}

impl DeleteRequest {
    pub fn id(&self) -> Option<&str> {
        [&self.itin_id_camel, &self.itin_id]
            .into_iter()
            .filter_map(|id| id.as_deref())
            .find(|id| !id.is_empty())
    }

    pub fn all_languages(&self) -> bool {
        self.all_languages.as_ref().is_some_and(is_truthy)
    }

    /// Explicit language list; anything other than a list is ignored.
    /// Non-string entries are skipped.
    pub fn explicit_languages(&self) -> Option<Vec<String>> {
        match &self.languages {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }
}

// -----------------------------
// Response bodies
// -----------------------------

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    pub path: String,
    pub backup: Option<String>,
    pub steps_count: usize,
    pub total_itineraries: usize,
    pub updated_index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "deletedFrom")]
    pub deleted_from: Vec<String>,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
