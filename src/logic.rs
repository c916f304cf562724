/*
Document merge and removal logic.
Module was independently written from HTTP / Axum for testing
*/

use serde_json::{Map, Value};

use crate::models::{itinerary_id, record_id, Document, ITINERARIES_KEY};

// Fields a save may overwrite on an existing entry of a wrapped document.
// Anything else already on the entry is kept as is.
pub const WRAPPED_MERGE_FIELDS: &[&str] = &[
    "title",
    "estimated_days_base",
    "days_plan",
    "pacing_rules",
    "seo",
    "meta",
    "segments",
    "variants",
    "regions",
    "nearby_itins",
    "merge_suggestions",
    "notes",
    "specialties",
    "dept_code",
    "dept_name",
    "source_url",
    "created_at",
    "subtitle",
    "seo_keywords",
    "practical_context",
    "essential_tips",
    "summary",
];

pub const UNKNOWN_COUNTRY: &str = "XX";

/// Languages touched by a delete with `allLanguages` set.
pub const ALL_LANGUAGES: &[&str] = &["fr", "en", "es", "it", "pt", "ar"];
pub const DEFAULT_LANGUAGE: &str = "fr";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    Created,
    Updated,
    Appended,
    MergedObject,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub document: Document,
    pub index: Option<usize>, // position of the written entry; None for single-object files
    pub action: MergeAction,
}

/// Fold an incoming itinerary into the existing document.
///
/// Rules:
/// - No document: a new wrapped document holding only `incoming`
/// - Wrapped: matching entry gets the allow-listed fields of `incoming`
/// - List: matching entry is shallow-merged with `incoming`
/// - Object: `incoming` is shallow-merged over the whole document
/// - No match in a list: `incoming` is appended
///
/// Identifiers match by exact JSON equality (`"42"` is not `42`). An
/// incoming record without identifier never matches and is always appended.
pub fn merge(existing: Option<Document>, incoming: Map<String, Value>) -> MergeOutcome {
    let Some(document) = existing else {
        let country = incoming
            .get("country")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_COUNTRY)
            .to_string();
        return MergeOutcome {
            document: Document::new_wrapped(&country, Value::Object(incoming)),
            index: Some(0),
            action: MergeAction::Created,
        };
    };

    match document {
        Document::Object(mut map) => {
            shallow_merge(&mut map, incoming);
            MergeOutcome {
                document: Document::Object(map),
                index: None,
                action: MergeAction::MergedObject,
            }
        }
        Document::List(mut items) => {
            let (index, action) = upsert(&mut items, incoming, EntryUpdate::Shallow);
            MergeOutcome {
                document: Document::List(items),
                index: Some(index),
                action,
            }
        }
        Document::Wrapped(mut map) => {
            let (index, action) = match map.get_mut(ITINERARIES_KEY) {
                Some(Value::Array(items)) => upsert(items, incoming, EntryUpdate::AllowList),
                _ => {
                    map.insert(ITINERARIES_KEY.to_string(), Value::Array(vec![Value::Object(incoming)]));
                    (0, MergeAction::Appended)
                }
            };
            MergeOutcome {
                document: Document::Wrapped(map),
                index: Some(index),
                action,
            }
        }
    }
}

#[derive(Clone, Copy)]
enum EntryUpdate {
    AllowList,
    Shallow,
}

// Update the entry sharing `incoming`'s identifier, or append.
fn upsert(items: &mut Vec<Value>, incoming: Map<String, Value>, update: EntryUpdate) -> (usize, MergeAction) {
    let position = record_id(&incoming)
        .and_then(|id| items.iter().position(|item| itinerary_id(item) == Some(id)));

    match position {
        Some(i) => {
            if let Value::Object(entry) = &mut items[i] {
                match update {
                    EntryUpdate::AllowList => overwrite_allowed(entry, &incoming),
                    EntryUpdate::Shallow => shallow_merge(entry, incoming),
                }
            }
            (i, MergeAction::Updated)
        }
        None => {
            items.push(Value::Object(incoming));
            (items.len() - 1, MergeAction::Appended)
        }
    }
}

/// Remove the first entry whose identifier is the string `id`.
/// Returns false when nothing matched or the document has no list.
pub fn remove(document: &mut Document, id: &str) -> bool {
    let Some(items) = document.itineraries_mut() else {
        return false;
    };
    match items
        .iter()
        .position(|item| itinerary_id(item).and_then(Value::as_str) == Some(id))
    {
        Some(i) => {
            items.remove(i);
            true
        }
        None => false,
    }
}

/// Languages a delete applies to.
///
/// Priority: explicit non-empty list, then all languages, then French only.
/// Codes are lower-cased.
pub fn resolve_languages(explicit: Option<&[String]>, all_languages: bool) -> Vec<String> {
    match explicit {
        Some(langs) if !langs.is_empty() => langs.iter().map(|l| l.to_lowercase()).collect(),
        _ if all_languages => ALL_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        _ => vec![DEFAULT_LANGUAGE.to_string()],
    }
}

/// Country code carried by an identifier of the form `COUNTRY::region::slug`.
pub fn country_from_id(id: &str) -> Option<String> {
    id.split("::")
        .next()
        .map(str::to_uppercase)
        .filter(|code| !code.is_empty())
}

fn shallow_merge(target: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        target.insert(key, value);
    }
}

fn overwrite_allowed(target: &mut Map<String, Value>, incoming: &Map<String, Value>) {
    for key in WRAPPED_MERGE_FIELDS {
        if let Some(value) = incoming.get(*key) {
            target.insert((*key).to_string(), value.clone());
        }
    }
}
