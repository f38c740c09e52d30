// * Response Normalizer
// * Locates the list of report entries inside an arbitrary JSON blob and turns each
// * entry into a ReportCandidate using the catalog's alias tables.

use crate::config::catalog::{Catalog, FieldAliases};
use crate::config::constants::UNTITLED_PLACEHOLDER;
use crate::engine::normalization::resolve_against_origin;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One report entry as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCandidate {
    pub title: String,
    pub org: String,
    pub date: String,
    pub detail_url: Option<String>,
    /// The untouched source object, kept for the PDF-link resolver
    pub raw: Map<String, Value>,
}

/// Finds the entry list inside `value`.
///
/// Returns the list and the dotted key path it was found under (`""` for a bare array).
/// Only the top level and one level of nesting are inspected.
pub fn locate_list<'v>(value: &'v Value, keys: &[String]) -> Option<(&'v Vec<Value>, String)> {
    match value {
        Value::Array(items) => Some((items, String::new())),
        Value::Object(map) => {
            if let Some((items, key)) = array_under(map, keys) {
                return Some((items, key.to_string()));
            }

            // * One level of nesting only; anything deeper is ignored
            for outer in keys {
                if let Some(Value::Object(inner)) = map.get(outer) {
                    if let Some((items, key)) = array_under(inner, keys) {
                        return Some((items, format!("{outer}.{key}")));
                    }
                }
            }
            None
        }
        _ => None,
    }
}

fn array_under<'v, 'k>(map: &'v Map<String, Value>, keys: &'k [String]) -> Option<(&'v Vec<Value>, &'k str)> {
    keys.iter().find_map(|key| match map.get(key) {
        Some(Value::Array(items)) => Some((items, key.as_str())),
        _ => None,
    })
}

/// Follows a remembered dotted key path back to the list
pub fn list_at_path<'v>(value: &'v Value, path: &str) -> Option<&'v Vec<Value>> {
    if path.is_empty() {
        return value.as_array();
    }
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    current.as_array()
}

/// Looks for a total-count field at the top level, then beside the list.
///
/// Returns the count and its dotted key path.
pub fn locate_total(value: &Value, list_key_path: &str, total_keys: &[String]) -> Option<(u64, String)> {
    let top = value.as_object()?;
    if let Some((count, key)) = count_under(top, total_keys) {
        return Some((count, key.to_string()));
    }

    let (parent_path, _) = list_key_path.rsplit_once('.')?;
    let parent = value.get(parent_path)?.as_object()?;
    count_under(parent, total_keys).map(|(count, key)| (count, format!("{parent_path}.{key}")))
}

fn count_under<'k>(map: &Map<String, Value>, keys: &'k [String]) -> Option<(u64, &'k str)> {
    keys.iter().find_map(|key| {
        let count = match map.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }?;
        Some((count, key.as_str()))
    })
}

/// First present, non-empty scalar among `aliases`, stringified
pub fn first_alias(entry: &Map<String, Value>, aliases: &[String]) -> Option<String> {
    aliases.iter().find_map(|alias| scalar_text(entry.get(alias)?))
}

/// Every alias with a usable value, in alias order
pub fn all_aliases(entry: &Map<String, Value>, aliases: &[String]) -> Vec<(String, String)> {
    aliases
        .iter()
        .filter_map(|alias| Some((alias.clone(), scalar_text(entry.get(alias)?)?)))
        .collect()
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Converts one raw entry; `None` when the entry is not an object
pub fn normalize_entry(entry: &Value, catalog: &Catalog) -> Option<ReportCandidate> {
    let map = entry.as_object()?;
    let fields: &FieldAliases = &catalog.fields;

    let detail_url = first_alias(map, &fields.url)
        .map(|url| resolve_against_origin(&url, &catalog.origin))
        .or_else(|| first_alias(map, &fields.id).map(|id| catalog.detail_page_for(&id)));

    Some(ReportCandidate {
        title: first_alias(map, &fields.title).unwrap_or_else(|| UNTITLED_PLACEHOLDER.to_string()),
        org: first_alias(map, &fields.org).unwrap_or_default(),
        date: first_alias(map, &fields.date).unwrap_or_default(),
        detail_url,
        raw: map.clone(),
    })
}

/// Converts a list of raw entries, silently skipping non-objects
pub fn normalize_entries(entries: &[Value], catalog: &Catalog) -> Vec<ReportCandidate> {
    entries
        .iter()
        .filter_map(|entry| normalize_entry(entry, catalog))
        .collect()
}
