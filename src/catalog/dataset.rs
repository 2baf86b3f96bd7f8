// Dataset: the single record shape the analyzer consumes.
//
// Both catalogs return very different JSON. The municipal API speaks JSON:API
// with DCAT-namespaced attribute keys (`dct:title`, `dcat:keyword`, ...), the
// national portal returns CKAN packages. Everything is normalized here so the
// analyzer never sees either wire format.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AnalysisError, WooResult};

/// Namespace prefixes tried, in order, before the bare attribute name.
const DCAT_PREFIXES: [&str; 3] = ["dct", "dcat", "foaf"];

/// A catalog dataset reduced to the fields the Woo analysis needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Unique per catalog (DCAT `id`, CKAN `name`)
    pub identifier: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Curated keywords / tags, in catalog order
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Dataset {
    /// A dataset with only an identifier. Handy for building records by hand.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: None,
            description: None,
            keywords: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Title for display, falling back to the identifier.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.identifier)
    }
}

/// Look up a DCAT attribute, trying `dct:`, `dcat:` and `foaf:` before the bare key.
pub fn dcat_attr<'a>(attrs: &'a Value, key: &str) -> Option<&'a Value> {
    DCAT_PREFIXES
        .iter()
        .find_map(|prefix| attrs.get(format!("{prefix}:{key}")))
        .or_else(|| attrs.get(key))
        .filter(|v| !v.is_null())
}

/// Normalize a DCAT JSON:API resource into a [`Dataset`].
///
/// Accepts either the bare resource (`{ "id": ..., "attributes": {...} }`)
/// or the single-resource envelope (`{ "data": {...} }`) returned by
/// `GET /datasets/{id}`.
pub fn normalize_dcat(raw: &Value) -> WooResult<Dataset> {
    let resource = match raw.get("data") {
        Some(data) if data.is_object() => data,
        _ => raw,
    };

    let identifier = resource
        .get("id")
        .and_then(scalar_to_string)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AnalysisError::invalid_input("DCAT resource has no id"))?;

    let empty = Value::Null;
    let attrs = resource.get("attributes").unwrap_or(&empty);

    Ok(Dataset {
        identifier,
        title: dcat_attr(attrs, "title").and_then(scalar_to_string),
        description: dcat_attr(attrs, "description").and_then(scalar_to_string),
        keywords: dcat_attr(attrs, "keyword")
            .map(string_list)
            .unwrap_or_default(),
    })
}

/// Normalize a CKAN package (`package_show` result or a `package_search` hit).
pub fn normalize_ckan(raw: &Value) -> WooResult<Dataset> {
    let identifier = ["name", "id"]
        .iter()
        .filter_map(|key| raw.get(*key).and_then(scalar_to_string))
        .find(|id| !id.trim().is_empty())
        .ok_or_else(|| AnalysisError::invalid_input("CKAN package has no name or id"))?;

    let keywords = raw
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(|tag| match tag {
                    Value::String(s) => Some(s.clone()),
                    _ => tag
                        .get("name")
                        .or_else(|| tag.get("display_name"))
                        .and_then(scalar_to_string),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Dataset {
        identifier,
        title: raw.get("title").and_then(scalar_to_string),
        description: raw.get("notes").and_then(scalar_to_string),
        keywords,
    })
}

/// Strings pass through, numbers are stringified, anything else is dropped.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// DCAT keywords are usually an array but some records carry a single string.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dcat_prefers_namespaced_keys() {
        let raw = json!({
            "id": "afvalbakken",
            "attributes": {
                "dct:title": "Afvalbakken",
                "title": "ignored",
                "dcat:keyword": ["afval", "afvalbak"]
            }
        });
        let ds = normalize_dcat(&raw).unwrap();
        assert_eq!(ds.identifier, "afvalbakken");
        assert_eq!(ds.title.as_deref(), Some("Afvalbakken"));
        assert_eq!(ds.keywords, vec!["afval", "afvalbak"]);
        assert!(ds.description.is_none());
    }

    #[test]
    fn test_dcat_unwraps_data_envelope() {
        let raw = json!({ "data": { "id": "bomen", "attributes": { "title": "Bomen" } } });
        let ds = normalize_dcat(&raw).unwrap();
        assert_eq!(ds.identifier, "bomen");
        assert_eq!(ds.title.as_deref(), Some("Bomen"));
    }

    #[test]
    fn test_dcat_without_id_is_invalid() {
        let raw = json!({ "attributes": { "title": "Zonder id" } });
        assert!(matches!(
            normalize_dcat(&raw),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ckan_uses_name_and_tags() {
        let raw = json!({
            "id": "0b1c",
            "name": "parkeertarieven-utrecht",
            "title": "Parkeertarieven Utrecht",
            "notes": "Tarieven per zone",
            "tags": [{ "name": "parkeren" }, { "display_name": "tarieven" }]
        });
        let ds = normalize_ckan(&raw).unwrap();
        assert_eq!(ds.identifier, "parkeertarieven-utrecht");
        assert_eq!(ds.description.as_deref(), Some("Tarieven per zone"));
        assert_eq!(ds.keywords, vec!["parkeren", "tarieven"]);
    }

    #[test]
    fn test_display_title_falls_back_to_identifier() {
        let ds = Dataset::new("zonder-titel").with_title("  ");
        assert_eq!(ds.display_title(), "zonder-titel");
    }
}
