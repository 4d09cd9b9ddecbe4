//! Extraction of the resource list from free-form model output.
//!
//! Models often wrap the requested JSON array in prose or markdown fences,
//! so the array is located inside the text before parsing.

use crisis_core::EmergencyResource;
use serde_json::Value;

/// Upper bound on resources kept from a single lookup.
pub const MAX_RESOURCES: usize = 5;

/// Locate and parse a JSON array inside `text`.
///
/// The span from the first `[` to the last `]` is tried first; if that is not
/// valid JSON, the first well-formed array starting at any `[` wins.
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    if let Some(span) = regex::Regex::new(r"(?s)\[.*\]").ok()?.find(text) {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(span.as_str()) {
            return Some(items);
        }
    }

    text.match_indices('[').find_map(|(idx, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[idx..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Array(items))) => Some(items),
            _ => None,
        }
    })
}

/// Parse the resource list, skipping entries that do not match the expected
/// shape. Returns an empty list when no array can be found.
pub fn parse_resources(text: &str) -> Vec<EmergencyResource> {
    let Some(items) = extract_json_array(text) else {
        log::warn!("No JSON array found in resource lookup output");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<EmergencyResource>(item) {
            Ok(resource) => Some(resource),
            Err(e) => {
                log::debug!("Skipping malformed resource entry: {}", e);
                None
            }
        })
        .take(MAX_RESOURCES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crisis_core::ResourceCategory;

    #[test]
    fn extracts_array_from_fenced_prose() {
        let text = "Sure! ```json\n[{\"name\":\"Mercy Hospital\",\"type\":\"Hospital\",\"address\":\"1 Main\",\"phone\":\"555\"}]\n``` done";
        let resources = parse_resources(text);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name, "Mercy Hospital");
        assert_eq!(resources[0].category, ResourceCategory::Hospital);
    }

    #[test]
    fn raw_array_parses() {
        let text = r#"[{"name":"Station 9","type":"Fire","address":"9 Elm","phone":"911"},
                       {"name":"Precinct 4","type":"Police","address":"4 Oak","phone":"911"}]"#;
        assert_eq!(parse_resources(text).len(), 2);
    }

    #[test]
    fn non_json_yields_empty_list() {
        assert!(parse_resources("I could not find anything nearby.").is_empty());
        assert!(parse_resources("").is_empty());
        assert!(parse_resources("[not, json]").is_empty());
    }

    #[test]
    fn falls_back_to_first_well_formed_array() {
        let text = "Results: [{\"name\":\"Shelter A\",\"type\":\"Shelter\"}] (see [note] below)";
        let resources = parse_resources(text);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].category, ResourceCategory::Shelter);
        assert_eq!(resources[0].phone, "911");
    }

    #[test]
    fn skips_malformed_entries_and_caps_length() {
        let mut entries: Vec<String> = (0..7)
            .map(|i| format!(r#"{{"name":"Site {i}","type":"Other","address":"","phone":"1"}}"#))
            .collect();
        entries.insert(1, r#"{"type":"Hospital"}"#.to_string());
        entries.insert(2, "42".to_string());
        let text = format!("[{}]", entries.join(","));

        let resources = parse_resources(&text);
        assert_eq!(resources.len(), MAX_RESOURCES);
        assert_eq!(resources[0].name, "Site 0");
        assert_eq!(resources[1].name, "Site 1");
    }
}
