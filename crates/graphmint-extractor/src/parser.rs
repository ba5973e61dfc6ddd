//! Parse raw model output into extracted nodes and edges
//!
//! Models return the extraction as one JSON object, but drift between
//! two schemas (`"Nodes"`/`"Edges"` with array-shaped entries, and
//! `"nodes"`/`"relationships"` with object-shaped entries) and often
//! wrap the object in markdown fences or prose. The parser normalizes
//! all of that into the single internal model and tolerates malformed
//! entries, failing only when no extraction JSON can be found at all.

use crate::error::ExtractorError;
use graphmint_domain::{ExtractedEdge, ExtractedNode, Properties};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// One chunk's normalized extraction output
#[derive(Debug, Clone, Default)]
pub struct ParsedExtraction {
    /// Nodes that survived entry validation
    pub nodes: Vec<ExtractedNode>,

    /// Edges whose endpoints exist among `nodes`
    pub edges: Vec<ExtractedEdge>,

    /// Node entries dropped as malformed
    pub nodes_skipped: usize,

    /// Edge entries dropped as malformed or dangling
    pub edges_skipped: usize,
}

/// Parse one extraction call's raw output
///
/// Fails with `Parse` only when no JSON object can be located at all,
/// or the object carries neither a nodes key nor an edges key.
pub fn parse_extraction(raw: &str) -> Result<ParsedExtraction, ExtractorError> {
    let value = locate_extraction_json(raw)?;

    let obj = value
        .as_object()
        .ok_or_else(|| ExtractorError::Parse("expected a JSON object".to_string()))?;

    let nodes_value = obj.get("Nodes").or_else(|| obj.get("nodes"));
    let edges_value = obj.get("Edges").or_else(|| obj.get("relationships"));

    if nodes_value.is_none() && edges_value.is_none() {
        return Err(ExtractorError::Parse(
            "JSON object has neither a nodes nor an edges key".to_string(),
        ));
    }

    let mut parsed = ParsedExtraction::default();

    if let Some(entries) = nodes_value.and_then(Value::as_array) {
        for (idx, entry) in entries.iter().enumerate() {
            match parse_node_entry(entry) {
                Ok(node) => parsed.nodes.push(node),
                Err(reason) => {
                    warn!(entry = idx, %reason, "skipping malformed node entry");
                    parsed.nodes_skipped += 1;
                }
            }
        }
    }

    let known_ids: HashSet<&str> = parsed.nodes.iter().map(|n| n.local_id.as_str()).collect();

    if let Some(entries) = edges_value.and_then(Value::as_array) {
        for (idx, entry) in entries.iter().enumerate() {
            match parse_edge_entry(entry) {
                Ok(edge) => {
                    if !known_ids.contains(edge.start_local_id.as_str())
                        || !known_ids.contains(edge.end_local_id.as_str())
                    {
                        warn!(
                            entry = idx,
                            start = %edge.start_local_id,
                            end = %edge.end_local_id,
                            "skipping dangling edge with unknown node id"
                        );
                        parsed.edges_skipped += 1;
                        continue;
                    }
                    parsed.edges.push(edge);
                }
                Err(reason) => {
                    warn!(entry = idx, %reason, "skipping malformed edge entry");
                    parsed.edges_skipped += 1;
                }
            }
        }
    }

    Ok(parsed)
}

/// Find and parse the extraction JSON object inside `raw`
///
/// Tries, in order: stripping a markdown code fence, parsing the text
/// as-is, and parsing the span from the first `{` to its matching `}`
/// (models sometimes surround the object with prose).
fn locate_extraction_json(raw: &str) -> Result<Value, ExtractorError> {
    let defenced = strip_code_fence(raw);

    if let Ok(value) = serde_json::from_str::<Value>(defenced) {
        return Ok(value);
    }

    if let Some(span) = brace_matched_span(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return Ok(value);
        }
    }

    Err(ExtractorError::Parse(
        "no JSON object found in model output".to_string(),
    ))
}

/// Remove a surrounding markdown code fence, if any
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let body = trimmed.trim_start_matches("```json").trim_start_matches("```");
    body.trim_end_matches("```").trim()
}

/// Span from the first `{` to its matching `}`, string-aware
fn brace_matched_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in raw.bytes().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Normalize one node entry from either schema
///
/// Array shape: `["id", "Label", {properties}]`
/// Object shape: `{"id": "0", "label": "Label", "properties": {...}}`
fn parse_node_entry(entry: &Value) -> Result<ExtractedNode, String> {
    match entry {
        Value::Array(items) => {
            let local_id = items
                .first()
                .and_then(id_string)
                .ok_or("node entry missing id")?;
            let label = items
                .get(1)
                .and_then(Value::as_str)
                .ok_or("node entry missing label")?
                .to_string();
            let properties = items.get(2).map(properties_of).unwrap_or_default();
            Ok(ExtractedNode {
                local_id,
                label,
                properties,
            })
        }
        Value::Object(obj) => {
            let local_id = obj.get("id").and_then(id_string).ok_or("node entry missing id")?;
            let label = obj
                .get("label")
                .and_then(Value::as_str)
                .ok_or("node entry missing label")?
                .to_string();
            let properties = obj.get("properties").map(properties_of).unwrap_or_default();
            Ok(ExtractedNode {
                local_id,
                label,
                properties,
            })
        }
        other => Err(format!("node entry is not an array or object: {}", other)),
    }
}

/// Normalize one edge entry from either schema
///
/// Array shape: `["start_id", "type", "end_id", {properties}]`
/// Object shape: `{"type": "...", "start_node_id": "0", "end_node_id": "1", "properties": {...}}`
fn parse_edge_entry(entry: &Value) -> Result<ExtractedEdge, String> {
    match entry {
        Value::Array(items) => {
            let start_local_id = items
                .first()
                .and_then(id_string)
                .ok_or("edge entry missing start id")?;
            let rel_type = items
                .get(1)
                .and_then(Value::as_str)
                .ok_or("edge entry missing relationship type")?
                .to_string();
            let end_local_id = items
                .get(2)
                .and_then(id_string)
                .ok_or("edge entry missing end id")?;
            let properties = items.get(3).map(properties_of).unwrap_or_default();
            Ok(ExtractedEdge {
                start_local_id,
                rel_type,
                end_local_id,
                properties,
            })
        }
        Value::Object(obj) => {
            let start_local_id = obj
                .get("start_node_id")
                .and_then(id_string)
                .ok_or("edge entry missing start_node_id")?;
            let rel_type = obj
                .get("type")
                .and_then(Value::as_str)
                .ok_or("edge entry missing type")?
                .to_string();
            let end_local_id = obj
                .get("end_node_id")
                .and_then(id_string)
                .ok_or("edge entry missing end_node_id")?;
            let properties = obj.get("properties").map(properties_of).unwrap_or_default();
            Ok(ExtractedEdge {
                start_local_id,
                rel_type,
                end_local_id,
                properties,
            })
        }
        other => Err(format!("edge entry is not an array or object: {}", other)),
    }
}

/// Identifiers arrive as strings or bare numbers; normalize to string
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Clone a properties object, or empty when the value is not an object
fn properties_of(value: &Value) -> Properties {
    value.as_object().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array_schema() {
        let raw = r#"{"Nodes": [["0", "Person", {"name": "Alice"}], ["1", "Webpage", {"url": "www.alice.com"}]],
                      "Edges": [["0", "owns", "1", {}]]}"#;

        let parsed = parse_extraction(raw).unwrap();
        assert_eq!(parsed.nodes.len(), 2);
        assert_eq!(parsed.edges.len(), 1);
        assert_eq!(parsed.nodes[0].local_id, "0");
        assert_eq!(parsed.nodes[0].label, "Person");
        assert_eq!(parsed.nodes[0].name(), Some("Alice"));
        assert_eq!(parsed.edges[0].rel_type, "owns");
    }

    #[test]
    fn test_parse_object_schema() {
        let raw = r#"{"nodes": [{"id": "0", "label": "Person", "properties": {"name": "Obama"}},
                                 {"id": "1", "label": "Country", "properties": {"name": "United States"}}],
                      "relationships": [{"type": "was_president_of", "start_node_id": "0", "end_node_id": "1",
                                         "properties": {"details": "44th president"}}]}"#;

        let parsed = parse_extraction(raw).unwrap();
        assert_eq!(parsed.nodes.len(), 2);
        assert_eq!(parsed.edges.len(), 1);
        assert_eq!(parsed.edges[0].start_local_id, "0");
        assert_eq!(parsed.edges[0].end_local_id, "1");
        assert_eq!(parsed.edges[0].rel_type, "was_president_of");
    }

    #[test]
    fn test_parse_json_embedded_in_prose() {
        let raw = r#"Some preamble the model insisted on... {"Nodes":[["0","Person",{"name":"A"}]],"Edges":[]} trailing junk"#;

        let parsed = parse_extraction(raw).unwrap();
        assert_eq!(parsed.nodes.len(), 1);
        assert_eq!(parsed.nodes[0].name(), Some("A"));
        assert!(parsed.edges.is_empty());
    }

    #[test]
    fn test_parse_markdown_fenced_json() {
        let raw = "```json\n{\"Nodes\": [[\"0\", \"Person\", {\"name\": \"Bob\"}]], \"Edges\": []}\n```";

        let parsed = parse_extraction(raw).unwrap();
        assert_eq!(parsed.nodes.len(), 1);
    }

    #[test]
    fn test_braces_inside_strings_do_not_confuse_recovery() {
        let raw = r#"note: {"Nodes":[["0","Person",{"name":"A{B}C","quote":"she said \"hi\""}]],"Edges":[]} done"#;

        let parsed = parse_extraction(raw).unwrap();
        assert_eq!(parsed.nodes.len(), 1);
        assert_eq!(parsed.nodes[0].name(), Some("A{B}C"));
    }

    #[test]
    fn test_node_without_label_is_skipped() {
        let raw = r#"{"Nodes": [["0", "Person", {"name": "A"}], ["1"]], "Edges": []}"#;

        let parsed = parse_extraction(raw).unwrap();
        assert_eq!(parsed.nodes.len(), 1);
        assert_eq!(parsed.nodes_skipped, 1);
    }

    #[test]
    fn test_dangling_edge_is_skipped() {
        let raw = r#"{"Nodes": [["0", "Person", {"name": "A"}]],
                      "Edges": [["0", "knows", "7", {}]]}"#;

        let parsed = parse_extraction(raw).unwrap();
        assert_eq!(parsed.nodes.len(), 1);
        assert!(parsed.edges.is_empty());
        assert_eq!(parsed.edges_skipped, 1);
    }

    #[test]
    fn test_numeric_ids_are_normalized() {
        let raw = r#"{"Nodes": [[0, "Person", {"name": "A"}], [1, "Person", {"name": "B"}]],
                      "Edges": [[0, "knows", 1, {}]]}"#;

        let parsed = parse_extraction(raw).unwrap();
        assert_eq!(parsed.nodes[0].local_id, "0");
        assert_eq!(parsed.edges.len(), 1);
    }

    #[test]
    fn test_missing_edges_key_means_empty_edges() {
        let raw = r#"{"Nodes": [["0", "Person", {"name": "A"}]]}"#;

        let parsed = parse_extraction(raw).unwrap();
        assert_eq!(parsed.nodes.len(), 1);
        assert!(parsed.edges.is_empty());
    }

    #[test]
    fn test_no_json_at_all_is_parse_error() {
        let result = parse_extraction("I could not find any entities in this text.");
        assert!(matches!(result, Err(ExtractorError::Parse(_))));
    }

    #[test]
    fn test_json_without_known_keys_is_parse_error() {
        let result = parse_extraction(r#"{"answer": 42}"#);
        assert!(matches!(result, Err(ExtractorError::Parse(_))));
    }

    #[test]
    fn test_empty_extraction_is_valid() {
        let parsed = parse_extraction(r#"{"Nodes": [], "Edges": []}"#).unwrap();
        assert!(parsed.nodes.is_empty());
        assert!(parsed.edges.is_empty());
        assert_eq!(parsed.nodes_skipped, 0);
    }
}
