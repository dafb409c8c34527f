use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("graph document is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),
    #[error("graph document has no `nodes` field")]
    MissingNodes,
    #[error("graph document `nodes` must be a list, found {found}")]
    NodesNotAList { found: &'static str },
    #[error("node #{index} in graph document is malformed")]
    InvalidNode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("node id `{id}` appears more than once")]
    DuplicateNodeId { id: String },
}

/// Fields the engine never inspects; carried through for the note panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePayload {
    pub description: Option<String>,
    pub metadata: Option<Value>,
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocumentNode {
    pub id: String,
    pub aliases: Vec<String>,
    pub outbound_links: Vec<String>,
    pub inbound_links: Vec<String>,
    pub payload: NodePayload,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphDocument {
    pub nodes: Vec<DocumentNode>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    outbound_links: Vec<String>,
    #[serde(default)]
    inbound_links: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawNode> for DocumentNode {
    fn from(raw: RawNode) -> Self {
        Self {
            id: raw.id,
            aliases: raw.aliases,
            outbound_links: raw.outbound_links,
            inbound_links: raw.inbound_links,
            payload: NodePayload {
                description: raw.description,
                metadata: raw.metadata,
                extra: raw.extra,
            },
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

impl GraphDocument {
    pub fn from_json_str(raw: &str) -> Result<Self, DocumentError> {
        let parsed: Value = serde_json::from_str(raw).map_err(DocumentError::InvalidJson)?;
        Self::from_value(parsed)
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(mut object) = value else {
            return Err(DocumentError::MissingNodes);
        };

        let nodes_value = object.remove("nodes").ok_or(DocumentError::MissingNodes)?;
        let Value::Array(entries) = nodes_value else {
            return Err(DocumentError::NodesNotAList {
                found: json_kind(&nodes_value),
            });
        };

        let mut seen = HashSet::with_capacity(entries.len());
        let mut nodes = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let raw = RawNode::deserialize(entry)
                .map_err(|source| DocumentError::InvalidNode { index, source })?;
            if !seen.insert(raw.id.clone()) {
                return Err(DocumentError::DuplicateNodeId { id: raw.id });
            }
            nodes.push(DocumentNode::from(raw));
        }

        Ok(Self { nodes })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_full_node_shape_and_keeps_extras() {
        let document = GraphDocument::from_json_str(
            r#"{
                "nodes": [{
                    "id": "Vector space",
                    "aliases": ["linear space"],
                    "outbound_links": ["Basis"],
                    "inbound_links": ["Field"],
                    "description": "A set closed under addition and scaling.",
                    "metadata": {"chapter": 2},
                    "weight": 3
                }]
            }"#,
        )
        .unwrap();

        let node = &document.nodes[0];
        assert_eq!(node.id, "Vector space");
        assert_eq!(node.aliases, vec!["linear space".to_owned()]);
        assert_eq!(node.outbound_links, vec!["Basis".to_owned()]);
        assert_eq!(node.inbound_links, vec!["Field".to_owned()]);
        assert_eq!(
            node.payload.description.as_deref(),
            Some("A set closed under addition and scaling.")
        );
        assert_eq!(node.payload.metadata, Some(json!({"chapter": 2})));
        assert_eq!(node.payload.extra.get("weight"), Some(&json!(3)));
    }

    #[test]
    fn link_lists_default_to_empty() {
        let document = GraphDocument::from_json_str(r#"{"nodes": [{"id": "A"}]}"#).unwrap();
        assert!(document.nodes[0].aliases.is_empty());
        assert!(document.nodes[0].outbound_links.is_empty());
        assert!(document.nodes[0].inbound_links.is_empty());
    }

    #[test]
    fn missing_nodes_is_rejected() {
        let error = GraphDocument::from_json_str(r#"{"edges": []}"#).unwrap_err();
        assert!(matches!(error, DocumentError::MissingNodes));
    }

    #[test]
    fn non_object_document_is_rejected() {
        let error = GraphDocument::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(error, DocumentError::MissingNodes));
    }

    #[test]
    fn nodes_must_be_a_list() {
        let error = GraphDocument::from_json_str(r#"{"nodes": {"A": {}}}"#).unwrap_err();
        assert!(matches!(
            error,
            DocumentError::NodesNotAList { found: "an object" }
        ));
    }

    #[test]
    fn node_without_id_reports_its_position() {
        let error =
            GraphDocument::from_json_str(r#"{"nodes": [{"id": "A"}, {"aliases": []}]}"#)
                .unwrap_err();
        assert!(matches!(error, DocumentError::InvalidNode { index: 1, .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let error =
            GraphDocument::from_json_str(r#"{"nodes": [{"id": "A"}, {"id": "A"}]}"#).unwrap_err();
        assert!(matches!(error, DocumentError::DuplicateNodeId { id } if id == "A"));
    }

    #[test]
    fn invalid_json_is_reported() {
        let error = GraphDocument::from_json_str("{nodes:").unwrap_err();
        assert!(matches!(error, DocumentError::InvalidJson(_)));
    }
}
