//! Graph extraction: records → deduplicated nodes and relationships.
//!
//! Identity is the *display name*, not the database id. Two database nodes
//! that share a name collapse into one canvas node, and relationships are
//! keyed by `(source name, target name, type)` with the first occurrence's
//! attributes kept.
//!
//! Relationship endpoints arrive as raw database ids and are mapped to names
//! through the ids seen on nodes. With [`EndpointResolution::TwoPass`] every
//! node in the result set is seen before any relationship is resolved;
//! [`EndpointResolution::VisitOrder`] resolves as records are walked, so an
//! endpoint whose node appears later stays a raw id.
//!
//! Endpoints with no node at all get a placeholder node of type
//! [`REFERENCED_TYPE`], so every edge can be drawn.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::{EndpointResolution, ExplorerConfig};
use crate::normalize::{GraphValue, NodeView, RelationshipView};
use crate::record::Record;

/// Node type given to synthesized endpoint nodes.
pub const REFERENCED_TYPE: &str = "Referenced";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Same as `name`; the canvas keys nodes by it.
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    /// Synthesized for a relationship endpoint the query didn't return.
    #[serde(skip)]
    pub placeholder: bool,
}

impl GraphNode {
    pub fn placeholder(name: &str) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            node_type: REFERENCED_TYPE.to_string(),
            attributes: Map::new(),
            placeholder: true,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn description(&self) -> Option<&Value> {
        self.attributes.get("description")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRelationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl GraphRelationship {
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.source, &self.target, &self.rel_type)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub endpoint_resolution: EndpointResolution,
}

impl From<&ExplorerConfig> for ExtractOptions {
    fn from(config: &ExplorerConfig) -> Self {
        Self {
            endpoint_resolution: config.endpoint_resolution,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub nodes: Vec<GraphNode>,
    pub relationships: Vec<GraphRelationship>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.relationships.is_empty()
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn placeholder_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_placeholder()).count()
    }
}

/// Extract with default options (two-pass endpoint resolution).
pub fn extract(records: &[Record]) -> Extraction {
    extract_with(records, &ExtractOptions::default())
}

pub fn extract_with(records: &[Record], options: &ExtractOptions) -> Extraction {
    let defer = options.endpoint_resolution == EndpointResolution::TwoPass;
    let mut builder = GraphBuilder::default();
    let mut deferred: Vec<RelationshipView<'_>> = Vec::new();

    for record in records {
        for (key, value) in record {
            match GraphValue::from_value(value) {
                GraphValue::Node(node) => builder.add_node(node, || key.clone()),
                GraphValue::Relationship(rel) => {
                    if defer {
                        deferred.push(rel);
                    } else {
                        builder.add_relationship(rel);
                    }
                }
                GraphValue::Path(path) => {
                    for node in path.nodes() {
                        let fallback = format!("path_node_{}", builder.nodes.len());
                        builder.add_node(node, || fallback);
                    }
                    for rel in path.relationships() {
                        if defer {
                            deferred.push(rel);
                        } else {
                            builder.add_relationship(rel);
                        }
                    }
                }
                GraphValue::Other(_) => {}
            }
        }
    }

    for rel in deferred {
        builder.add_relationship(rel);
    }
    builder.add_placeholders();
    builder.finish()
}

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<GraphNode>,
    node_index: HashMap<String, usize>,
    relationships: Vec<GraphRelationship>,
    relationship_keys: HashSet<(String, String, String)>,
    id_to_name: HashMap<String, String>,
    placeholders: usize,
    dropped: usize,
}

impl GraphBuilder {
    fn add_node(&mut self, node: NodeView<'_>, fallback: impl FnOnce() -> String) {
        let name = node.display_name(fallback);
        let raw_id = node.raw_id().unwrap_or_else(|| name.clone());
        self.id_to_name.insert(raw_id, name.clone());

        if self.node_index.contains_key(&name) {
            return;
        }
        self.node_index.insert(name.clone(), self.nodes.len());
        self.nodes.push(GraphNode {
            id: name.clone(),
            name,
            node_type: node.type_label(),
            attributes: node.attributes(),
            placeholder: false,
        });
    }

    fn resolve(&self, raw_id: String) -> String {
        match self.id_to_name.get(&raw_id) {
            Some(name) => name.clone(),
            None => raw_id,
        }
    }

    fn add_relationship(&mut self, rel: RelationshipView<'_>) {
        let (start, end) = (rel.start_id(), rel.end_id());
        if start.is_empty() || end.is_empty() {
            // No endpoint to draw against.
            self.dropped += 1;
            return;
        }
        let source = self.resolve(start);
        let target = self.resolve(end);
        let rel_type = rel.rel_type();
        let key = (source, target, rel_type);
        if self.relationship_keys.contains(&key) {
            return;
        }
        let (source, target, rel_type) = key.clone();
        self.relationship_keys.insert(key);
        self.relationships.push(GraphRelationship {
            source,
            target,
            rel_type,
            attributes: rel.attributes(),
        });
    }

    fn add_placeholders(&mut self) {
        for rel in &self.relationships {
            for name in [&rel.source, &rel.target] {
                if self.node_index.contains_key(name) {
                    continue;
                }
                self.node_index.insert(name.clone(), self.nodes.len());
                self.nodes.push(GraphNode::placeholder(name));
                self.placeholders += 1;
            }
        }
    }

    fn finish(self) -> Extraction {
        debug!(
            nodes = self.nodes.len(),
            relationships = self.relationships.len(),
            placeholders = self.placeholders,
            dropped = self.dropped,
            "extracted graph"
        );
        Extraction {
            nodes: self.nodes,
            relationships: self.relationships,
        }
    }
}
