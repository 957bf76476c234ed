//! Shape detection for a single field value.
//!
//! Values cross the query boundary as JSON. A node carries `labels`, a
//! relationship carries `type` + `start` + `end`, and a path is either marked
//! with `path_type: "neo4j_path"` or carries both `nodes` and `relationships`
//! arrays. Everything is decided here, once; downstream code matches on
//! [`GraphValue`] instead of checking keys.

use serde_json::{Map, Value};

use crate::record::{display_string, PATH_MARKER};

/// Label used when a node has no labels or a relationship has no type.
pub const UNKNOWN_TYPE: &str = "Unknown";

#[derive(Debug, Clone, Copy)]
pub enum GraphValue<'a> {
    Node(NodeView<'a>),
    Relationship(RelationshipView<'a>),
    Path(PathView<'a>),
    /// Primitives, lists and maps of no recognized shape.
    Other(&'a Value),
}

impl<'a> GraphValue<'a> {
    pub fn from_value(value: &'a Value) -> Self {
        let Value::Object(map) = value else {
            return Self::Other(value);
        };
        if map.get("path_type").and_then(Value::as_str) == Some(PATH_MARKER) {
            return Self::Path(PathView { map });
        }
        if map.contains_key("labels") {
            return Self::Node(NodeView { map });
        }
        if map.contains_key("type") && map.contains_key("start") && map.contains_key("end") {
            return Self::Relationship(RelationshipView { map });
        }
        let is_array = |key: &str| map.get(key).map(Value::is_array).unwrap_or(false);
        if is_array("nodes") && is_array("relationships") {
            return Self::Path(PathView { map });
        }
        Self::Other(value)
    }

    pub fn is_graph(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn without(map: &Map<String, Value>, excluded: &[&str]) -> Map<String, Value> {
    map.iter()
        .filter(|(k, _)| !excluded.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> NodeView<'a> {
    /// Wrap a map as a node without checking for `labels` (path members).
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    pub fn labels(&self) -> Vec<String> {
        match self.map.get("labels") {
            Some(Value::Array(items)) => items.iter().map(display_string).collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Labels joined with `/` (empty when there are none).
    pub fn joined_labels(&self) -> String {
        self.labels().join("/")
    }

    /// Category shown on the canvas: joined labels, or `Unknown`.
    pub fn type_label(&self) -> String {
        let joined = self.joined_labels();
        if joined.is_empty() {
            UNKNOWN_TYPE.to_string()
        } else {
            joined
        }
    }

    pub fn explicit_name(&self) -> Option<String> {
        present(self.map, "name").map(display_string)
    }

    pub fn raw_id(&self) -> Option<String> {
        present(self.map, "id").map(display_string)
    }

    /// Explicit name, else raw id, else whatever `fallback` produces.
    pub fn display_name(&self, fallback: impl FnOnce() -> String) -> String {
        self.explicit_name()
            .or_else(|| self.raw_id())
            .unwrap_or_else(fallback)
    }

    pub fn attributes(&self) -> Map<String, Value> {
        without(self.map, &["id", "name", "labels"])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RelationshipView<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> RelationshipView<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    pub fn rel_type(&self) -> String {
        present(self.map, "type")
            .map(display_string)
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
    }

    pub fn start_id(&self) -> String {
        present(self.map, "start").map(display_string).unwrap_or_default()
    }

    pub fn end_id(&self) -> String {
        present(self.map, "end").map(display_string).unwrap_or_default()
    }

    pub fn raw_id(&self) -> Option<String> {
        present(self.map, "id").map(display_string)
    }

    pub fn attributes(&self) -> Map<String, Value> {
        without(self.map, &["type", "start", "end"])
    }

    /// Non-null attributes that say something beyond the relationship's
    /// identity (no `id`).
    pub fn custom_properties(&self) -> impl Iterator<Item = (&'a String, &'a Value)> {
        self.map.iter().filter(|(k, v)| {
            !matches!(k.as_str(), "type" | "start" | "end" | "id") && !v.is_null()
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PathView<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> PathView<'a> {
    fn members(&self, key: &str) -> &'a [Value] {
        self.map
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeView<'a>> {
        self.members("nodes")
            .iter()
            .filter_map(Value::as_object)
            .map(NodeView::new)
    }

    pub fn relationships(&self) -> impl Iterator<Item = RelationshipView<'a>> {
        self.members("relationships")
            .iter()
            .filter_map(Value::as_object)
            .map(RelationshipView::new)
    }

    pub fn node_count(&self) -> usize {
        self.members("nodes").len()
    }

    pub fn relationship_count(&self) -> usize {
        self.members("relationships").len()
    }

    /// Declared length, else the number of relationships.
    pub fn length(&self) -> Value {
        present(self.map, "length")
            .cloned()
            .unwrap_or_else(|| Value::from(self.relationship_count()))
    }

    pub fn summary(&self) -> String {
        present(self.map, "path_summary")
            .map(display_string)
            .unwrap_or_else(|| "Path".to_string())
    }
}
