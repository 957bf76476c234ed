//! Driver boundary: typed graph objects as a database driver hands them over,
//! and their serialization into the record shape the rest of the crate reads.
//!
//! ```text
//! DbNode         → {"id", "labels", "name", ...properties}
//! DbRelationship → {"type", "start", "end", ("id"), ...properties}
//! DbPath         → {"path_type": "neo4j_path", "nodes", "relationships",
//!                   "length", "path_summary"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::record::{Record, PATH_MARKER};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbNode {
    pub element_id: String,
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl DbNode {
    pub fn new(element_id: impl Into<String>, labels: &[&str]) -> Self {
        Self {
            element_id: element_id.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn to_value(&self) -> Value {
        let name = self
            .properties
            .get("name")
            .cloned()
            .unwrap_or_else(|| Value::String(self.element_id.clone()));
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(self.element_id.clone()));
        map.insert("labels".to_string(), json!(self.labels));
        map.insert("name".to_string(), name);
        for (k, v) in &self.properties {
            map.insert(k.clone(), v.clone());
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbRelationship {
    #[serde(default)]
    pub element_id: Option<String>,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl DbRelationship {
    pub fn new(rel_type: &str, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            element_id: None,
            rel_type: rel_type.to_string(),
            start: start.into(),
            end: end.into(),
            properties: Map::new(),
        }
    }

    pub fn with_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String(self.rel_type.clone()));
        map.insert("start".to_string(), Value::String(self.start.clone()));
        map.insert("end".to_string(), Value::String(self.end.clone()));
        if let Some(id) = &self.element_id {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        for (k, v) in &self.properties {
            map.insert(k.clone(), v.clone());
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbPath {
    pub nodes: Vec<DbNode>,
    pub relationships: Vec<DbRelationship>,
}

impl DbPath {
    pub fn to_value(&self) -> Value {
        let nodes: Vec<Value> = self.nodes.iter().map(DbNode::to_value).collect();
        let relationships: Vec<Value> =
            self.relationships.iter().map(DbRelationship::to_value).collect();
        json!({
            "path_type": PATH_MARKER,
            "nodes": nodes,
            "relationships": relationships,
            "length": self.relationships.len(),
            "path_summary": format!(
                "Path with {} nodes and {} relationships",
                self.nodes.len(),
                self.relationships.len()
            ),
        })
    }
}

/// A field value as produced by a driver.
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Node(DbNode),
    Relationship(DbRelationship),
    Path(DbPath),
    Scalar(Value),
}

impl DbValue {
    pub fn into_value(self) -> Value {
        match self {
            Self::Node(n) => n.to_value(),
            Self::Relationship(r) => r.to_value(),
            Self::Path(p) => p.to_value(),
            Self::Scalar(v) => v,
        }
    }
}

impl From<DbNode> for DbValue {
    fn from(node: DbNode) -> Self {
        Self::Node(node)
    }
}

impl From<DbRelationship> for DbValue {
    fn from(rel: DbRelationship) -> Self {
        Self::Relationship(rel)
    }
}

impl From<DbPath> for DbValue {
    fn from(path: DbPath) -> Self {
        Self::Path(path)
    }
}

/// Serialize one driver row into a [`Record`], keeping field order.
pub fn to_record<K, I>(fields: I) -> Record
where
    K: Into<String>,
    I: IntoIterator<Item = (K, DbValue)>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into_value()))
        .collect()
}
