//! Canvas preparation: an [`Extraction`] dressed for a vis-network style
//! node-link view (colors by category, tooltips, edge labels).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;

use crate::extract::{Extraction, GraphNode};
use crate::record::{display_string, is_truthy, truncate_text, TEXT_LIMIT};

/// Category → fill color. Order is the legend order.
pub const NODE_COLORS: [(&str, &str); 3] = [
    ("Character", "#4ECDC4"),
    ("Location", "#FF6B9D"),
    ("Group", "#C7EA46"),
];
pub const DEFAULT_NODE_COLOR: &str = "#95A5A6";
pub const EDGE_COLOR: &str = "#888888";
pub const DEFAULT_EDGE_LABEL: &str = "RELATED_TO";
pub const NODE_SIZE: u32 = 25;
pub const EDGE_WIDTH: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: String,
    pub label: String,
    /// Standardized category (first label, common misspellings fixed).
    pub group: String,
    pub color: String,
    pub size: u32,
    /// Hover text.
    pub title: String,
    /// Stands in for an endpoint the query didn't return.
    #[serde(default)]
    pub referenced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub color: String,
    pub width: u32,
    pub title: String,
    pub arrows: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasGraph {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub category: String,
    pub color: String,
}

impl CanvasGraph {
    pub fn from_extraction(graph: &Extraction) -> Self {
        let mut known: HashSet<&str> = HashSet::new();
        let mut members: Vec<GraphNode> = Vec::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            if known.insert(node.id.as_str()) {
                members.push(node.clone());
            }
        }
        // Extractions built elsewhere may reference endpoints they don't list.
        for rel in &graph.relationships {
            for name in [rel.source.as_str(), rel.target.as_str()] {
                if !name.is_empty() && known.insert(name) {
                    members.push(GraphNode::placeholder(name));
                }
            }
        }

        let nodes = members
            .iter()
            .map(canvas_node)
            .collect();
        let edges = graph
            .relationships
            .iter()
            .filter(|rel| known.contains(rel.source.as_str()) && known.contains(rel.target.as_str()))
            .map(|rel| {
                let label = if rel.rel_type.is_empty() {
                    DEFAULT_EDGE_LABEL.to_string()
                } else {
                    rel.rel_type.clone()
                };
                CanvasEdge {
                    title: format!("{} --{}--> {}", rel.source, label, rel.target),
                    from: rel.source.clone(),
                    to: rel.target.clone(),
                    label,
                    color: EDGE_COLOR.to_string(),
                    width: EDGE_WIDTH,
                    arrows: "to".to_string(),
                }
            })
            .collect();

        Self { nodes, edges }
    }
}

fn canvas_node(node: &GraphNode) -> CanvasNode {
    let group = standardize_category(&node.node_type);
    let mut title = format!("Name: {}\nType: {}", node.name, group);
    if let Some(desc) = node.description().filter(|v| is_truthy(v)) {
        title.push_str("\nDescription: ");
        title.push_str(&truncate_text(&display_string(desc), TEXT_LIMIT));
    }
    CanvasNode {
        id: node.id.clone(),
        label: node.name.clone(),
        color: category_color(&group).to_string(),
        group,
        size: NODE_SIZE,
        title,
        referenced: node.is_placeholder(),
    }
}

/// First `/`-separated label, with known misspellings folded onto the
/// canonical category.
pub fn standardize_category(node_type: &str) -> String {
    let first = node_type.split('/').next().unwrap_or(node_type);
    match first.to_lowercase().as_str() {
        "character" | "charcter" => "Character".to_string(),
        "location" | "locaton" => "Location".to_string(),
        "group" | "groupe" => "Group".to_string(),
        _ => first.to_string(),
    }
}

pub fn category_color(category: &str) -> &'static str {
    NODE_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_NODE_COLOR)
}

pub fn legend() -> Vec<LegendEntry> {
    NODE_COLORS
        .iter()
        .map(|(category, color)| LegendEntry {
            category: category.to_string(),
            color: color.to_string(),
        })
        .collect()
}

/// Physics and interaction settings for the network canvas.
pub fn network_options() -> Value {
    json!({
        "physics": {
            "enabled": true,
            "stabilization": {"iterations": 200, "fit": true},
            "barnesHut": {
                "gravitationalConstant": -8000,
                "centralGravity": 0.3,
                "springLength": 80,
                "springConstant": 0.04,
                "damping": 0.15,
                "avoidOverlap": 0.2
            }
        },
        "interaction": {
            "navigationButtons": true,
            "keyboard": true,
            "zoomView": true,
            "dragView": true,
            "hideEdgesOnDrag": false,
            "hideNodesOnDrag": false
        },
        "layout": {"improvedLayout": true, "clusterThreshold": 150},
        "configure": {"enabled": false}
    })
}
