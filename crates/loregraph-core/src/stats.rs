//! Summary counts for an extracted graph.

use serde::{Deserialize, Serialize};

use crate::extract::Extraction;

/// Headline numbers shown above the graph view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub relationships: usize,
    /// Node type → count, in first-seen order.
    pub node_types: Vec<(String, usize)>,
}

impl GraphStats {
    pub fn from_extraction(graph: &Extraction) -> Self {
        let mut node_types: Vec<(String, usize)> = Vec::new();
        for node in &graph.nodes {
            match node_types.iter_mut().find(|(ty, _)| *ty == node.node_type) {
                Some((_, count)) => *count += 1,
                None => node_types.push((node.node_type.clone(), 1)),
            }
        }
        Self {
            nodes: graph.nodes.len(),
            relationships: graph.relationships.len(),
            node_types,
        }
    }

    pub fn distinct_types(&self) -> usize {
        self.node_types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::GraphNode;

    #[test]
    fn counts_types_in_first_seen_order() {
        let mut graph = Extraction::default();
        for (name, ty) in [("Gwyn", "Character"), ("Kiln", "Location"), ("Nito", "Character")] {
            let mut node = GraphNode::placeholder(name);
            node.node_type = ty.to_string();
            graph.nodes.push(node);
        }
        graph.nodes.push(GraphNode::placeholder("4:9"));

        let stats = GraphStats::from_extraction(&graph);
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.relationships, 0);
        assert_eq!(
            stats.node_types,
            vec![
                ("Character".to_string(), 2),
                ("Location".to_string(), 1),
                ("Referenced".to_string(), 1)
            ]
        );
        assert_eq!(stats.distinct_types(), 3);
    }
}
