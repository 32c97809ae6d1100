//! Graph diff computation for incremental updates

use crate::index::to_index;
use crate::model::*;
use serde::{Deserialize, Serialize};

/// Represents a change to the graph that the renderer can apply incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDiff {
    /// Monotonically increasing diff sequence number.
    pub sequence: u64,
    /// Nodes added in this update.
    pub added_nodes: Vec<GraphNode>,
    /// Nodes removed in this update.
    pub removed_nodes: Vec<NodeId>,
    /// Nodes whose position changed.
    pub moved_nodes: Vec<NodeId>,
    /// Nodes whose display data changed.
    pub modified_nodes: Vec<NodeId>,
    /// Edges added in this update.
    pub added_edges: Vec<GraphEdge>,
    /// Edges removed in this update.
    pub removed_edges: Vec<EdgeId>,
    /// Edges whose volume, state or handles changed (new values).
    pub modified_edges: Vec<GraphEdge>,
}

impl GraphDiff {
    /// Create an empty diff with given sequence number.
    pub fn new(sequence: u64) -> Self {
        GraphDiff {
            sequence,
            ..Default::default()
        }
    }

    /// Check if this diff is empty (no changes).
    pub fn is_empty(&self) -> bool {
        self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.moved_nodes.is_empty()
            && self.modified_nodes.is_empty()
            && self.added_edges.is_empty()
            && self.removed_edges.is_empty()
            && self.modified_edges.is_empty()
    }

    /// One-line summary for logs and the CLI.
    pub fn summary(&self) -> String {
        format!(
            "#{}: +{} -{} ~{} nodes, +{} -{} ~{} edges",
            self.sequence,
            self.added_nodes.len(),
            self.removed_nodes.len(),
            self.moved_nodes.len() + self.modified_nodes.len(),
            self.added_edges.len(),
            self.removed_edges.len(),
            self.modified_edges.len(),
        )
    }
}

/// Diff state for incremental updates.
#[derive(Debug)]
pub struct DiffEngine {
    sequence: u64,
}

impl DiffEngine {
    pub fn new() -> Self {
        DiffEngine { sequence: 0 }
    }

    /// Compute the difference between two graph states.
    /// Returns a GraphDiff with the sequence number incremented.
    pub fn compute_diff(
        &mut self,
        old_nodes: &[GraphNode],
        old_edges: &[GraphEdge],
        new_nodes: &[GraphNode],
        new_edges: &[GraphEdge],
    ) -> GraphDiff {
        self.sequence += 1;
        let mut diff = GraphDiff::new(self.sequence);

        let old_node_index = to_index(old_nodes);
        let new_node_index = to_index(new_nodes);

        for node in new_nodes {
            match old_node_index.get(&node.id) {
                None => diff.added_nodes.push(node.clone()),
                Some(old) => {
                    if old.position != node.position {
                        diff.moved_nodes.push(node.id.clone());
                    }
                    if old.data != node.data || old.dimensions != node.dimensions {
                        diff.modified_nodes.push(node.id.clone());
                    }
                }
            }
        }
        for node in old_nodes {
            if !new_node_index.contains_key(&node.id) {
                diff.removed_nodes.push(node.id.clone());
            }
        }

        let old_edge_index = to_index(old_edges);
        let new_edge_index = to_index(new_edges);

        for edge in new_edges {
            match old_edge_index.get(&edge.id) {
                None => diff.added_edges.push(edge.clone()),
                Some(old) if *old != edge => diff.modified_edges.push(edge.clone()),
                Some(_) => {}
            }
        }
        for edge in old_edges {
            if !new_edge_index.contains_key(&edge.id) {
                diff.removed_edges.push(edge.id.clone());
            }
        }

        diff
    }

    /// Get current sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}
