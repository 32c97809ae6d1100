//! Test utilities for Tracegraph

use std::collections::HashSet;

use crate::config::{EngineConfig, PlacementConfig};
use crate::model::*;
use crate::placement::collides;
use crate::store::GraphStore;

pub fn id(address: &str) -> NodeId {
    NodeId::new(address).unwrap()
}

/// Owned expansion paths from string literals.
pub fn paths(paths: &[&[&str]]) -> Vec<Vec<String>> {
    paths
        .iter()
        .map(|p| p.iter().map(|a| a.to_string()).collect())
        .collect()
}

/// A graph holding just the origin node.
pub fn graph_with_origin(address: &str, position: Position) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    (vec![GraphNode::new(id(address), position)], Vec::new())
}

/// A store holding just the origin node at (0, 0).
pub fn store_with_origin(address: &str) -> GraphStore {
    store_with_origin_config(address, EngineConfig::default())
}

pub fn store_with_origin_config(address: &str, config: EngineConfig) -> GraphStore {
    let (nodes, edges) = graph_with_origin(address, Position::default());
    GraphStore::from_parts(nodes, edges, config).unwrap()
}

/// Panic if any node or edge id occurs twice.
pub fn assert_unique_ids(nodes: &[GraphNode], edges: &[GraphEdge]) {
    let mut node_ids = HashSet::new();
    for node in nodes {
        assert!(node_ids.insert(&node.id), "duplicate node {}", node.id);
    }
    let mut edge_ids = HashSet::new();
    for edge in edges {
        assert!(edge_ids.insert(&edge.id), "duplicate edge {}", edge.id);
    }
}

/// Every pair of nodes closer than the proximity thresholds.
pub fn overlapping_pairs<'a>(
    nodes: &'a [GraphNode],
    config: &PlacementConfig,
) -> Vec<(&'a NodeId, &'a NodeId)> {
    let mut pairs = Vec::new();
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            if collides(a.position, b.position, config) {
                pairs.push((&a.id, &b.id));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_with_origin() {
        let store = store_with_origin("0xABC");
        assert_eq!(store.nodes().len(), 1);
        assert_eq!(store.nodes()[0].id.as_str(), "0xabc");
        assert!(store.edges().is_empty());
    }

    #[test]
    fn test_overlapping_pairs_detects_collision() {
        let nodes = vec![
            GraphNode::new(id("a"), Position::new(0.0, 0.0)),
            GraphNode::new(id("b"), Position::new(100.0, 50.0)),
            GraphNode::new(id("c"), Position::new(1000.0, 0.0)),
        ];
        let pairs = overlapping_pairs(&nodes, &PlacementConfig::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.as_str(), "a");
    }
}
