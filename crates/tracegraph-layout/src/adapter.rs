//! Bridge between the graph read model and the layered layout engine

use std::collections::{HashMap, HashSet};

use tracegraph_core::{
    EdgeHandles, GraphDiff, GraphEdge, GraphNode, GraphStore, LayoutConfig, NodeId, Position,
    RevealState, to_index,
};

use crate::error::LayoutError;
use crate::layered::{LayeredLayout, LayoutGraph, LayoutNode};

/// Layout input for the current graph.
///
/// Only revealed edges whose endpoints are both present take part; hidden and
/// dangling relationships would otherwise pull ranks apart. Nodes without
/// measured dimensions get the configured default box.
pub fn to_layout_graph(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    config: &LayoutConfig,
) -> LayoutGraph {
    let present: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();

    let layout_nodes = nodes
        .iter()
        .map(|node| {
            let (width, height) = node
                .dimensions
                .map_or((config.node_width, config.node_height), |d| (d.width, d.height));
            LayoutNode {
                id: node.id.clone(),
                width,
                height,
            }
        })
        .collect();

    let layout_edges: Vec<(NodeId, NodeId)> = edges
        .iter()
        .filter(|e| e.data.state == RevealState::Revealed)
        .filter(|e| present.contains(&e.source) && present.contains(&e.target))
        .map(|e| (e.source.clone(), e.target.clone()))
        .collect();

    tracing::debug!(
        "Layout input: {} nodes, {} of {} edges participating",
        nodes.len(),
        layout_edges.len(),
        edges.len()
    );

    LayoutGraph {
        nodes: layout_nodes,
        edges: layout_edges,
        orientation: config.orientation,
        rank_separation: config.rank_separation,
        node_separation: config.node_separation,
    }
}

/// Top-left positions for every node the engine placed.
pub fn layout_positions(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    engine: &dyn LayeredLayout,
    config: &LayoutConfig,
) -> Result<Vec<(NodeId, Position)>, LayoutError> {
    let graph = to_layout_graph(nodes, edges, config);
    let result = engine.compute(&graph)?;

    // Engines report centers; the canvas anchors nodes at their top-left corner.
    Ok(graph
        .nodes
        .iter()
        .filter_map(|n| {
            result.centers.get(&n.id).map(|center| {
                let top_left = Position::new(center.x - n.width / 2.0, center.y - n.height / 2.0);
                (n.id.clone(), top_left)
            })
        })
        .collect())
}

/// Re-layout a node/edge list.
///
/// Returns the nodes with only their positions rewritten, and the edges with
/// handle sides recomputed for the new positions.
pub fn layout_nodes(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    engine: &dyn LayeredLayout,
    config: &LayoutConfig,
) -> Result<(Vec<GraphNode>, Vec<GraphEdge>), LayoutError> {
    let positions: HashMap<NodeId, Position> =
        layout_positions(nodes, edges, engine, config)?.into_iter().collect();

    let laid_out: Vec<GraphNode> = nodes
        .iter()
        .cloned()
        .map(|mut node| {
            if let Some(position) = positions.get(&node.id) {
                node.position = *position;
            }
            node
        })
        .collect();

    let by_id = to_index(&laid_out);
    let edges = edges
        .iter()
        .cloned()
        .map(|mut edge| {
            if let (Some(s), Some(t)) = (by_id.get(&edge.source), by_id.get(&edge.target)) {
                edge.handles = Some(EdgeHandles::for_positions(s.position, t.position));
            }
            edge
        })
        .collect();

    Ok((laid_out, edges))
}

/// Re-layout the store in place, as one committed mutation.
pub fn layout_store(
    store: &mut GraphStore,
    engine: &dyn LayeredLayout,
) -> Result<GraphDiff, LayoutError> {
    let positions = layout_positions(store.nodes(), store.edges(), engine, &store.config().layout)?;
    tracing::info!("Applied layered layout to {} nodes", positions.len());
    Ok(store.apply_positions(positions))
}
