//! Path merge engine: folds expansion paths into an existing graph
//!
//! Merges are copy-on-write. The caller's node and edge slices are never
//! touched; a failed merge leaves nothing half-applied.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::PlacementConfig;
use crate::error::{GraphError, Result};
use crate::index::{RecordIndex, Upsert};
use crate::model::{Direction, EdgeHandles, EdgeId, GraphEdge, GraphNode, NodeId};
use crate::placement::place_rank;

/// One expansion request: parallel paths from a common origin outward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expansion {
    pub paths: Vec<Vec<String>>,
    pub direction: Direction,
}

impl Expansion {
    pub fn new(paths: Vec<Vec<String>>, direction: Direction) -> Self {
        Expansion { paths, direction }
    }

    pub fn incoming(paths: Vec<Vec<String>>) -> Self {
        Expansion::new(paths, Direction::Incoming)
    }

    pub fn outgoing(paths: Vec<Vec<String>>) -> Self {
        Expansion::new(paths, Direction::Outgoing)
    }
}

/// Result of a merge: the new lists plus bookkeeping for the caller.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Last address of the first path, for callers that focus the new frontier.
    pub final_node: NodeId,
    pub added_nodes: usize,
    pub added_edges: usize,
    pub merged_edges: usize,
}

/// Paths with every address canonicalized and the shared origin checked.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPaths {
    pub origin: NodeId,
    pub paths: Vec<Vec<NodeId>>,
}

pub fn normalize_paths(paths: &[Vec<String>]) -> Result<NormalizedPaths> {
    if paths.is_empty() {
        return Err(GraphError::EmptyExpansion);
    }

    let mut normalized = Vec::with_capacity(paths.len());
    for (index, path) in paths.iter().enumerate() {
        if path.is_empty() {
            return Err(GraphError::EmptyPath { index });
        }
        let ids = path
            .iter()
            .map(|addr| NodeId::new(addr))
            .collect::<Result<Vec<_>>>()?;
        normalized.push(ids);
    }

    let origin = normalized[0][0].clone();
    for (index, path) in normalized.iter().enumerate().skip(1) {
        if path[0] != origin {
            return Err(GraphError::MixedOrigins {
                index,
                expected: origin,
                found: path[0].clone(),
            });
        }
    }

    Ok(NormalizedPaths {
        origin,
        paths: normalized,
    })
}

/// Group addresses by hop distance across all paths.
///
/// `result[d]` holds every distinct address found at position `d` of some
/// path, in first-seen order.
pub fn bucket_by_hop(paths: &[Vec<NodeId>]) -> Vec<Vec<NodeId>> {
    let depth = paths.iter().map(Vec::len).max().unwrap_or(0);
    let mut buckets: Vec<Vec<NodeId>> = vec![Vec::new(); depth];
    let mut seen: Vec<HashSet<&NodeId>> = vec![HashSet::new(); depth];

    for path in paths {
        for (hop, id) in path.iter().enumerate() {
            if seen[hop].insert(id) {
                buckets[hop].push(id.clone());
            }
        }
    }
    buckets
}

/// Edges implied by adjacent pairs of every path.
///
/// Incoming paths point from the farther hop to the nearer one, outgoing
/// paths the other way. Self-loops from repeated adjacent addresses are
/// dropped.
pub fn synthesize_edges(paths: &[Vec<NodeId>], direction: Direction) -> Vec<GraphEdge> {
    let mut edges = Vec::new();
    for path in paths {
        for pair in path.windows(2) {
            let (near, far) = (&pair[0], &pair[1]);
            if near == far {
                tracing::debug!("Skipping self-loop on {}", near);
                continue;
            }
            let edge = match direction {
                Direction::Incoming => GraphEdge::unresolved(far.clone(), near.clone()),
                Direction::Outgoing => GraphEdge::unresolved(near.clone(), far.clone()),
            };
            edges.push(edge);
        }
    }
    edges
}

/// Insert an edge, or fold it into the stored edge with the same id.
pub fn upsert_edge(index: &mut RecordIndex<GraphEdge>, edge: GraphEdge) -> Upsert {
    index.upsert_with(edge, |existing, incoming| existing.data.absorb(&incoming.data))
}

/// Recompute routing handles for `ids` from current endpoint positions.
pub fn refresh_handles<'a>(
    nodes: &RecordIndex<GraphNode>,
    edges: &mut RecordIndex<GraphEdge>,
    ids: impl IntoIterator<Item = &'a EdgeId>,
) {
    for id in ids {
        let Some(edge) = edges.get_mut(id) else {
            continue;
        };
        if let (Some(source), Some(target)) = (nodes.get(&edge.source), nodes.get(&edge.target)) {
            edge.handles = Some(EdgeHandles::for_positions(source.position, target.position));
        }
    }
}

/// Merge `expansion` into the graph described by `nodes` and `edges`.
///
/// The origin (hop 0) must already be a node; its position anchors the
/// placement of every new rank. Merging the same expansion twice adds
/// nothing and moves nothing the second time.
pub fn merge_paths(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    expansion: &Expansion,
    config: &PlacementConfig,
) -> Result<MergeOutcome> {
    let normalized = normalize_paths(&expansion.paths)?;

    let mut node_index = RecordIndex::from_items(nodes.to_vec());
    let mut edge_index = RecordIndex::from_items(edges.to_vec());

    let origin_position = node_index
        .get(&normalized.origin)
        .map(|n| n.position)
        .ok_or_else(|| GraphError::OriginMissing(normalized.origin.clone()))?;

    let mut touched: Vec<EdgeId> = Vec::new();
    let mut added_edges = 0;
    let mut merged_edges = 0;
    for edge in synthesize_edges(&normalized.paths, expansion.direction) {
        touched.push(edge.id.clone());
        match upsert_edge(&mut edge_index, edge) {
            Upsert::Inserted => added_edges += 1,
            Upsert::Merged => merged_edges += 1,
        }
    }

    let mut added_nodes = 0;
    for (hop, bucket) in bucket_by_hop(&normalized.paths).into_iter().enumerate().skip(1) {
        let fresh: Vec<NodeId> = bucket
            .into_iter()
            .filter(|id| !node_index.contains(id))
            .collect();
        if fresh.is_empty() {
            continue;
        }

        let slots = place_rank(
            origin_position,
            hop,
            expansion.direction,
            fresh.len(),
            node_index.items(),
            config,
        )?;
        for (id, position) in fresh.into_iter().zip(slots) {
            node_index.insert(GraphNode::new(id, position));
            added_nodes += 1;
        }
    }

    refresh_handles(&node_index, &mut edge_index, &touched);

    let final_node = normalized.paths[0]
        .last()
        .cloned()
        .unwrap_or_else(|| normalized.origin.clone());

    tracing::debug!(
        "Merged {} path(s) from {} ({:?}): +{} nodes, +{} edges, {} edge(s) reconciled",
        normalized.paths.len(),
        normalized.origin,
        expansion.direction,
        added_nodes,
        added_edges,
        merged_edges
    );

    Ok(MergeOutcome {
        nodes: node_index.into_items(),
        edges: edge_index.into_items(),
        final_node,
        added_nodes,
        added_edges,
        merged_edges,
    })
}

/// Fold directly constructed edges (e.g. resolved volumes from the analysis
/// collaborator) into `edges` under the max-volume / reveal-promotion rule.
pub fn merge_edges(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    incoming: impl IntoIterator<Item = GraphEdge>,
) -> Vec<GraphEdge> {
    let node_index = RecordIndex::from_items(nodes.to_vec());
    let mut edge_index = RecordIndex::from_items(edges.to_vec());
    let mut touched = Vec::new();

    for edge in incoming {
        if !node_index.contains(&edge.source) || !node_index.contains(&edge.target) {
            tracing::warn!("Dropping edge {}: endpoint is not in the graph", edge.id);
            continue;
        }
        touched.push(edge.id.clone());
        upsert_edge(&mut edge_index, edge);
    }

    refresh_handles(&node_index, &mut edge_index, &touched);
    edge_index.into_items()
}
