//! Layered (Sugiyama-style) layout on petgraph
//!
//! Phases:
//!   1. Cycle breaking (DFS back-edge reversal)
//!   2. Rank assignment (longest path)
//!   3. Ordering within ranks (one barycenter sweep)
//!   4. Coordinate assignment

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction as EdgeDirection;
use serde::{Deserialize, Serialize};
use tracegraph_core::{NodeId, Orientation, Position};

use crate::error::LayoutError;

/// A node as the layout algorithm sees it: an id and a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: NodeId,
    pub width: f64,
    pub height: f64,
}

/// Input graph plus the graph-level settings of one layout run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutGraph {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<(NodeId, NodeId)>,
    pub orientation: Orientation,
    pub rank_separation: f64,
    pub node_separation: f64,
}

/// Node centers computed by a layout run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    pub centers: HashMap<NodeId, Position>,
}

/// Contract of a hierarchical layout algorithm.
pub trait LayeredLayout {
    fn compute(&self, graph: &LayoutGraph) -> Result<LayoutResult, LayoutError>;
}

/// Longest-path ranking with a single barycenter ordering pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestPathLayout;

impl LayeredLayout for LongestPathLayout {
    fn compute(&self, graph: &LayoutGraph) -> Result<LayoutResult, LayoutError> {
        if graph.nodes.is_empty() {
            return Ok(LayoutResult::default());
        }

        let input = build_graph(graph)?;
        let dag = break_cycles(&input);
        let ranks = assign_ranks(&dag)?;
        let layers = order_layers(&dag, &ranks);
        let centers = assign_coordinates(graph, &dag, &layers);

        tracing::debug!(
            "Layered layout: {} nodes in {} ranks",
            graph.nodes.len(),
            layers.len()
        );
        Ok(LayoutResult { centers })
    }
}

// ─── Phase helpers ───────────────────────────────────────────────────────────

/// Node weights index into `LayoutGraph::nodes`.
fn build_graph(graph: &LayoutGraph) -> Result<DiGraph<usize, ()>, LayoutError> {
    let mut g = DiGraph::new();
    let mut lookup: HashMap<&NodeId, NodeIndex> = HashMap::new();
    for (i, node) in graph.nodes.iter().enumerate() {
        lookup.insert(&node.id, g.add_node(i));
    }

    for (source, target) in &graph.edges {
        let s = *lookup
            .get(source)
            .ok_or_else(|| LayoutError::UnknownNode(source.clone()))?;
        let t = *lookup
            .get(target)
            .ok_or_else(|| LayoutError::UnknownNode(target.clone()))?;
        if s != t {
            g.update_edge(s, t, ());
        }
    }
    Ok(g)
}

/// Copy of `g` with every DFS back edge reversed.
fn break_cycles(g: &DiGraph<usize, ()>) -> DiGraph<usize, ()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    let mut marks = vec![Mark::New; g.node_count()];
    let mut reversed: Vec<(NodeIndex, NodeIndex)> = Vec::new();

    for root in g.node_indices() {
        if marks[root.index()] != Mark::New {
            continue;
        }
        let mut stack: Vec<(NodeIndex, Vec<NodeIndex>)> = Vec::new();
        marks[root.index()] = Mark::Active;
        stack.push((root, successors(g, root)));

        while let Some((node, pending)) = stack.last_mut() {
            let node = *node;
            match pending.pop() {
                Some(next) => match marks[next.index()] {
                    Mark::New => {
                        marks[next.index()] = Mark::Active;
                        let next_succ = successors(g, next);
                        stack.push((next, next_succ));
                    }
                    Mark::Active => reversed.push((node, next)),
                    Mark::Done => {}
                },
                None => {
                    marks[node.index()] = Mark::Done;
                    stack.pop();
                }
            }
        }
    }

    if !reversed.is_empty() {
        tracing::debug!("Layered layout: reversed {} back edge(s)", reversed.len());
    }

    let mut dag = g.map(|_, w| *w, |_, _| ());
    for (from, to) in reversed {
        if let Some(edge) = dag.find_edge(from, to) {
            dag.remove_edge(edge);
        }
        if from != to {
            dag.update_edge(to, from, ());
        }
    }
    dag
}

/// Successors in reverse insertion order, so popping visits them in order.
fn successors(g: &DiGraph<usize, ()>, node: NodeIndex) -> Vec<NodeIndex> {
    let mut next: Vec<NodeIndex> = g.neighbors_directed(node, EdgeDirection::Outgoing).collect();
    next.sort_by_key(|n| std::cmp::Reverse(n.index()));
    next
}

fn assign_ranks(dag: &DiGraph<usize, ()>) -> Result<Vec<usize>, LayoutError> {
    let order = toposort(dag, None).map_err(|cycle| {
        LayoutError::Cycle(format!("node #{}", dag[cycle.node_id()]))
    })?;

    let mut ranks = vec![0usize; dag.node_count()];
    for node in order {
        let rank = dag
            .neighbors_directed(node, EdgeDirection::Incoming)
            .map(|p| ranks[p.index()] + 1)
            .max()
            .unwrap_or(0);
        ranks[node.index()] = rank;
    }
    Ok(ranks)
}

/// Group nodes per rank, then order each rank by the mean position of its
/// predecessors in the rank before it.
fn order_layers(dag: &DiGraph<usize, ()>, ranks: &[usize]) -> Vec<Vec<NodeIndex>> {
    let depth = ranks.iter().copied().max().map_or(0, |r| r + 1);
    let mut layers: Vec<Vec<NodeIndex>> = vec![Vec::new(); depth];
    for node in dag.node_indices() {
        layers[ranks[node.index()]].push(node);
    }

    let mut slot = vec![0.0f64; dag.node_count()];
    for layer in layers.iter_mut() {
        let mut keyed: Vec<(f64, NodeIndex)> = layer
            .iter()
            .enumerate()
            .map(|(i, &node)| {
                let preds: Vec<f64> = dag
                    .neighbors_directed(node, EdgeDirection::Incoming)
                    .map(|p| slot[p.index()])
                    .collect();
                let key = if preds.is_empty() {
                    i as f64
                } else {
                    preds.iter().sum::<f64>() / preds.len() as f64
                };
                (key, node)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        *layer = keyed.into_iter().map(|(_, node)| node).collect();
        for (i, node) in layer.iter().enumerate() {
            slot[node.index()] = i as f64;
        }
    }
    layers
}

fn assign_coordinates(
    graph: &LayoutGraph,
    dag: &DiGraph<usize, ()>,
    layers: &[Vec<NodeIndex>],
) -> HashMap<NodeId, Position> {
    let horizontal = matches!(
        graph.orientation,
        Orientation::LeftToRight | Orientation::RightToLeft
    );
    let flipped = matches!(
        graph.orientation,
        Orientation::RightToLeft | Orientation::BottomToTop
    );

    // (extent along the rank axis, extent across it)
    let extents = |node: NodeIndex| {
        let n = &graph.nodes[dag[node]];
        if horizontal {
            (n.width, n.height)
        } else {
            (n.height, n.width)
        }
    };

    let mut centers = HashMap::new();
    let mut rank_start = 0.0;
    for layer in layers {
        let thickness = layer
            .iter()
            .map(|&n| extents(n).0)
            .fold(0.0f64, f64::max);
        let along = rank_start + thickness / 2.0;

        let total: f64 = layer.iter().map(|&n| extents(n).1).sum::<f64>()
            + graph.node_separation * layer.len().saturating_sub(1) as f64;
        let mut cursor = -total / 2.0;

        for &node in layer {
            let across = cursor + extents(node).1 / 2.0;
            cursor += extents(node).1 + graph.node_separation;

            let along = if flipped { -along } else { along };
            let position = if horizontal {
                Position::new(along, across)
            } else {
                Position::new(across, along)
            };
            centers.insert(graph.nodes[dag[node]].id.clone(), position);
        }

        rank_start += thickness + graph.rank_separation;
    }
    centers
}
