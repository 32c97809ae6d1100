//! Graph store: the single owner of node, edge, focus and history state
//!
//! Every mutating operation builds new lists, commits them, and hands back a
//! [`GraphDiff`]. Undo and redo are their own commit kind, so restoring a
//! snapshot never records one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::{CapturePolicy, EngineConfig};
use crate::diff::{DiffEngine, GraphDiff};
use crate::error::{GraphError, Result};
use crate::exposure::{self, ExposureTree};
use crate::history::{GraphSnapshot, History};
use crate::index::RecordIndex;
use crate::merge::{self, Expansion};
use crate::model::*;
use crate::placement::clear_column;
use crate::reveal::{self, RevealState};
use crate::volume::{EdgeStyle, VolumeScale};

/// Operations a collaborator can issue against a [`GraphStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum GraphCommand {
    Expand {
        paths: Vec<Vec<String>>,
        #[serde(default)]
        incoming: bool,
    },
    AddAddress {
        address: String,
        #[serde(default)]
        position: Option<Position>,
    },
    RemoveNode {
        id: NodeId,
    },
    MergeEdges {
        edges: Vec<GraphEdge>,
    },
    ToggleEdge {
        id: EdgeId,
    },
    SetFocus {
        #[serde(default)]
        id: Option<NodeId>,
    },
    SetNodeDisplay {
        id: NodeId,
        state: NodeDisplay,
    },
    SetHighlight {
        id: NodeId,
        highlight: bool,
    },
    Undo,
    Redo,
}

/// Result of [`GraphStore::expand`].
#[derive(Debug, Clone)]
pub struct Expanded {
    pub final_node: NodeId,
    pub diff: GraphDiff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Commit {
    Mutation,
    Replay,
}

#[derive(Debug)]
pub struct GraphStore {
    nodes: RecordIndex<GraphNode>,
    edges: RecordIndex<GraphEdge>,
    focus: Option<NodeId>,
    volume: VolumeScale,
    history: History,
    diffs: DiffEngine,
    config: EngineConfig,
}

impl GraphStore {
    pub fn new(config: EngineConfig) -> Self {
        let mut store = GraphStore {
            nodes: RecordIndex::new(),
            edges: RecordIndex::new(),
            focus: None,
            volume: VolumeScale::default(),
            history: History::new(config.history.capacity),
            diffs: DiffEngine::new(),
            config,
        };
        store.history.record(store.snapshot());
        store
    }

    /// Build a store over an existing graph. Edge ids are re-derived from
    /// their endpoints; repeated node or edge ids are rejected.
    pub fn from_parts(
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let nodes = RecordIndex::try_from_items(nodes).map_err(GraphError::DuplicateNode)?;
        let edges = RecordIndex::try_from_items(edges.into_iter().map(canonical_edge).collect())
            .map_err(GraphError::DuplicateEdge)?;

        let mut store = GraphStore {
            nodes,
            edges,
            focus: None,
            volume: VolumeScale::default(),
            history: History::new(config.history.capacity),
            diffs: DiffEngine::new(),
            config,
        };
        store.rebuild_index();
        store.history.record(store.snapshot());
        tracing::info!(
            "Graph store loaded: {} nodes, {} edges",
            store.nodes.len(),
            store.edges.len()
        );
        Ok(store)
    }

    // ── Read model ──────────────────────────────────────────

    pub fn nodes(&self) -> &[GraphNode] {
        self.nodes.items()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        self.edges.items()
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    pub fn focus(&self) -> Option<&NodeId> {
        self.focus.as_ref()
    }

    /// Edges the renderer should draw for the current focus. Edges with an
    /// endpoint missing from the graph are never drawn.
    pub fn visible_edges(&self) -> Vec<&GraphEdge> {
        reveal::visible_edges(self.edges.items(), self.focus.as_ref())
            .filter(|e| self.nodes.contains(&e.source) && self.nodes.contains(&e.target))
            .collect()
    }

    pub fn volume_scale(&self) -> VolumeScale {
        self.volume
    }

    pub fn edge_style(&self, id: &EdgeId) -> Option<EdgeStyle> {
        self.edges
            .get(id)
            .map(|e| self.volume.style(e.data.volume, &self.config.stroke))
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::new(self.nodes.items().to_vec(), self.edges.items().to_vec())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Mutations ───────────────────────────────────────────

    pub fn apply(&mut self, command: GraphCommand) -> Result<GraphDiff> {
        match command {
            GraphCommand::Expand { paths, incoming } => {
                let expansion = Expansion::new(paths, Direction::from_incoming(incoming));
                Ok(self.expand(&expansion)?.diff)
            }
            GraphCommand::AddAddress { address, position } => {
                Ok(self.add_address(&address, position)?.1)
            }
            GraphCommand::RemoveNode { id } => self.remove_node(&id),
            GraphCommand::MergeEdges { edges } => Ok(self.merge_edges(edges)),
            GraphCommand::ToggleEdge { id } => Ok(self.toggle_edge(&id)?.1),
            GraphCommand::SetFocus { id } => {
                self.set_focus(id)?;
                Ok(GraphDiff::new(self.diffs.sequence()))
            }
            GraphCommand::SetNodeDisplay { id, state } => self.set_node_display(&id, state),
            GraphCommand::SetHighlight { id, highlight } => self.set_highlight(&id, highlight),
            GraphCommand::Undo => Ok(self
                .undo()
                .unwrap_or_else(|| GraphDiff::new(self.diffs.sequence()))),
            GraphCommand::Redo => Ok(self
                .redo()
                .unwrap_or_else(|| GraphDiff::new(self.diffs.sequence()))),
        }
    }

    /// Merge expansion paths into the graph. A failed merge changes nothing.
    pub fn expand(&mut self, expansion: &Expansion) -> Result<Expanded> {
        let outcome = merge::merge_paths(
            self.nodes.items(),
            self.edges.items(),
            expansion,
            &self.config.placement,
        )?;
        let diff = self.commit(outcome.nodes, outcome.edges, Commit::Mutation);
        tracing::info!(
            "Expanded {} path(s) towards {}: {}",
            expansion.paths.len(),
            outcome.final_node,
            diff.summary()
        );
        Ok(Expanded {
            final_node: outcome.final_node,
            diff,
        })
    }

    /// Expand `origin` along the largest exposures of an analysis result and
    /// resolve direct counterparty volumes, as a single commit.
    pub fn expand_exposure(
        &mut self,
        origin: &NodeId,
        tree: &ExposureTree,
        direction: Direction,
    ) -> Result<Expanded> {
        let paths = exposure::paths_from_exposure(origin, tree, self.config.exposure.max_paths);
        let expansion = Expansion::new(paths, direction);
        let outcome = merge::merge_paths(
            self.nodes.items(),
            self.edges.items(),
            &expansion,
            &self.config.placement,
        )?;
        // Counterparties cut by the path cap have no node to attach to.
        let present: HashSet<&NodeId> = outcome.nodes.iter().map(|n| &n.id).collect();
        let resolved: Vec<GraphEdge> = exposure::edges_from_exposure(origin, tree, direction)
            .into_iter()
            .filter(|e| present.contains(&e.source) && present.contains(&e.target))
            .collect();
        let edges = merge::merge_edges(&outcome.nodes, &outcome.edges, resolved);

        let diff = self.commit(outcome.nodes, edges, Commit::Mutation);
        tracing::info!(
            "Expanded {} exposure path(s) from {}: {}",
            expansion.paths.len(),
            origin,
            diff.summary()
        );
        Ok(Expanded {
            final_node: outcome.final_node,
            diff,
        })
    }

    /// Explicitly add one address. Without a position the node goes to the
    /// first clear slot at or above the canvas origin. Adding an address that
    /// is already present changes nothing.
    pub fn add_address(
        &mut self,
        address: &str,
        position: Option<Position>,
    ) -> Result<(NodeId, GraphDiff)> {
        let id = NodeId::new(address)?;
        let mut nodes = self.nodes.items().to_vec();
        if !self.nodes.contains(&id) {
            let position = match position {
                Some(position) => position,
                None => clear_column(Position::default(), 1, &nodes, &self.config.placement)?,
            };
            nodes.push(GraphNode::new(id.clone(), position));
        }
        let edges = self.edges.items().to_vec();
        let diff = self.commit(nodes, edges, Commit::Mutation);
        Ok((id, diff))
    }

    /// Delete a node together with every edge incident to it.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<GraphDiff> {
        if !self.nodes.contains(id) {
            return Err(GraphError::NodeNotFound(id.clone()));
        }
        let nodes = self.nodes.iter().filter(|n| &n.id != id).cloned().collect();
        let edges = self.edges.iter().filter(|e| !e.touches(id)).cloned().collect();
        Ok(self.commit(nodes, edges, Commit::Mutation))
    }

    /// Fold directly constructed edges in under the max-volume / reveal-promotion rule.
    pub fn merge_edges(&mut self, incoming: Vec<GraphEdge>) -> GraphDiff {
        let edges = merge::merge_edges(
            self.nodes.items(),
            self.edges.items(),
            incoming.into_iter().map(canonical_edge),
        );
        let nodes = self.nodes.items().to_vec();
        self.commit(nodes, edges, Commit::Mutation)
    }

    /// Explicit reveal toggle; the only way an edge goes back to hidden.
    pub fn toggle_edge(&mut self, id: &EdgeId) -> Result<(RevealState, GraphDiff)> {
        let mut edges = self.edges.clone();
        let edge = edges
            .get_mut(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;
        edge.data.state = edge.data.state.toggled();
        let state = edge.data.state;

        let nodes = self.nodes.items().to_vec();
        let diff = self.commit(nodes, edges.into_items(), Commit::Mutation);
        Ok((state, diff))
    }

    pub fn set_focus(&mut self, id: Option<NodeId>) -> Result<()> {
        if let Some(id) = &id {
            if !self.nodes.contains(id) {
                return Err(GraphError::NodeNotFound(id.clone()));
            }
        }
        self.focus = id;
        Ok(())
    }

    pub fn set_node_display(&mut self, id: &NodeId, state: NodeDisplay) -> Result<GraphDiff> {
        self.update_node(id, |node| node.data.state = state)
    }

    pub fn set_highlight(&mut self, id: &NodeId, highlight: bool) -> Result<GraphDiff> {
        self.update_node(id, |node| node.data.highlight = highlight)
    }

    /// Write back externally computed positions, e.g. from the layered layout.
    /// Unknown ids are skipped; every edge's handles are refreshed.
    pub fn apply_positions(
        &mut self,
        positions: impl IntoIterator<Item = (NodeId, Position)>,
    ) -> GraphDiff {
        let mut nodes = self.nodes.clone();
        for (id, position) in positions {
            match nodes.get_mut(&id) {
                Some(node) => node.position = position,
                None => tracing::debug!("Ignoring position for unknown node {}", id),
            }
        }

        let mut edges = self.edges.clone();
        let ids: Vec<EdgeId> = edges.iter().map(|e| e.id.clone()).collect();
        merge::refresh_handles(&nodes, &mut edges, &ids);

        self.commit(nodes.into_items(), edges.into_items(), Commit::Mutation)
    }

    /// Step back one snapshot. `None` when there is nothing older.
    pub fn undo(&mut self) -> Option<GraphDiff> {
        let snapshot = self.history.undo()?.clone();
        tracing::debug!("Undo to depth {}", self.history.undo_depth());
        Some(self.restore(snapshot))
    }

    /// Step forward one snapshot. `None` when already at the newest.
    pub fn redo(&mut self) -> Option<GraphDiff> {
        let snapshot = self.history.redo()?.clone();
        tracing::debug!("Redo to depth {}", self.history.undo_depth());
        Some(self.restore(snapshot))
    }

    /// Re-derive id indexes and cached volume statistics from the lists.
    pub fn rebuild_index(&mut self) {
        self.nodes.rebuild();
        self.edges.rebuild();
        self.volume = VolumeScale::from_edges(self.nodes.items(), self.edges.items());
        if let Some(focus) = &self.focus {
            if !self.nodes.contains(focus) {
                self.focus = None;
            }
        }
    }

    // ── Internals ───────────────────────────────────────────

    fn restore(&mut self, snapshot: GraphSnapshot) -> GraphDiff {
        self.commit(
            snapshot.nodes().to_vec(),
            snapshot.edges().to_vec(),
            Commit::Replay,
        )
    }

    fn update_node(&mut self, id: &NodeId, f: impl FnOnce(&mut GraphNode)) -> Result<GraphDiff> {
        let mut nodes = self.nodes.clone();
        let node = nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        f(node);
        let edges = self.edges.items().to_vec();
        Ok(self.commit(nodes.into_items(), edges, Commit::Mutation))
    }

    fn commit(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>, kind: Commit) -> GraphDiff {
        let diff = self
            .diffs
            .compute_diff(self.nodes.items(), self.edges.items(), &nodes, &edges);
        let counts_changed = nodes.len() != self.nodes.len() || edges.len() != self.edges.len();

        self.nodes = RecordIndex::from_items(nodes);
        self.edges = RecordIndex::from_items(edges);
        self.rebuild_index();

        if kind == Commit::Mutation {
            let capture = match self.config.history.capture {
                CapturePolicy::CountChange => counts_changed,
                CapturePolicy::AnyChange => !diff.is_empty(),
            };
            if capture {
                self.history.record(self.snapshot());
                tracing::debug!("Recorded history snapshot ({} retained)", self.history.len());
            }
        }

        tracing::debug!("Committed {}", diff.summary());
        diff
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn canonical_edge(mut edge: GraphEdge) -> GraphEdge {
    edge.id = EdgeId::between(&edge.source, &edge.target);
    edge
}
