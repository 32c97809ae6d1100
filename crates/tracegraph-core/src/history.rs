//! Bounded linear undo/redo over full graph snapshots

use std::collections::VecDeque;
use std::sync::Arc;

use crate::model::{GraphEdge, GraphNode};

/// Immutable pairing of the full node and edge lists at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSnapshot {
    nodes: Arc<[GraphNode]>,
    edges: Arc<[GraphEdge]>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        GraphSnapshot {
            nodes: nodes.into(),
            edges: edges.into(),
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }
}

/// Snapshot log with an undo depth counted back from the newest entry.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<GraphSnapshot>,
    undo_depth: usize,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        History {
            snapshots: VecDeque::new(),
            undo_depth: 0,
            capacity: capacity.max(1),
        }
    }

    /// Append a snapshot of a fresh mutation.
    ///
    /// Entries newer than the visible one are discarded first, then the
    /// oldest entries are evicted down to capacity. The depth resets to 0.
    pub fn record(&mut self, snapshot: GraphSnapshot) {
        if self.undo_depth > 0 {
            let keep = self.snapshots.len() - self.undo_depth;
            tracing::debug!("History: discarding {} redo snapshot(s)", self.undo_depth);
            self.snapshots.truncate(keep);
            self.undo_depth = 0;
        }

        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
            tracing::debug!("History: evicted oldest snapshot");
        }
    }

    /// Step one snapshot back. `None` when already at the oldest retained entry.
    pub fn undo(&mut self) -> Option<&GraphSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.undo_depth += 1;
        self.current()
    }

    /// Step one snapshot forward. `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<&GraphSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.undo_depth -= 1;
        self.current()
    }

    /// The snapshot the visible graph corresponds to.
    pub fn current(&self) -> Option<&GraphSnapshot> {
        let len = self.snapshots.len();
        if len == 0 {
            return None;
        }
        self.snapshots.get(len - 1 - self.undo_depth)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_depth + 1 < self.snapshots.len()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_depth > 0
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_depth
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        History::new(10)
    }
}
