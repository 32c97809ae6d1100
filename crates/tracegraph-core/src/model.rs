//! Core data structures for the address-transaction graph

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::reveal::RevealState;

/// Volume value for an edge whose transfer amount has not been resolved yet.
pub const UNRESOLVED_VOLUME: f64 = -1.0;

/// Canonical node identifier: the lowercase form of an address.
///
/// Deserialization goes through the same normalization as [`NodeId::new`],
/// so ids read from a document are canonical as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    pub fn new(address: &str) -> Result<Self, GraphError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(GraphError::EmptyAddress);
        }
        Ok(NodeId(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NodeId {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NodeId::new(&value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Edge identifier, a pure function of the endpoints: `"<source>-<target>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn between(source: &NodeId, target: &NodeId) -> Self {
        EdgeId(format!("{}-{}", source, target))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which way a path is read when deriving edge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Funds flow towards the origin: hop i+1 → hop i.
    Incoming,
    /// Funds flow away from the origin: hop i → hop i+1.
    Outgoing,
}

impl Direction {
    pub fn from_incoming(incoming: bool) -> Self {
        if incoming {
            Direction::Incoming
        } else {
            Direction::Outgoing
        }
    }

    /// Horizontal sign of the placement cursor: incoming ranks grow leftward.
    pub fn horizontal_sign(self) -> f64 {
        match self {
            Direction::Incoming => -1.0,
            Direction::Outgoing => 1.0,
        }
    }
}

/// A point in the unbounded 2-D canvas plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Measured node size reported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Display state owned by the UI and stored on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeDisplay {
    #[default]
    Minimized,
    Expanded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub address: String,
    #[serde(default)]
    pub state: NodeDisplay,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub highlight: bool,
}

/// An address vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub position: Position,
    pub data: NodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

impl GraphNode {
    pub fn new(id: NodeId, position: Position) -> Self {
        let address = id.as_str().to_string();
        GraphNode {
            id,
            position,
            data: NodeData {
                address,
                state: NodeDisplay::default(),
                highlight: false,
            },
            dimensions: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub volume: f64,
    pub state: RevealState,
}

impl EdgeData {
    pub fn is_resolved(&self) -> bool {
        self.volume >= 0.0
    }
}

/// Side of a node box an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Left,
    Right,
}

/// Routing metadata for the renderer, derived from endpoint positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeHandles {
    pub source: HandleSide,
    pub target: HandleSide,
}

impl EdgeHandles {
    /// Attach on the facing sides: a source left of its target leaves from the right.
    pub fn for_positions(source: Position, target: Position) -> Self {
        if source.x <= target.x {
            EdgeHandles {
                source: HandleSide::Right,
                target: HandleSide::Left,
            }
        } else {
            EdgeHandles {
                source: HandleSide::Left,
                target: HandleSide::Right,
            }
        }
    }
}

/// A directed transfer relationship between two addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub data: EdgeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handles: Option<EdgeHandles>,
}

impl GraphEdge {
    pub fn new(source: NodeId, target: NodeId, volume: f64, state: RevealState) -> Self {
        GraphEdge {
            id: EdgeId::between(&source, &target),
            source,
            target,
            data: EdgeData { volume, state },
            handles: None,
        }
    }

    /// Edge named by a path: the link is known, its magnitude is not.
    pub fn unresolved(source: NodeId, target: NodeId) -> Self {
        GraphEdge::new(source, target, UNRESOLVED_VOLUME, RevealState::Revealed)
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}
