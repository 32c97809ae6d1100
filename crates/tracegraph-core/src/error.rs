//! Error types for the graph engine

use crate::model::{EdgeId, NodeId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    // ── Caller-contract violations ──────────────────────────
    #[error("expansion contains no paths")]
    EmptyExpansion,

    #[error("path {index} is empty")]
    EmptyPath { index: usize },

    #[error("address is empty")]
    EmptyAddress,

    #[error("path {index} starts at {found}, expected common origin {expected}")]
    MixedOrigins {
        index: usize,
        expected: NodeId,
        found: NodeId,
    },

    #[error("origin {0} is not a node in the graph")]
    OriginMissing(NodeId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    #[error("duplicate edge id {0}")]
    DuplicateEdge(EdgeId),

    #[error("no clear placement slot reachable from ({x}, {y})")]
    PlacementStalled { x: f64, y: f64 },

    // ── Config / document I/O ───────────────────────────────
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid config: {field} = {value}")]
    InvalidSetting { field: &'static str, value: f64 },

    #[error("invalid document: {0}")]
    Document(#[from] serde_json::Error),
}
