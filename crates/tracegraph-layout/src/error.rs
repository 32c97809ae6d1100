//! Error types for the layout engine

use thiserror::Error;
use tracegraph_core::NodeId;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("edge endpoint {0} is not a node of the layout graph")]
    UnknownNode(NodeId),

    #[error("cycle left after back-edge reversal at {0}")]
    Cycle(String),
}
