//! Tracegraph Core — incremental address-transaction graph engine

pub mod model;
pub mod error;
pub mod config;
pub mod index;
pub mod reveal;
pub mod volume;
pub mod placement;
pub mod merge;
pub mod history;
pub mod diff;
pub mod store;
pub mod exposure;
pub mod document;


#[cfg(test)]
pub mod test_utils;

pub use model::{NodeId, EdgeId, Direction, Position, Dimensions, NodeDisplay, NodeData, GraphNode, EdgeData, EdgeHandles, HandleSide, GraphEdge, UNRESOLVED_VOLUME};
pub use error::{GraphError, Result};
pub use config::{EngineConfig, PlacementConfig, LayoutConfig, Orientation, HistoryConfig, CapturePolicy, StrokeConfig, ExposureConfig};
pub use index::{Record, RecordIndex, Upsert, to_index};
pub use reveal::{RevealState, is_edge_visible, visible_edges};
pub use volume::{VolumeScale, EdgeStyle, edge_volume_scale};
pub use merge::{Expansion, MergeOutcome, merge_paths, merge_edges};
pub use history::{GraphSnapshot, History};
pub use diff::{GraphDiff, DiffEngine};
pub use store::{GraphStore, GraphCommand, Expanded};
pub use exposure::{ExposureTree, paths_from_exposure, edges_from_exposure};
pub use document::{GraphDocument, ExpansionRequest, CommandScript};
