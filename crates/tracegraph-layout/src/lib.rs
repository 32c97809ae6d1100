//! Tracegraph Layout — layered re-layout of the address graph
//!
//! [`layered`] holds the algorithm contract and the default engine;
//! [`adapter`] converts between the graph read model and layout input.

pub mod adapter;
pub mod error;
pub mod layered;

#[cfg(test)]
pub mod tests;

pub use adapter::{layout_nodes, layout_positions, layout_store, to_layout_graph};
pub use error::LayoutError;
pub use layered::{LayeredLayout, LayoutGraph, LayoutNode, LayoutResult, LongestPathLayout};
