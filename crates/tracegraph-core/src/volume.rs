//! Transfer volume → visual weight normalization

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::StrokeConfig;
use crate::model::{GraphEdge, GraphNode};
use crate::reveal::RevealState;

/// Population statistics over the volumes of all qualifying edges.
///
/// Qualifying edges are revealed, have both endpoints in the graph, and carry
/// a resolved volume. Mean and standard deviation that come out zero (or NaN)
/// are replaced by 1, so an empty or single-edge graph still yields a
/// defined scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeScale {
    pub mean: f64,
    pub std_dev: f64,
    pub samples: usize,
}

/// Stroke attributes the renderer applies to an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub width: f64,
    pub opacity: f64,
}

fn or_one(value: f64) -> f64 {
    if value == 0.0 || value.is_nan() {
        1.0
    } else {
        value
    }
}

impl VolumeScale {
    pub fn from_edges(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        let present: HashSet<_> = nodes.iter().map(|n| &n.id).collect();
        Self::from_volumes(
            edges
                .iter()
                .filter(|e| e.data.state == RevealState::Revealed)
                .filter(|e| e.data.is_resolved())
                .filter(|e| present.contains(&e.source) && present.contains(&e.target))
                .map(|e| e.data.volume),
        )
    }

    pub fn from_volumes(volumes: impl IntoIterator<Item = f64>) -> Self {
        let volumes: Vec<f64> = volumes.into_iter().collect();
        let samples = volumes.len();
        if samples == 0 {
            return VolumeScale {
                mean: 1.0,
                std_dev: 1.0,
                samples,
            };
        }

        let n = samples as f64;
        let mean = volumes.iter().sum::<f64>() / n;
        let variance = volumes.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        VolumeScale {
            mean: or_one(mean),
            std_dev: or_one(variance.sqrt()),
            samples,
        }
    }

    /// How far above average a volume is, clamped into `[0, 1]`.
    pub fn scale(&self, volume: f64) -> f64 {
        if volume < 0.0 {
            return 0.0;
        }
        let z = (volume - self.mean) / self.std_dev;
        if z.is_nan() { 0.0 } else { z.clamp(0.0, 1.0) }
    }

    pub fn style(&self, volume: f64, stroke: &StrokeConfig) -> EdgeStyle {
        let t = self.scale(volume);
        EdgeStyle {
            width: stroke.min_width + (stroke.max_width - stroke.min_width) * t,
            opacity: stroke.min_opacity + (stroke.max_opacity - stroke.min_opacity) * t,
        }
    }
}

impl Default for VolumeScale {
    fn default() -> Self {
        Self::from_volumes(std::iter::empty())
    }
}

/// One-shot form: statistics over `edges`, applied to `volume`.
pub fn edge_volume_scale(nodes: &[GraphNode], edges: &[GraphEdge], volume: f64) -> f64 {
    VolumeScale::from_edges(nodes, edges).scale(volume)
}
