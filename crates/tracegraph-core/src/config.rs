//! Engine configuration, loaded from TOML

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub placement: PlacementConfig,
    pub layout: LayoutConfig,
    pub history: HistoryConfig,
    pub stroke: StrokeConfig,
    pub exposure: ExposureConfig,
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Placement constants must be finite, with positive thresholds and step.
    pub fn validate(&self) -> Result<()> {
        let p = &self.placement;
        let settings = [
            ("placement.hop_offset", p.hop_offset, false),
            ("placement.hop_multiplier", p.hop_multiplier, false),
            ("placement.x_threshold", p.x_threshold, true),
            ("placement.y_threshold", p.y_threshold, true),
            ("placement.step_factor", p.step_factor, true),
        ];
        for (field, value, positive) in settings {
            if !value.is_finite() || (positive && value <= 0.0) {
                return Err(GraphError::InvalidSetting { field, value });
            }
        }
        Ok(())
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

/// Constants of the incremental placement heuristic, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Horizontal distance between consecutive hop ranks.
    pub hop_offset: f64,
    /// Breathing-room multiplier applied to `hop_offset`.
    pub hop_multiplier: f64,
    /// Two nodes collide when closer than this horizontally...
    pub x_threshold: f64,
    /// ...and closer than this vertically.
    pub y_threshold: f64,
    /// Collision step and stacking pitch, as a factor of `y_threshold`.
    pub step_factor: f64,
}

impl PlacementConfig {
    pub fn rank_distance(&self) -> f64 {
        self.hop_offset * self.hop_multiplier
    }

    pub fn vertical_step(&self) -> f64 {
        self.y_threshold * self.step_factor
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        PlacementConfig {
            hop_offset: 330.0,
            hop_multiplier: 1.1,
            x_threshold: 300.0,
            y_threshold: 130.0,
            step_factor: 1.25,
        }
    }
}

/// Flow direction of the layered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    #[serde(rename = "LR")]
    LeftToRight,
    #[serde(rename = "RL")]
    RightToLeft,
    #[serde(rename = "TB")]
    TopToBottom,
    #[serde(rename = "BT")]
    BottomToTop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub rank_separation: f64,
    pub node_separation: f64,
    pub orientation: Orientation,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            node_width: 200.0,
            node_height: 50.0,
            rank_separation: 130.0,
            node_separation: 80.0,
            orientation: Orientation::LeftToRight,
        }
    }
}

/// When a committed mutation records a history snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapturePolicy {
    /// Only when the node or edge count changes.
    #[default]
    CountChange,
    /// On any change to nodes or edges.
    AnyChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    pub capture: CapturePolicy,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            capacity: 10,
            capture: CapturePolicy::CountChange,
        }
    }
}

/// Range a volume scale of 0..=1 is mapped onto for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    pub min_width: f64,
    pub max_width: f64,
    pub min_opacity: f64,
    pub max_opacity: f64,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        StrokeConfig {
            min_width: 1.0,
            max_width: 8.0,
            min_opacity: 0.35,
            max_opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    /// Cap on paths derived from one exposure tree.
    pub max_paths: usize,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        ExposureConfig { max_paths: 25 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
[placement]
hop_offset = 400.0

[history]
capacity = 3
capture = "any_change"

[layout]
orientation = "TB"
"#,
        )
        .unwrap();

        assert_eq!(config.placement.hop_offset, 400.0);
        assert_eq!(config.placement.y_threshold, 130.0);
        assert_eq!(config.history.capacity, 3);
        assert_eq!(config.history.capture, CapturePolicy::AnyChange);
        assert_eq!(config.layout.orientation, Orientation::TopToBottom);
        assert_eq!(config.layout.node_width, 200.0);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = EngineConfig::load(&dir.path().join("tracegraph.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = EngineConfig::from_toml_str("placement = 3").unwrap_err();
        assert!(matches!(err, crate::GraphError::Config(_)));
    }

    #[test]
    fn test_non_finite_placement_rejected() {
        let err = EngineConfig::from_toml_str("[placement]\ny_threshold = inf\n").unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidSetting { field: "placement.y_threshold", .. }
        ));

        let err = EngineConfig::from_toml_str("[placement]\nstep_factor = 0.0\n").unwrap_err();
        assert!(matches!(err, GraphError::InvalidSetting { .. }));
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_derived_distances() {
        let placement = PlacementConfig::default();
        assert!((placement.rank_distance() - 363.0).abs() < 1e-9);
        assert!((placement.vertical_step() - 162.5).abs() < 1e-9);
    }
}
