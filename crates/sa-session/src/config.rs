//! Measurement configuration
//!
//! Every section falls back to its defaults when missing, so a config file
//! only needs the values it overrides.

use std::path::Path;

use glam::Vec3;
use sa_core::{LabelSettings, SurfaceFilter, SurfaceLineTracer, UpAxis};
use serde::{Deserialize, Serialize};

/// Connecting line configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LineConfig {
    /// Samples per traced line
    pub segments: usize,
    /// Reach of each surface probe
    pub search_distance: f32,
    /// Lift along the surface normal
    pub surface_offset: f32,
    /// Line width in world units
    pub width: f32,
    /// Line color (RGBA)
    pub color: [f32; 4],
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            segments: 40,
            search_distance: 0.15,
            surface_offset: 0.002,
            width: 0.01,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl LineConfig {
    pub fn tracer(&self, up: UpAxis) -> SurfaceLineTracer {
        SurfaceLineTracer {
            search_distance: self.search_distance,
            surface_offset: self.surface_offset,
            up: up.vector(),
        }
    }
}

/// Which arc meshes are produced
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ArcStyle {
    #[default]
    Filled,
    Outline,
    FilledWithOutline,
}

impl ArcStyle {
    pub fn filled(&self) -> bool {
        matches!(self, ArcStyle::Filled | ArcStyle::FilledWithOutline)
    }

    pub fn outlined(&self) -> bool {
        matches!(self, ArcStyle::Outline | ArcStyle::FilledWithOutline)
    }
}

/// Angle arc configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArcConfig {
    pub radius: f32,
    pub segments: usize,
    pub style: ArcStyle,
    /// Arc color (RGBA)
    pub color: [f32; 4],
    /// Pin the arc center to this height along the up axis
    pub forced_height: Option<f32>,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            radius: 0.12,
            segments: 24,
            style: ArcStyle::Filled,
            color: [1.0, 1.0, 0.0, 0.45],
            forced_height: None,
        }
    }
}

/// Angle label configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelConfig {
    pub show: bool,
    /// Distance along the bisector as a fraction of the arc radius
    pub radius_fraction: f32,
    pub local_offset: Vec3,
    /// Shift toward the viewer
    pub camera_offset: f32,
    /// Lift along the up axis
    pub vertical_offset: f32,
    /// Text color (RGBA)
    pub color: [f32; 4],
    pub font_size: u32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            show: true,
            radius_fraction: 0.55,
            local_offset: Vec3::ZERO,
            camera_offset: 0.015,
            vertical_offset: 0.02,
            color: [0.0, 0.0, 0.0, 1.0],
            font_size: 48,
        }
    }
}

impl LabelConfig {
    pub fn settings(&self, up: UpAxis) -> LabelSettings {
        LabelSettings {
            radius_fraction: self.radius_fraction,
            local_offset: self.local_offset,
            vertical_offset: self.vertical_offset,
            camera_offset: self.camera_offset,
            up,
        }
    }
}

/// Marker drag configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DragConfig {
    /// Pointer travel in pixels before a press becomes a drag
    pub dead_zone: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self { dead_zone: 4.0 }
    }
}

/// Point marker configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkerConfig {
    /// Rendered marker diameter
    pub scale: f32,
    /// Radius of the pick sphere around each marker
    pub pick_radius: f32,
    /// Marker color (RGBA)
    pub color: [f32; 4],
    /// Color of the marker being dragged (RGBA)
    pub active_color: [f32; 4],
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            scale: 0.03,
            pick_radius: 0.025,
            color: [1.0, 0.3, 0.2, 1.0],
            active_color: [0.2, 0.8, 1.0, 1.0],
        }
    }
}

/// Complete measurement configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeasurementConfig {
    /// Surfaces points can be placed on
    #[serde(default)]
    pub placement_filter: SurfaceFilter,
    /// Surfaces a dragged marker can land on
    #[serde(default)]
    pub drag_filter: SurfaceFilter,
    /// Snap placements to the nearest mesh vertex
    #[serde(default)]
    pub vertex_snap: bool,
    #[serde(default)]
    pub up_axis: UpAxis,
    #[serde(default)]
    pub line: LineConfig,
    #[serde(default)]
    pub arc: ArcConfig,
    #[serde(default)]
    pub label: LabelConfig,
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub marker: MarkerConfig,
}

impl MeasurementConfig {
    /// Save the configuration as RON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_ron()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Serialize to a pretty-printed RON string
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_ron(&content)?;
        tracing::info!(path = %path.display(), "Loaded measurement config");
        Ok(config)
    }

    /// Parse a RON string
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Load a configuration file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "Using default measurement config: {e}");
            Self::default()
        })
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_core::CategoryMask;

    #[test]
    fn test_defaults() {
        let config = MeasurementConfig::default();
        assert!(!config.vertex_snap);
        assert_eq!(config.up_axis, UpAxis::Y);
        assert_eq!(config.line.segments, 40);
        assert_eq!(config.arc.segments, 24);
        assert_eq!(config.arc.forced_height, None);
        assert_eq!(config.placement_filter, SurfaceFilter::ALL);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("measure.ron");

        let mut config = MeasurementConfig::default();
        config.vertex_snap = true;
        config.placement_filter = SurfaceFilter::new(CategoryMask::bit(2));
        config.arc.style = ArcStyle::FilledWithOutline;
        config.arc.forced_height = Some(0.51);
        config.label.local_offset = Vec3::new(0.0, 0.01, 0.0);

        config.save(&path).unwrap();
        let loaded = MeasurementConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config =
            MeasurementConfig::from_ron("(vertex_snap: true, arc: (radius: 0.2), up_axis: Z)")
                .unwrap();
        assert!(config.vertex_snap);
        assert_eq!(config.up_axis, UpAxis::Z);
        assert_eq!(config.arc.radius, 0.2);
        assert_eq!(config.arc.segments, 24);
        assert_eq!(config.line, LineConfig::default());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = MeasurementConfig::from_ron("(arc: (radius: \"big\"))");
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ron");
        assert!(matches!(MeasurementConfig::load(&path), Err(ConfigError::Io(_))));
        assert_eq!(MeasurementConfig::load_or_default(&path), MeasurementConfig::default());
    }

    #[test]
    fn test_arc_style_flags() {
        assert!(ArcStyle::Filled.filled() && !ArcStyle::Filled.outlined());
        assert!(!ArcStyle::Outline.filled() && ArcStyle::Outline.outlined());
        assert!(ArcStyle::FilledWithOutline.filled() && ArcStyle::FilledWithOutline.outlined());
    }

    #[test]
    fn test_section_conversions() {
        let config = MeasurementConfig::default();
        let tracer = config.line.tracer(UpAxis::Z);
        assert_eq!(tracer.up, Vec3::Z);
        assert_eq!(tracer.search_distance, 0.15);
        let label = config.label.settings(UpAxis::Y);
        assert_eq!(label.radius_fraction, 0.55);
    }
}
