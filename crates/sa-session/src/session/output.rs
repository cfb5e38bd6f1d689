//! Per-tick output consumed by rendering and UI

use glam::Vec3;
use sa_core::{AngleLabel, ArcGeometry, ArcOutline, Degenerate, TraceLine};

use crate::selection::{MarkerHandle, SelectionChange};

/// A point marker to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerOutput {
    pub handle: MarkerHandle,
    pub position: Vec3,
    /// The marker is armed or being dragged
    pub active: bool,
}

/// Everything derived from the selection in one tick
///
/// Each tick replaces the previous output wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    pub markers: Vec<MarkerOutput>,
    /// Empty, or `[B→A, B→C]` once three points are placed
    pub lines: Vec<TraceLine>,
    pub arc: Option<ArcGeometry>,
    pub outline: Option<ArcOutline>,
    pub label: Option<AngleLabel>,
    pub angle_degrees: Option<f32>,
    /// Set when three points are placed but do not form an angle
    pub degenerate: Option<Degenerate>,
    /// Completion transitions that happened during this tick
    pub changes: Vec<SelectionChange>,
}

impl FrameOutput {
    /// True when an angle is being displayed
    pub fn has_measurement(&self) -> bool {
        self.angle_degrees.is_some()
    }
}
