//! Surface Angle Session
//!
//! Interactive layer over `sa-core`: collects three points from pointer
//! input or a staged vertex workflow, lets placed markers be dragged, and
//! rebuilds the measurement geometry once per tick.
//!
//! # Module Structure
//!
//! ```text
//! sa-session/
//! ├── selection.rs  # Ordered set of up to three points
//! ├── drag.rs       # Marker drag state machine
//! ├── session/      # Per-tick pipeline and frame output
//! ├── workflow.rs   # Staged vertex selection
//! └── config.rs     # RON configuration
//! ```

pub mod config;
pub mod drag;
pub mod selection;
pub mod session;
pub mod workflow;

// Re-exports for convenience
pub use config::{
    ArcConfig, ArcStyle, ConfigError, DragConfig, LabelConfig, LineConfig, MarkerConfig,
    MeasurementConfig,
};
pub use drag::{DragController, DragState, DragTarget};
pub use selection::{
    Anchor, CAPACITY, MarkerHandle, PointSelectionSet, SelectedPoint, SelectionChange,
    SelectionError,
};
pub use session::{FrameOutput, InputEvent, MarkerOutput, MeasurementSession, SharedSession};
pub use workflow::{SelectionStage, StagedWorkflow, VertexSite, VertexSites};
