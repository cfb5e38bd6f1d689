//! Marker drag state machine
//!
//! `Idle → Armed` on a press over a marker, `Armed → Dragging` once the
//! pointer leaves the dead zone, and back to `Idle` on release. While
//! dragging, candidate positions keep the marker's original height and
//! stay inside the anchor surface's local bounds.

use glam::{Vec2, Vec3};
use sa_core::{AnchorInfo, Plane, Ray, SurfaceFilter, SurfaceQuery, UpAxis, Viewpoint};

/// Per-drag state captured at press time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTarget {
    /// Index of the dragged point in the selection
    pub index: usize,
    pub press_pixel: Vec2,
    /// Height component the marker is pinned to
    pub fixed_height: f32,
    /// Plane through the marker, facing the viewer
    pub plane: Plane,
    /// Grab point minus marker position
    pub grab_offset: Vec3,
    pub up: UpAxis,
    /// Last resolved position
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Armed(DragTarget),
    Dragging(DragTarget),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragController {
    state: DragState,
    /// Pointer travel in pixels before a press becomes a drag
    pub dead_zone: f32,
}

impl DragController {
    pub fn new(dead_zone: f32) -> Self {
        Self {
            state: DragState::Idle,
            dead_zone: dead_zone.max(0.0),
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Index of the armed or dragged point
    pub fn active_index(&self) -> Option<usize> {
        match &self.state {
            DragState::Idle => None,
            DragState::Armed(target) | DragState::Dragging(target) => Some(target.index),
        }
    }

    /// Arm a drag of point `index` grabbed at `grab_point`.
    pub fn press(
        &mut self,
        index: usize,
        pixel: Vec2,
        grab_point: Vec3,
        marker_position: Vec3,
        viewpoint: &Viewpoint,
        up: UpAxis,
    ) {
        let target = DragTarget {
            index,
            press_pixel: pixel,
            fixed_height: up.height(marker_position),
            plane: Plane::from_point_normal(marker_position, -viewpoint.forward()),
            grab_offset: grab_point - marker_position,
            up,
            position: marker_position,
        };
        tracing::debug!(index, "Drag armed");
        self.state = DragState::Armed(target);
    }

    /// Feed pointer motion. Returns true while dragging.
    pub fn motion(&mut self, pixel: Vec2) -> bool {
        if let DragState::Armed(target) = self.state {
            if pixel.distance(target.press_pixel) > self.dead_zone {
                tracing::debug!(index = target.index, "Drag started");
                self.state = DragState::Dragging(target);
            }
        }
        self.is_dragging()
    }

    /// Resolve the dragged point's position under `ray`.
    ///
    /// Tries the nearest accepted surface, then the drag plane (minus the
    /// grab offset), then keeps the last position. The height is pinned and,
    /// when `anchor` has non-empty bounds, each local axis is clamped into
    /// them. Returns `None` unless dragging.
    pub fn resolve(
        &mut self,
        query: &dyn SurfaceQuery,
        ray: &Ray,
        filter: SurfaceFilter,
        anchor: Option<&AnchorInfo>,
    ) -> Option<Vec3> {
        let DragState::Dragging(target) = &mut self.state else {
            return None;
        };

        let candidate = match query.cast_ray(ray, f32::INFINITY, filter) {
            Some(hit) => hit.point,
            None => match target.plane.intersect_ray(ray) {
                Some(t) => ray.at(t) - target.grab_offset,
                None => target.position,
            },
        };

        let up = target.up;
        let mut position = up.with_height(candidate, target.fixed_height);

        if let Some(anchor) = anchor.filter(|a| a.local_bounds.has_extent()) {
            let local = anchor.frame.inverse_transform_point(position);
            let clamped = anchor.local_bounds.clamp_point(local);
            position = up.with_height(anchor.frame.transform_point(clamped), target.fixed_height);
        }

        target.position = position;
        Some(position)
    }

    /// End the drag. Returns the index that was being dragged, if any.
    pub fn release(&mut self) -> Option<usize> {
        let index = self.active_index();
        if let Some(index) = index {
            tracing::debug!(index, "Drag released");
        }
        self.state = DragState::Idle;
        index
    }

    /// Abort any drag without reporting it
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
