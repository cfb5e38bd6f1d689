//! Measurement session
//!
//! Owns the selection and everything derived from it. Hosts queue input
//! events as they arrive and call [`MeasurementSession::tick`] once per
//! frame, which runs the fixed pipeline:
//!
//! 1. Anchored points follow their surfaces' current frames
//! 2. Queued input is applied in arrival order
//! 3. Lines, arc and label are rebuilt from scratch
//! 4. The new [`FrameOutput`] is published

mod output;

pub use output::{FrameOutput, MarkerOutput};

use std::sync::Arc;

use glam::{Vec2, Vec3};
use parking_lot::Mutex;
use sa_core::ray::ray_sphere_intersection;
use sa_core::{
    AngleBasis, ArcMeshBuilder, Ray, SurfaceQuery, Viewpoint, cast_from_screen, place_label,
    snap_to_nearest_vertex,
};

use crate::config::MeasurementConfig;
use crate::drag::DragController;
use crate::selection::{
    Anchor, CAPACITY, PointSelectionSet, SelectedPoint, SelectionChange, SelectionError,
};

/// Pointer and command input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed at a pixel
    PointerDown { pixel: Vec2 },
    /// Pointer moved to a pixel
    PointerMove { pixel: Vec2 },
    /// Primary button released
    PointerUp,
    /// Remove every point
    Clear,
    /// Remove the last point
    Undo,
    /// Toggle snapping placements to mesh vertices
    ToggleVertexSnap,
}

pub struct MeasurementSession {
    config: MeasurementConfig,
    selection: PointSelectionSet,
    drag: DragController,
    vertex_snap: bool,
    pending_events: Vec<InputEvent>,
    output: FrameOutput,
}

impl Default for MeasurementSession {
    fn default() -> Self {
        Self::new(MeasurementConfig::default())
    }
}

impl MeasurementSession {
    pub fn new(config: MeasurementConfig) -> Self {
        Self {
            drag: DragController::new(config.drag.dead_zone),
            vertex_snap: config.vertex_snap,
            config,
            selection: PointSelectionSet::new(),
            pending_events: Vec::new(),
            output: FrameOutput::default(),
        }
    }

    /// Wrap the session for sharing between host stages
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &MeasurementConfig {
        &self.config
    }

    pub fn selection(&self) -> &PointSelectionSet {
        &self.selection
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn vertex_snap(&self) -> bool {
        self.vertex_snap
    }

    /// Output of the last tick
    pub fn output(&self) -> &FrameOutput {
        &self.output
    }

    /// Queue an input event for the next tick
    pub fn queue_event(&mut self, event: InputEvent) {
        self.pending_events.push(event);
    }

    /// Queue several input events, keeping their order
    pub fn handle_events(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        self.pending_events.extend(events);
    }

    /// Run one frame of the pipeline.
    pub fn tick(&mut self, query: &dyn SurfaceQuery, viewpoint: &Viewpoint) -> &FrameOutput {
        self.follow_anchors(query);

        for event in std::mem::take(&mut self.pending_events) {
            self.apply_event(query, viewpoint, event);
        }

        self.output = self.rebuild(query, viewpoint);
        &self.output
    }

    /// Place a point directly, bypassing pointer picking.
    pub fn place_point(
        &mut self,
        position: Vec3,
        anchor: Option<Anchor>,
    ) -> Result<usize, SelectionError> {
        let index = self.selection.add(SelectedPoint::new(position, anchor))?;
        tracing::debug!(index, ?position, "Placed point");
        Ok(index)
    }

    /// Replace the final point, returning the one removed.
    pub fn replace_last_point(
        &mut self,
        position: Vec3,
        anchor: Option<Anchor>,
    ) -> Option<SelectedPoint> {
        let last = self.selection.len().checked_sub(1);
        if last.is_some() && self.drag.active_index() == last {
            self.drag.cancel();
        }
        self.selection.replace_last(SelectedPoint::new(position, anchor))
    }

    /// Remove every point, cancelling any drag.
    pub fn clear(&mut self) {
        self.drag.cancel();
        self.selection.clear();
        tracing::debug!("Cleared selection");
    }

    /// Remove the last point, cancelling its drag if it was being dragged.
    pub fn undo(&mut self) -> Option<SelectedPoint> {
        let removed = self.selection.undo_last()?;
        if self
            .drag
            .active_index()
            .is_some_and(|index| index >= self.selection.len())
        {
            self.drag.cancel();
        }
        tracing::debug!(remaining = self.selection.len(), "Undid point");
        Some(removed)
    }

    /// Flip vertex snapping, returning the new state.
    pub fn toggle_vertex_snap(&mut self) -> bool {
        self.vertex_snap = !self.vertex_snap;
        tracing::debug!(enabled = self.vertex_snap, "Vertex snap toggled");
        self.vertex_snap
    }

    /// Info panel text: instructions, placed positions and snap state.
    pub fn status_text(&self) -> String {
        if self.selection.is_empty() {
            return "Click 3 points (U=Undo, C=Clear, V=Snap)".to_string();
        }

        let mut text = format!("Points: {}/{}\n", self.selection.len(), CAPACITY);
        for (i, point) in self.selection.iter().enumerate() {
            let p = point.position;
            text.push_str(&format!("{}: ({:.3}, {:.3}, {:.3})\n", i + 1, p.x, p.y, p.z));
        }
        text.push_str(if self.vertex_snap { "Snap: ON" } else { "Snap: OFF" });
        text
    }

    /// Nearest marker under `ray`: `(index, ray parameter)`.
    ///
    /// Markers are picked through other geometry.
    pub fn pick_marker(&self, ray: &Ray) -> Option<(usize, f32)> {
        let radius = self.config.marker.pick_radius;
        self.selection
            .iter()
            .enumerate()
            .filter_map(|(i, p)| ray_sphere_intersection(ray, p.position, radius).map(|t| (i, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    fn follow_anchors(&mut self, query: &dyn SurfaceQuery) {
        for point in self.selection.iter_mut() {
            let Some(anchor) = point.anchor.as_mut() else {
                continue;
            };
            match query.anchor(anchor.surface) {
                Some(info) => {
                    if info.frame != anchor.frame {
                        point.position = anchor.frame.carry_point(point.position, &info.frame);
                        anchor.frame = info.frame;
                    }
                }
                None => {
                    tracing::debug!(surface = %anchor.surface, "Anchor surface is gone, detaching point");
                    point.anchor = None;
                }
            }
        }
    }

    fn apply_event(&mut self, query: &dyn SurfaceQuery, viewpoint: &Viewpoint, event: InputEvent) {
        match event {
            InputEvent::PointerDown { pixel } => self.pointer_down(query, viewpoint, pixel),
            InputEvent::PointerMove { pixel } => self.pointer_move(query, viewpoint, pixel),
            InputEvent::PointerUp => {
                self.drag.release();
            }
            InputEvent::Clear => self.clear(),
            InputEvent::Undo => {
                self.undo();
            }
            InputEvent::ToggleVertexSnap => {
                self.toggle_vertex_snap();
            }
        }
    }

    fn pointer_down(&mut self, query: &dyn SurfaceQuery, viewpoint: &Viewpoint, pixel: Vec2) {
        let ray = viewpoint.screen_to_ray(pixel);

        if let Some((index, t)) = self.pick_marker(&ray) {
            if let Some(point) = self.selection.get(index) {
                let marker_position = point.position;
                self.drag.press(
                    index,
                    pixel,
                    ray.at(t),
                    marker_position,
                    viewpoint,
                    self.config.up_axis,
                );
                return;
            }
        }

        if self.selection.is_complete() {
            tracing::debug!("Selection full, ignoring placement");
            return;
        }

        let Some(hit) = cast_from_screen(query, viewpoint, pixel, self.config.placement_filter)
        else {
            tracing::debug!(?pixel, "No placement surface under pointer");
            return;
        };

        let info = query.anchor(hit.surface);
        let mut position = hit.point;
        if self.vertex_snap {
            if let (Some(mesh), Some(info)) = (query.mesh(hit.surface), info.as_ref()) {
                position = snap_to_nearest_vertex(mesh, &info.frame, hit.point);
            }
        }

        let anchor = info.map(|info| Anchor {
            surface: hit.surface,
            frame: info.frame,
        });
        if let Err(e) = self.place_point(position, anchor) {
            tracing::debug!("Placement ignored: {e}");
        }
    }

    fn pointer_move(&mut self, query: &dyn SurfaceQuery, viewpoint: &Viewpoint, pixel: Vec2) {
        if !self.drag.motion(pixel) {
            return;
        }
        let Some(index) = self.drag.active_index() else {
            return;
        };
        let Some(point) = self.selection.get(index) else {
            self.drag.cancel();
            return;
        };

        let anchor = point.anchor.and_then(|a| query.anchor(a.surface));
        let ray = viewpoint.screen_to_ray(pixel);
        if let Some(position) =
            self.drag
                .resolve(query, &ray, self.config.drag_filter, anchor.as_ref())
        {
            if let Some(point) = self.selection.get_mut(index) {
                point.position = position;
            }
        }
    }

    fn rebuild(&mut self, query: &dyn SurfaceQuery, viewpoint: &Viewpoint) -> FrameOutput {
        let active = self.drag.active_index();
        let mut output = FrameOutput {
            markers: self
                .selection
                .iter()
                .enumerate()
                .map(|(i, p)| MarkerOutput {
                    handle: p.marker,
                    position: p.position,
                    active: active == Some(i),
                })
                .collect(),
            changes: self.selection.take_changes(),
            ..Default::default()
        };

        let Some([a, b, c]) = self.selection.measurement() else {
            return output;
        };

        let config = &self.config;
        let up = config.up_axis;
        let tracer = config.line.tracer(up);
        output.lines = vec![
            tracer.trace(query, b, a, config.placement_filter, config.line.segments),
            tracer.trace(query, b, c, config.placement_filter, config.line.segments),
        ];

        let basis = match AngleBasis::compute(a, b, c) {
            Ok(basis) => basis,
            Err(degenerate) => {
                if self.output.degenerate != Some(degenerate) {
                    tracing::warn!("Measurement has no angle: {degenerate}");
                }
                output.degenerate = Some(degenerate);
                return output;
            }
        };

        let center = ArcMeshBuilder::center(
            &basis,
            b,
            config.line.surface_offset,
            config.arc.forced_height,
            up,
        );
        let radius = config.arc.radius;
        if config.arc.style.filled() {
            output.arc = Some(ArcMeshBuilder::build(&basis, center, radius, config.arc.segments));
        }
        if config.arc.style.outlined() {
            output.outline = Some(ArcMeshBuilder::build_outline(
                &basis,
                center,
                radius,
                config.arc.segments,
            ));
        }
        if config.label.show {
            let settings = config.label.settings(up);
            output.label = Some(place_label(&basis, center, radius, viewpoint, &settings));
        }

        let degrees = basis.degrees();
        output.angle_degrees = Some(degrees);
        if output.changes.contains(&SelectionChange::Completed) {
            tracing::info!(degrees, "Measurement complete");
        }

        output
    }
}

/// Shared session handle
pub type SharedSession = Arc<Mutex<MeasurementSession>>;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use sa_core::primitive::generate_plane_mesh;
    use sa_core::{CategoryMask, Frame, MeshScene, SurfaceFilter};

    /// Floor at y = 0 seen from straight above
    fn floor_scene() -> (MeshScene, Viewpoint) {
        let mut scene = MeshScene::new();
        scene.add_surface(
            "floor",
            generate_plane_mesh(10.0, 10),
            Frame::IDENTITY,
            CategoryMask::DEFAULT,
        );
        let view = Viewpoint::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::NEG_Z)
            .with_viewport(800.0, 800.0);
        (scene, view)
    }

    fn pixel_of(view: &Viewpoint, world: Vec3) -> Vec2 {
        view.world_to_screen(world).unwrap()
    }

    fn click(session: &mut MeasurementSession, pixel: Vec2) {
        session.queue_event(InputEvent::PointerDown { pixel });
        session.queue_event(InputEvent::PointerUp);
    }

    #[test]
    fn test_clicks_place_points_on_surface() {
        let (scene, view) = floor_scene();
        let mut session = MeasurementSession::default();

        click(&mut session, pixel_of(&view, Vec3::new(0.05, 0.0, 1.07)));
        click(&mut session, pixel_of(&view, Vec3::new(0.13, 0.0, 0.27)));
        click(&mut session, pixel_of(&view, Vec3::new(1.03, 0.0, 0.04)));
        let output = session.tick(&scene, &view);

        assert_eq!(output.markers.len(), 3);
        assert_eq!(output.lines.len(), 2);
        assert!(output.arc.is_some());
        assert_eq!(output.changes, vec![SelectionChange::Completed]);
        for marker in &output.markers {
            assert_abs_diff_eq!(marker.position.y, 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_click_on_empty_space_places_nothing() {
        let (_, view) = floor_scene();
        let scene = MeshScene::new();
        let mut session = MeasurementSession::default();
        click(&mut session, Vec2::new(400.0, 400.0));
        assert!(session.tick(&scene, &view).markers.is_empty());
    }

    #[test]
    fn test_placement_filter_excludes_surfaces() {
        let (scene, view) = floor_scene();
        let config = MeasurementConfig {
            placement_filter: SurfaceFilter::new(CategoryMask::bit(7)),
            ..Default::default()
        };
        let mut session = MeasurementSession::new(config);
        click(&mut session, Vec2::new(400.0, 400.0));
        assert!(session.tick(&scene, &view).markers.is_empty());
    }

    #[test]
    fn test_vertex_snap_moves_to_grid_vertex() {
        let (scene, view) = floor_scene();
        let mut session = MeasurementSession::default();
        session.queue_event(InputEvent::ToggleVertexSnap);
        click(&mut session, pixel_of(&view, Vec3::new(1.1, 0.0, 2.2)));
        session.tick(&scene, &view);

        assert!(session.vertex_snap());
        let placed = session.selection().get(0).unwrap().position;
        assert_abs_diff_eq!(placed, Vec3::new(1.0, 0.0, 2.0), epsilon = 1e-4);
    }

    #[test]
    fn test_fourth_click_is_ignored() {
        let (scene, view) = floor_scene();
        let mut session = MeasurementSession::default();
        for x in [-2.0, 0.0, 2.0, 3.0] {
            click(&mut session, pixel_of(&view, Vec3::new(x + 0.05, 0.0, x * x * 0.2 + 0.03)));
        }
        session.tick(&scene, &view);
        assert_eq!(session.selection().len(), 3);
    }

    #[test]
    fn test_press_on_marker_drags_it() {
        let (scene, view) = floor_scene();
        let mut session = MeasurementSession::default();
        let start = Vec3::new(0.4, 0.0, 0.3);
        click(&mut session, pixel_of(&view, start));
        session.tick(&scene, &view);

        let target = Vec3::new(1.3, 0.0, -0.6);
        session.handle_events([
            InputEvent::PointerDown { pixel: pixel_of(&view, start) },
            InputEvent::PointerMove { pixel: pixel_of(&view, target) },
        ]);
        let output = session.tick(&scene, &view).clone();
        assert!(session.drag().is_dragging());
        assert!(output.markers[0].active);
        assert_eq!(session.selection().len(), 1);
        assert_abs_diff_eq!(output.markers[0].position, target, epsilon = 1e-3);

        session.queue_event(InputEvent::PointerUp);
        let output = session.tick(&scene, &view).clone();
        assert!(session.drag().is_idle());
        assert!(!output.markers[0].active);
    }

    #[test]
    fn test_clear_cancels_drag() {
        let (scene, view) = floor_scene();
        let mut session = MeasurementSession::default();
        let start = Vec3::new(0.4, 0.0, 0.3);
        click(&mut session, pixel_of(&view, start));
        session.handle_events([
            InputEvent::PointerDown { pixel: pixel_of(&view, start) },
            InputEvent::PointerMove { pixel: pixel_of(&view, Vec3::new(0.2, 0.0, 0.1)) },
            InputEvent::Clear,
        ]);
        let output = session.tick(&scene, &view).clone();
        assert!(session.drag().is_idle());
        assert!(output.markers.is_empty());
    }

    #[test]
    fn test_anchored_points_follow_surface() {
        let (mut scene, view) = floor_scene();
        let floor = scene.surfaces().next().unwrap().id;
        let mut session = MeasurementSession::default();
        click(&mut session, pixel_of(&view, Vec3::new(0.4, 0.0, 0.3)));
        session.tick(&scene, &view);

        scene.set_frame(floor, Frame::from_translation(Vec3::new(0.0, 0.3, 0.0)));
        let output = session.tick(&scene, &view);
        assert_abs_diff_eq!(output.markers[0].position, Vec3::new(0.4, 0.3, 0.3), epsilon = 1e-4);
    }

    #[test]
    fn test_removed_anchor_detaches_point() {
        let (mut scene, view) = floor_scene();
        let floor = scene.surfaces().next().unwrap().id;
        let mut session = MeasurementSession::default();
        click(&mut session, pixel_of(&view, Vec3::new(0.4, 0.0, 0.3)));
        session.tick(&scene, &view);

        scene.remove_surface(floor);
        session.tick(&scene, &view);
        assert!(session.selection().get(0).unwrap().anchor.is_none());
    }

    #[test]
    fn test_status_text() {
        let mut session = MeasurementSession::default();
        assert_eq!(session.status_text(), "Click 3 points (U=Undo, C=Clear, V=Snap)");

        session.place_point(Vec3::new(1.0, 0.25, -0.5), None).unwrap();
        assert_eq!(
            session.status_text(),
            "Points: 1/3\n1: (1.000, 0.250, -0.500)\nSnap: OFF"
        );
        session.toggle_vertex_snap();
        assert!(session.status_text().ends_with("Snap: ON"));
    }

    #[test]
    fn test_pick_marker_prefers_nearest() {
        let mut session = MeasurementSession::default();
        session.place_point(Vec3::new(0.0, 0.0, -2.0), None).unwrap();
        session.place_point(Vec3::new(0.0, 0.0, -1.0), None).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(session.pick_marker(&ray).map(|(i, _)| i), Some(1));
        assert!(session.pick_marker(&Ray::new(Vec3::ZERO, Vec3::X)).is_none());
    }

    #[test]
    fn test_shared_session() {
        let shared = MeasurementSession::default().into_shared();
        shared.lock().place_point(Vec3::ZERO, None).unwrap();
        assert_eq!(shared.lock().selection().len(), 1);
    }
}
