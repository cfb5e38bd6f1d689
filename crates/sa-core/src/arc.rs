//! Arc fan / outline meshes and label placement
//!
//! Arc geometry is emitted local to its center so a host can parent it to
//! whatever node the vertex point is attached to. The center itself is
//! world space.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::angle::AngleBasis;
use crate::camera::Viewpoint;
use crate::frame::UpAxis;
use crate::vertex::{ArcVertex, LineVertex};

/// Filled sector approximated by a triangle fan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArcGeometry {
    /// World-space position of the fan center
    pub center: Vec3,
    /// Unit plane normal shared by every vertex
    pub normal: Vec3,
    /// Vertex positions relative to `center`; index 0 is the center itself
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl ArcGeometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn world_vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| self.center + *v)
    }
}

/// Rim polyline of an arc, without the fan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArcOutline {
    pub center: Vec3,
    /// Rim points relative to `center`, from BA to BC
    pub points: Vec<Vec3>,
    /// Outlines are open; the rim is never joined back to its start
    pub closed: bool,
}

impl ArcOutline {
    /// Pack the rim in world space for a line-strip buffer
    pub fn to_vertices(&self, color: [f32; 4]) -> Vec<LineVertex> {
        self.points
            .iter()
            .map(|p| LineVertex {
                position: (self.center + *p).to_array(),
                color,
            })
            .collect()
    }
}

/// Builds arc meshes from an [`AngleBasis`]
pub struct ArcMeshBuilder;

impl ArcMeshBuilder {
    /// Fan center for an angle at vertex `b`.
    ///
    /// Lifted off the surface along the plane normal by `surface_offset`,
    /// then optionally pinned to `forced_height` along `up`.
    pub fn center(
        basis: &AngleBasis,
        b: Vec3,
        surface_offset: f32,
        forced_height: Option<f32>,
        up: UpAxis,
    ) -> Vec3 {
        let lifted = b + basis.plane_normal * surface_offset;
        match forced_height {
            Some(height) => up.with_height(lifted, height),
            None => lifted,
        }
    }

    /// Build the filled fan: `N + 2` vertices and `N` triangles, where
    /// `N = max(segment_count, 1)`.
    pub fn build(basis: &AngleBasis, center: Vec3, radius: f32, segment_count: usize) -> ArcGeometry {
        let segments = segment_count.max(1);

        let mut vertices = Vec::with_capacity(segments + 2);
        let mut uvs = Vec::with_capacity(segments + 2);
        vertices.push(Vec3::ZERO);
        uvs.push(Vec2::ZERO);

        for i in 0..=segments {
            let angle = basis.angle_at(i as f32 / segments as f32);
            vertices.push(basis.direction_at(angle) * radius);
            let (sin, cos) = angle.sin_cos();
            uvs.push(Vec2::new(0.5 + 0.5 * cos, 0.5 + 0.5 * sin));
        }

        let mut indices = Vec::with_capacity(segments * 3);
        for i in 0..segments as u32 {
            indices.extend_from_slice(&[0, i + 1, i + 2]);
        }

        ArcGeometry {
            center,
            normal: basis.plane_normal,
            vertices,
            uvs,
            indices,
        }
    }

    /// Build only the rim polyline: `N + 1` points.
    pub fn build_outline(basis: &AngleBasis, center: Vec3, radius: f32, segment_count: usize) -> ArcOutline {
        let segments = segment_count.max(1);
        let points = (0..=segments)
            .map(|i| basis.direction_at(basis.angle_at(i as f32 / segments as f32)) * radius)
            .collect();

        ArcOutline {
            center,
            points,
            closed: false,
        }
    }

    /// Pack a fan for render upload
    pub fn to_vertices(arc: &ArcGeometry) -> Vec<ArcVertex> {
        arc.vertices
            .iter()
            .zip(&arc.uvs)
            .map(|(position, uv)| ArcVertex {
                position: position.to_array(),
                normal: arc.normal.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }
}

/// Placement of the numeric angle label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Distance from the center along the bisector, as a fraction of the arc radius
    pub radius_fraction: f32,
    /// Extra world-space offset
    pub local_offset: Vec3,
    /// Lift along the up axis
    pub vertical_offset: f32,
    /// Shift toward the viewer
    pub camera_offset: f32,
    pub up: UpAxis,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            radius_fraction: 0.55,
            local_offset: Vec3::ZERO,
            vertical_offset: 0.02,
            camera_offset: 0.015,
            up: UpAxis::Y,
        }
    }
}

/// Billboarded angle readout
#[derive(Debug, Clone, PartialEq)]
pub struct AngleLabel {
    /// Formatted as one decimal followed by `°`
    pub text: String,
    pub degrees: f32,
    pub position: Vec3,
    /// Matches the viewpoint rotation so the label always faces the viewer
    pub rotation: Quat,
}

/// Place the angle label inside the arc, facing `viewpoint`.
pub fn place_label(
    basis: &AngleBasis,
    center: Vec3,
    radius: f32,
    viewpoint: &Viewpoint,
    settings: &LabelSettings,
) -> AngleLabel {
    let mut position = center
        + basis.bisector() * (radius * settings.radius_fraction.clamp(0.0, 1.0))
        + settings.local_offset;
    position += settings.up.vector() * settings.vertical_offset;

    if let Some(to_viewer) = (viewpoint.position - position).try_normalize() {
        position += to_viewer * settings.camera_offset;
    }

    let degrees = basis.degrees();
    AngleLabel {
        text: format!("{degrees:.1}°"),
        degrees,
        position,
        rotation: viewpoint.rotation(),
    }
}
