//! Surface-hugging polylines
//!
//! The connecting lines B→A and B→C are drawn as polylines whose samples
//! are pulled onto the nearest surface, so they follow curved geometry
//! instead of cutting through it as a straight chord.

use glam::Vec3;

use crate::constants::{DEFAULT_SURFACE_OFFSET, PROBE_BACKOFF, SPHERE_PROBE_RADIUS_FACTOR};
use crate::ray::Ray;
use crate::surface::{SurfaceFilter, SurfaceHit, SurfaceQuery};
use crate::vertex::LineVertex;

/// Sampled polyline between two endpoints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceLine {
    pub points: Vec<Vec3>,
    /// Number of samples that were projected onto a surface
    pub projected: usize,
}

impl TraceLine {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Pack the polyline for a line-strip vertex buffer
    pub fn to_vertices(&self, color: [f32; 4]) -> Vec<LineVertex> {
        self.points
            .iter()
            .map(|p| LineVertex {
                position: p.to_array(),
                color,
            })
            .collect()
    }
}

/// Projects evenly spaced chord samples onto nearby surfaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLineTracer {
    /// Reach of each probe from its sample
    pub search_distance: f32,
    /// Lift applied along the surface normal to found points
    pub surface_offset: f32,
    /// Preferred probe direction; its component along the chord is removed
    pub up: Vec3,
}

impl Default for SurfaceLineTracer {
    fn default() -> Self {
        Self {
            search_distance: 0.15,
            surface_offset: DEFAULT_SURFACE_OFFSET,
            up: Vec3::Y,
        }
    }
}

impl SurfaceLineTracer {
    /// Trace `segment_count` samples (at least 2) from `start` to `end`.
    ///
    /// Samples with no surface in reach keep their straight-chord position.
    pub fn trace(
        &self,
        query: &dyn SurfaceQuery,
        start: Vec3,
        end: Vec3,
        filter: SurfaceFilter,
        segment_count: usize,
    ) -> TraceLine {
        let count = segment_count.max(2);
        let chord = end - start;

        if chord.length() <= f32::EPSILON {
            return TraceLine {
                points: vec![start; count],
                projected: 0,
            };
        }

        let axis = self.probe_axis(chord.normalize());
        let step = chord / (count - 1) as f32;

        let mut points = Vec::with_capacity(count);
        let mut projected = 0;
        for i in 0..count {
            let sample = start + step * i as f32;
            match self.probe(query, sample, axis, filter) {
                Some(hit) => {
                    // Lift toward the probe axis side, whichever face was hit
                    let lift = if hit.normal.dot(axis) < 0.0 { -hit.normal } else { hit.normal };
                    points.push(hit.point + lift * self.surface_offset);
                    projected += 1;
                }
                None => points.push(sample),
            }
        }

        TraceLine { points, projected }
    }

    /// Unit axis perpendicular to the chord, as close to `up` as possible
    fn probe_axis(&self, chord_dir: Vec3) -> Vec3 {
        let up = self.up.normalize_or_zero();
        (up - chord_dir * up.dot(chord_dir))
            .try_normalize()
            .unwrap_or_else(|| chord_dir.any_orthonormal_vector())
    }

    fn probe(
        &self,
        query: &dyn SurfaceQuery,
        sample: Vec3,
        axis: Vec3,
        filter: SurfaceFilter,
    ) -> Option<SurfaceHit> {
        let reach = self.search_distance;

        let forward = Ray::new(sample - axis * PROBE_BACKOFF, axis);
        if let Some(hit) = query.cast_ray(&forward, reach, filter) {
            return Some(hit);
        }

        let backward = Ray::new(sample + axis * PROBE_BACKOFF, -axis);
        if let Some(hit) = query.cast_ray(&backward, reach, filter) {
            return Some(hit);
        }

        let widened = Ray::new(sample + axis * (reach * 0.5), -axis);
        query.cast_sphere(&widened, reach * SPHERE_PROBE_RADIUS_FACTOR, reach, filter)
    }
}
