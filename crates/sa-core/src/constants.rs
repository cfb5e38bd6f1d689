//! Global constants for sa-core

/// Squared length below which a measurement arm is treated as zero length
pub const DEGENERATE_LENGTH_SQ: f32 = 1e-6;

/// Cross product magnitude (sine of the included angle) below which
/// the three points are treated as collinear
pub const COLLINEAR_EPSILON: f32 = 1e-6;

/// Determinant threshold for ray-triangle tests
pub const RAY_TRIANGLE_EPSILON: f32 = 1e-8;

/// Denominator threshold for ray-plane tests
pub const RAY_PLANE_EPSILON: f32 = 1e-6;

/// Distance a surface probe starts behind its sample point
pub const PROBE_BACKOFF: f32 = 0.001;

/// Sphere probe radius as a fraction of the tracer search radius
pub const SPHERE_PROBE_RADIUS_FACTOR: f32 = 0.5;

/// Marching step of the swept sphere test as a fraction of the sphere radius
pub const SPHERE_CAST_STEP_FACTOR: f32 = 0.5;

/// Bisection passes used to refine a swept sphere contact
pub const SPHERE_CAST_REFINE_STEPS: u32 = 16;

/// Default offset along the surface normal for traced geometry
pub const DEFAULT_SURFACE_OFFSET: f32 = 0.002;

/// Default number of latitude segments for sphere mesh generation
pub const SPHERE_LAT_SEGMENTS: u32 = 16;

/// Default number of longitude segments for sphere mesh generation
pub const SPHERE_LON_SEGMENTS: u32 = 32;
