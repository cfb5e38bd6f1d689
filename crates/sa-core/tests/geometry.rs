//! End-to-end geometry checks across the public API

use approx::assert_abs_diff_eq;
use glam::{Quat, Vec2, Vec3};
use sa_core::primitive::{generate_box_mesh, generate_plane_mesh};
use sa_core::{
    AngleBasis, ArcMeshBuilder, CategoryMask, Degenerate, Frame, LabelSettings, MeshScene,
    SurfaceFilter, SurfaceLineTracer, SurfaceQuery, UpAxis, Viewpoint, cast_from_screen,
    direct_angle, place_label, snap_to_nearest_vertex,
};

#[test]
fn right_angle_measurement_produces_arc_and_label() {
    let a = Vec3::new(0.0, 0.0, 1.0);
    let b = Vec3::ZERO;
    let c = Vec3::new(1.0, 0.0, 0.0);

    let basis = AngleBasis::compute(a, b, c).unwrap();
    assert_abs_diff_eq!(basis.degrees(), 90.0, epsilon = 1e-4);
    assert_abs_diff_eq!(basis.x_axis, Vec3::Z, epsilon = 1e-6);

    let center = ArcMeshBuilder::center(&basis, b, 0.002, None, UpAxis::Y);
    let arc = ArcMeshBuilder::build(&basis, center, 0.12, 24);
    assert_eq!(arc.vertices.len(), 26);
    assert_eq!(arc.triangle_count(), 24);

    let view = Viewpoint::new(Vec3::new(0.5, 1.0, 0.5), Vec3::ZERO, Vec3::Y);
    let label = place_label(&basis, center, 0.12, &view, &LabelSettings::default());
    assert_eq!(label.text, "90.0°");
}

#[test]
fn sweep_is_order_independent_for_many_triangles() {
    let b = Vec3::new(0.3, -0.2, 0.1);
    for i in 0..32 {
        let t = i as f32 * 0.37;
        let a = b + Vec3::new(t.cos(), 0.4 * t.sin(), t.sin()) * (1.0 + 0.1 * i as f32);
        let c = b + Vec3::new((2.0 * t).sin(), 1.0, -(0.5 * t).cos());

        let forward = AngleBasis::compute(a, b, c).unwrap();
        let reversed = AngleBasis::compute(c, b, a).unwrap();
        let direct = direct_angle(a, b, c).unwrap();

        assert_abs_diff_eq!(forward.sweep_angle, direct, epsilon = 1e-4);
        assert_abs_diff_eq!(reversed.sweep_angle, direct, epsilon = 1e-4);
    }
}

#[test]
fn degenerate_inputs_never_produce_nan() {
    let b = Vec3::new(1.0, 2.0, 3.0);
    assert_eq!(AngleBasis::compute(b, b, Vec3::ZERO), Err(Degenerate::ZeroLength));
    assert_eq!(
        AngleBasis::compute(b + Vec3::X, b, b + Vec3::X * 5.0),
        Err(Degenerate::Collinear)
    );
    assert_eq!(direct_angle(b, b, b), Err(Degenerate::ZeroLength));
}

#[test]
fn trace_without_surfaces_is_straight_chord() {
    let scene = MeshScene::new();
    let start = Vec3::new(-1.0, 0.5, 2.0);
    let end = Vec3::new(3.0, 1.5, -2.0);

    let line = SurfaceLineTracer::default().trace(&scene, start, end, SurfaceFilter::ALL, 40);

    assert_eq!(line.len(), 40);
    assert_eq!(line.projected, 0);
    for (i, p) in line.points.iter().enumerate() {
        let expected = start + (end - start) * (i as f32 / 39.0);
        assert_abs_diff_eq!(*p, expected, epsilon = 1e-5);
    }
}

#[test]
fn screen_pick_lands_on_rotated_box() {
    let mut scene = MeshScene::new();
    let floor = scene.add_surface(
        "floor",
        generate_plane_mesh(20.0, 1),
        Frame::IDENTITY,
        CategoryMask::bit(0),
    );
    let cube = scene.add_surface(
        "cube",
        generate_box_mesh(Vec3::splat(1.0)),
        Frame::new(Vec3::new(0.0, 0.5, 0.0), Quat::from_rotation_y(0.6)),
        CategoryMask::bit(1),
    );

    let view = Viewpoint::new(Vec3::new(0.0, 4.0, 0.0), Vec3::ZERO, Vec3::NEG_Z)
        .with_viewport(640.0, 480.0);
    // Just off the viewport center, away from the triangle seams under it
    let pixel = Vec2::new(333.0, 251.0);

    let hit = cast_from_screen(&scene, &view, pixel, SurfaceFilter::ALL).unwrap();
    assert_eq!(hit.surface, cube);
    assert_abs_diff_eq!(hit.point.y, 1.0, epsilon = 1e-3);

    let hit = cast_from_screen(&scene, &view, pixel, SurfaceFilter::new(CategoryMask::bit(0)))
        .unwrap();
    assert_eq!(hit.surface, floor);

    // Snapping uses the surface's current frame
    let anchor = scene.anchor(cube).unwrap();
    let mesh = scene.mesh(cube).unwrap();
    let snapped = snap_to_nearest_vertex(mesh, &anchor.frame, Vec3::new(0.6, 1.0, 0.6));
    assert!(mesh
        .world_vertices(&anchor.frame)
        .any(|v| v.distance(snapped) < 1e-6));
    assert_abs_diff_eq!(snapped.y, 1.0, epsilon = 1e-5);
}
