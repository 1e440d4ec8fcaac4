//! Per-vertex velocity tests
//!
//! Tests for:
//! - Previous screen positions written only while velocity is enabled
//! - Identity history on the first frame
//! - World-matrix and view-projection history rolled forward per frame

use glam::{Mat4, Vec3, Vec4};

use brushwork::host::headless::{HeadlessHost, HeadlessMesh};
use brushwork::renderer::graph::VelocityTracker;
use brushwork::renderer::graph::velocity::{PREVIOUS_SCREEN_POSITION_SET, PREVIOUS_WORLD_MATRIX_ATTR};
use brushwork::{NprOverride, PipelineConfig, StyleId};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn triangle() -> Vec<Vec3> {
    vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)]
}

fn approx(a: Vec4, b: Vec4) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn npr_with_style(style: StyleId, host: &mut HeadlessHost) -> NprOverride {
    let config = PipelineConfig {
        initial_style: style,
        ..PipelineConfig::default()
    };
    NprOverride::new(config, host).unwrap()
}

// ============================================================================
// Tracker
// ============================================================================

#[test]
fn first_frame_uses_identity_history() {
    let mut host = HeadlessHost::new();
    let mesh = host.add_mesh(HeadlessMesh::new(Mat4::from_translation(Vec3::X), triangle()));
    let tracker = VelocityTracker::new();

    assert_eq!(tracker.write_previous_positions(&mut host), 1);

    let colors = host.mesh(mesh).unwrap().color_sets[PREVIOUS_SCREEN_POSITION_SET].clone();
    assert_eq!(colors.len(), 3);
    assert!(approx(colors[1], Vec4::new(1.0, 0.0, 0.0, 1.0)));
    assert_eq!(
        host.mesh(mesh).unwrap().matrix_attributes[PREVIOUS_WORLD_MATRIX_ATTR],
        Mat4::from_translation(Vec3::X)
    );
}

#[test]
fn history_rolls_forward() {
    let mut host = HeadlessHost::new();
    let mesh = host.add_mesh(HeadlessMesh::new(Mat4::IDENTITY, triangle()));
    let mut tracker = VelocityTracker::new();

    tracker.write_previous_positions(&mut host);
    tracker.end_frame(Mat4::from_scale(Vec3::splat(2.0)));
    host.mesh_mut(mesh).unwrap().world = Mat4::from_translation(Vec3::Y);

    tracker.write_previous_positions(&mut host);

    // Last frame: identity world, scaled view-projection.
    let colors = &host.mesh(mesh).unwrap().color_sets[PREVIOUS_SCREEN_POSITION_SET];
    assert!(approx(colors[1], Vec4::new(2.0, 0.0, 0.0, 1.0)));
    assert_eq!(
        host.mesh(mesh).unwrap().matrix_attributes[PREVIOUS_WORLD_MATRIX_ATTR],
        Mat4::from_translation(Vec3::Y)
    );
}

#[test]
fn existing_alpha_is_preserved() {
    let mut host = HeadlessHost::new();
    let mut mesh = HeadlessMesh::new(Mat4::IDENTITY, triangle());
    mesh.color_sets
        .insert(PREVIOUS_SCREEN_POSITION_SET.to_owned(), vec![Vec4::new(0.0, 0.0, 0.0, 0.25); 3]);
    let mesh = host.add_mesh(mesh);

    VelocityTracker::new().write_previous_positions(&mut host);

    let colors = &host.mesh(mesh).unwrap().color_sets[PREVIOUS_SCREEN_POSITION_SET];
    assert!(colors.iter().all(|c| (c.w - 0.25).abs() < EPSILON));
}

// ============================================================================
// Geometry pass
// ============================================================================

#[test]
fn watercolor_leaves_meshes_untouched() {
    let mut host = HeadlessHost::new();
    let mesh = host.add_mesh(HeadlessMesh::new(Mat4::IDENTITY, triangle()));
    let mut npr = npr_with_style(StyleId::Watercolor, &mut host);

    npr.render(&mut host).unwrap();

    assert!(!npr.settings().velocity_enabled());
    assert!(host.mesh(mesh).unwrap().color_sets.is_empty());
}

#[test]
fn oil_writes_velocity_every_frame() {
    let mut host = HeadlessHost::new();
    let mesh = host.add_mesh(HeadlessMesh::new(Mat4::IDENTITY, triangle()));
    let mut npr = npr_with_style(StyleId::Oil, &mut host);

    npr.render(&mut host).unwrap();
    assert!(host.mesh(mesh).unwrap().color_sets.contains_key(PREVIOUS_SCREEN_POSITION_SET));

    let view_projection = Mat4::from_scale(Vec3::new(0.5, 0.5, 1.0));
    host.frame_mut().unwrap().view_projection = view_projection;
    npr.render(&mut host).unwrap();
    npr.render(&mut host).unwrap();

    // Third frame projects with the second frame's view-projection.
    let colors = &host.mesh(mesh).unwrap().color_sets[PREVIOUS_SCREEN_POSITION_SET];
    assert!(approx(colors[2], Vec4::new(0.0, 0.5, 0.0, 1.0)));
}

#[test]
fn velocity_toggle_on_framework() {
    let mut host = HeadlessHost::new();
    let mesh = host.add_mesh(HeadlessMesh::new(Mat4::IDENTITY, triangle()));
    let mut npr = npr_with_style(StyleId::Framework, &mut host);

    npr.settings().velocity_pv.set_scalar(1.0);
    npr.render(&mut host).unwrap();

    assert!(host.mesh(mesh).unwrap().matrix_attributes.contains_key(PREVIOUS_WORLD_MATRIX_ATTR));
}
