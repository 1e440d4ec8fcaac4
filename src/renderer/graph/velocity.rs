//! Per-vertex velocity.
//!
//! After the geometry pass, every mesh gets its previous-frame screen
//! position written into a vertex color set. A later quad pass compares it
//! with the current position to derive screen-space velocity.
//!
//! Two pieces of history are kept: a per-mesh matrix attribute holding last
//! frame's world matrix, and one global previous view-projection matrix.
//! Both start as identity.

use glam::{Mat4, Vec3, Vec4};
use log::{trace, warn};

use crate::host::SceneAccess;

/// Mesh attribute storing last frame's world matrix.
pub const PREVIOUS_WORLD_MATRIX_ATTR: &str = "worldPreviousMatrix";

/// Vertex color set receiving the previous screen-space positions.
pub const PREVIOUS_SCREEN_POSITION_SET: &str = "previousScreenPosition";

/// Projects `point` with last frame's matrices into normalized device
/// coordinates. Points that land on `w == 0` map to the origin.
#[must_use]
pub fn previous_screen_position(point: Vec3, previous_world: &Mat4, previous_view_projection: &Mat4) -> Vec3 {
    let world = previous_world.transform_point3(point);
    let clip = *previous_view_projection * world.extend(1.0);
    if clip.w.abs() <= f32::EPSILON {
        Vec3::ZERO
    } else {
        clip.truncate() / clip.w
    }
}

/// Tracks the global view-projection history across frames.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    previous_view_projection: Option<Mat4>,
}

impl VelocityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last frame's view-projection, identity before the first frame.
    #[must_use]
    pub fn previous_view_projection(&self) -> Mat4 {
        self.previous_view_projection.unwrap_or(Mat4::IDENTITY)
    }

    /// Writes previous screen positions for every mesh and rolls each
    /// mesh's world-matrix history forward. Returns the meshes written.
    ///
    /// Alpha is kept from the mesh's existing color set; vertices without
    /// one get an alpha of 1.0.
    pub fn write_previous_positions<S: SceneAccess + ?Sized>(&self, scene: &mut S) -> usize {
        let view_projection = self.previous_view_projection();
        let mut written = 0;

        for mesh in scene.meshes() {
            let Some(world) = scene.world_matrix(mesh) else {
                warn!("Mesh {mesh} has no world matrix, skipping velocity");
                continue;
            };
            let previous_world = scene
                .matrix_attribute(mesh, PREVIOUS_WORLD_MATRIX_ATTR)
                .unwrap_or(Mat4::IDENTITY);

            let points = scene.points(mesh);
            let existing = scene.color_set(mesh, PREVIOUS_SCREEN_POSITION_SET).unwrap_or_default();
            let colors: Vec<Vec4> = points
                .iter()
                .enumerate()
                .map(|(i, &p)| {
                    let alpha = existing.get(i).map_or(1.0, |c| c.w);
                    previous_screen_position(p, &previous_world, &view_projection).extend(alpha)
                })
                .collect();

            trace!("Mesh {mesh}: {} previous positions", colors.len());
            scene.set_color_set(mesh, PREVIOUS_SCREEN_POSITION_SET, colors);
            scene.set_matrix_attribute(mesh, PREVIOUS_WORLD_MATRIX_ATTR, world);
            written += 1;
        }
        written
    }

    /// Stores this frame's view-projection as next frame's history.
    pub fn end_frame(&mut self, view_projection: Mat4) {
        self.previous_view_projection = Some(view_projection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_history_keeps_points() {
        let p = Vec3::new(0.25, -0.5, 0.75);
        let out = previous_screen_position(p, &Mat4::IDENTITY, &Mat4::IDENTITY);
        assert!((out - p).length() < 1e-6);
    }

    #[test]
    fn test_perspective_divide() {
        let world = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let out = previous_screen_position(Vec3::new(1.0, 0.0, 0.0), &world, &proj);

        // x_ndc = x / -z for a 90 degree fov
        assert!((out.x - 0.2).abs() < 1e-5);
        assert!(out.y.abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_w_maps_to_origin() {
        let out = previous_screen_position(Vec3::ONE, &Mat4::IDENTITY, &Mat4::ZERO);
        assert_eq!(out, Vec3::ZERO);
    }
}
