//! Scene Render Pass
//!
//! Thin adapter over the host's own scene rasterizer. The pass picks which
//! items are drawn (shaded geometry or UI), forces the display, lighting and
//! shadow overrides the stylization relies on, and points the host at the
//! pass's declared output targets.
//!
//! The shaded pass also owns the per-vertex velocity history; see
//! [`crate::renderer::graph::velocity`].

use log::trace;

use crate::host::{ClearMask, DisplayMode, LightingMode, SceneDrawRequest, SceneFilter};
use crate::renderer::graph::pass::{PassContext, PassKind, PassState, RenderPass};
use crate::renderer::graph::velocity::VelocityTracker;

/// Host scene draw into the pass's output targets.
#[derive(Debug)]
pub struct ScenePass {
    name: String,
    enabled: bool,
    state: PassState,
    filter: SceneFilter,
    clear: ClearMask,
    clear_color: wgpu::Color,
    clear_depth: f32,
    velocity: VelocityTracker,
}

impl ScenePass {
    #[must_use]
    pub fn new(name: impl Into<String>, filter: SceneFilter, clear: ClearMask) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            state: PassState::Uninitialized,
            filter,
            clear,
            clear_color: wgpu::Color::BLACK,
            clear_depth: 1.0,
            velocity: VelocityTracker::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn filter(&self) -> SceneFilter {
        self.filter
    }

    #[inline]
    #[must_use]
    pub fn clear_mask(&self) -> ClearMask {
        self.clear
    }

    /// Geometry is always drawn shaded and textured so the control
    /// targets receive their painted values.
    #[must_use]
    pub fn display_mode_override(&self) -> Option<DisplayMode> {
        match self.filter {
            SceneFilter::ShadedItems => Some(DisplayMode::ShadedTextured),
            SceneFilter::UiItems => None,
        }
    }

    #[must_use]
    pub fn lighting_mode_override(&self) -> Option<LightingMode> {
        match self.filter {
            SceneFilter::ShadedItems => None,
            SceneFilter::UiItems => Some(LightingMode::NoLighting),
        }
    }

    #[must_use]
    pub fn shadow_enable_override(&self) -> Option<bool> {
        match self.filter {
            SceneFilter::ShadedItems => None,
            SceneFilter::UiItems => Some(false),
        }
    }

    /// Host post effects never run inside the graph.
    #[must_use]
    pub fn post_effects_override(&self) -> bool {
        false
    }

    #[must_use]
    pub fn velocity(&self) -> &VelocityTracker {
        &self.velocity
    }
}

impl RenderPass for ScenePass {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PassKind {
        PassKind::Scene
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn state(&self) -> PassState {
        self.state
    }

    fn execute(&mut self, ctx: &mut PassContext<'_>) {
        let request = SceneDrawRequest {
            pass: &self.name,
            filter: self.filter,
            display_mode: self.display_mode_override(),
            lighting_mode: self.lighting_mode_override(),
            shadows: self.shadow_enable_override(),
            post_effects: self.post_effects_override(),
            clear: self.clear,
            clear_color: self.clear_color,
            clear_depth: self.clear_depth,
            targets: ctx.targets.operation_outputs(&self.name),
        };
        ctx.host.draw_scene(&request);

        if self.filter == SceneFilter::ShadedItems && ctx.settings.velocity_enabled() {
            let meshes = self.velocity.write_previous_positions(ctx.host);
            trace!("Pass '{}': velocity written for {meshes} meshes", self.name);
        }
        if self.filter == SceneFilter::ShadedItems {
            self.velocity.end_frame(ctx.frame.view_projection);
        }
        self.state = PassState::Active;
    }

    fn as_scene(&self) -> Option<&ScenePass> {
        Some(self)
    }
}
