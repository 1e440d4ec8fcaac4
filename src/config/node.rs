//! Configuration evaluation.

use log::debug;

use super::ConfigValues;
use crate::host::Host;
use crate::renderer::pipeline::NprOverride;
use crate::renderer::settings::ColorDepth;

/// Applies [`ConfigValues`] to a live override.
///
/// A style change is two-phase. The evaluation that first sees it resets
/// the render scale, marks the settings uninitialized and records the new
/// style; the override rebuilds at the start of its next update, and the
/// following evaluation completes the cycle.
#[derive(Debug, Default)]
pub struct ConfigNode {
    registered: bool,
}

impl ConfigNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the node type with the host. Returns whether anything changed.
    pub fn register(&mut self, host: &mut dyn Host) -> bool {
        self.registered = true;
        host.set_config_node_registered(true)
    }

    pub fn deregister(&mut self, host: &mut dyn Host) -> bool {
        self.registered = false;
        host.set_config_node_registered(false)
    }

    #[inline]
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn evaluate(&self, npr: &mut NprOverride, values: &ConfigValues, host: &mut dyn Host) {
        if npr.pending_rebuild() {
            debug!("Configuration deferred until the {} rebuild", npr.settings().style);
            return;
        }

        // Style, first check
        let style_changed = values.style != npr.settings().style;
        if style_changed {
            debug!("Style mismatch: {} -> {}", npr.settings().style, values.style);
            let settings = npr.settings_mut();
            settings.initialized = false;
            settings.render_scale.set_scalar(1.0);
        }

        // Engine settings
        let depth = ColorDepth::from_index(values.color_depth);
        if depth != npr.settings().color_depth {
            npr.change_color_depth(depth);
        }

        let initialized = npr.settings().initialized;
        let render_scale = values.render_scale_factor();
        if initialized && (render_scale - npr.settings().render_scale.scalar()).abs() > f32::EPSILON {
            npr.settings().render_scale.set_scalar(render_scale);
            npr.refresh_targets();
        }

        let antialiasing = values.antialiasing.min(2) as f32;
        if initialized && (antialiasing - npr.settings().antialiasing.scalar()).abs() > f32::EPSILON {
            npr.settings().antialiasing.set_scalar(antialiasing);
            npr.change_antialiasing_effect(host);
        }

        let settings = npr.settings();
        let scale = settings.render_scale.scalar();
        settings
            .depth_range
            .set_components(&values.depth_range.map(|v| v.max(0.0)));
        settings.atmosphere_tint.set_components(&values.atmosphere_tint);
        settings
            .atmosphere_range
            .set_components(&values.atmosphere_range.map(|v| v.max(0.0)));

        // Substrate
        settings.substrate_color.set_components(&values.substrate_color);
        settings.substrate_shading.set_scalar(values.substrate_shading.clamp(0.0, 1.0));
        settings.substrate_light_dir.set_scalar(values.substrate_light_dir.clamp(0.0, 359.0));
        settings.substrate_light_tilt.set_scalar(values.substrate_light_tilt.clamp(0.0, 89.0));
        settings.substrate_roughness.set_scalar(values.substrate_roughness);
        settings.substrate_distortion.set_scalar(values.substrate_distortion * scale);
        settings.substrate_update.set_scalar(values.substrate_interval_ms().max(0.0));

        let substrate_scale = 1.0 / (values.substrate_scale.clamp(0.1, 2.5) * scale);
        npr.update_substrate_texture(substrate_scale, &values.substrate_texture, host);

        npr.compute_style_parameters(&values.style_values);

        // Post-processing
        let fx = npr.effects();
        fx.saturation.set_scalar(values.saturation.max(0.0));
        fx.contrast.set_scalar(values.contrast.max(0.0));
        fx.brightness.set_scalar(values.brightness.max(0.0));

        // Style, second check
        if style_changed {
            npr.request_style(values.style);
        } else {
            npr.settings_mut().initialized = true;
        }
    }
}
