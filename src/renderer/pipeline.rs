//! NPR Render Override
//!
//! [`NprOverride`] owns the whole render-operation graph: the target
//! registry, the ordered pass list, the engine settings every pass reads and
//! the attribute schema of the active style.
//!
//! # Frame lifecycle
//!
//! ```text
//! render()
//!   ├─ update()
//!   │    ├─ apply a pending style rebuild
//!   │    ├─ read the frame context (fails the frame if the host has none)
//!   │    ├─ refresh time / random noise inputs and host gamma
//!   │    ├─ resize / MSAA reconciliation
//!   │    ├─ substrate UV animation
//!   │    └─ one batched target update, if anything changed
//!   └─ execute every enabled pass in order
//! ```
//!
//! Reconfiguration never happens halfway through a frame: a style switch is
//! recorded by the configuration evaluation and applied by the next
//! `update()` through [`NprOverride::rebuild`].

use std::collections::BTreeMap;

use log::{debug, error, info, trace, warn};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::config::PipelineConfig;
use crate::errors::{BrushworkError, Result};
use crate::host::{ClearMask, FrameContext, Host, SceneFilter};
use crate::renderer::graph::passes::hud::HUD_PASS_NAME;
use crate::renderer::graph::{
    GraphBuilder, HudPass, PassContext, PresentPass, QuadPass, RenderGraph, RenderPass, ScenePass, ShaderSource, TargetRegistry,
};
use crate::renderer::settings::{ColorDepth, EffectParameters, EngineSettings};
use crate::styles::{AttributeSchema, StyleId, StyleInputs};

pub const GEOMETRY_PASS: &str = "[scene] geometry";
pub const ADJUST_LOAD_PASS: &str = "[quad] adjust-load";
pub const EDGE_DETECTION_PASS: &str = "[quad] edge detection";
pub const ANTIALIASING_PASS: &str = "[quad] antialiasing";
pub const SUBSTRATE_LIGHTING_PASS: &str = "[quad] substrate lighting";
pub const DEBUGGER_PASS: &str = "[quad] debugger";
pub const UI_PASS: &str = "[scene] UI";

pub const STYLIZATION_TARGET: &str = "stylizationTarget";
pub const OUTPUT_TARGET: &str = "outputTarget";
pub const PRESENT_TARGET: &str = "presentTarget";

/// Texture parameter of the adjust-load pass holding the paper substrate.
pub const SUBSTRATE_TEXTURE_PARAM: &str = "gSubstrateTex";

/// Targets whose format follows the user color depth.
pub const COLOR_DEPTH_TARGETS: [&str; 5] = ["colorTarget", "diffuseTarget", STYLIZATION_TARGET, OUTPUT_TARGET, PRESENT_TARGET];

/// Format of a fixed target.
#[derive(Debug, Clone, Copy)]
enum BaseFormat {
    User,
    Fixed(wgpu::TextureFormat),
}

/// G-buffer and intermediate targets, in registration order:
/// `(name, multisampled, format)`.
const BASE_TARGETS: [(&str, bool, BaseFormat); 12] = [
    ("colorTarget", true, BaseFormat::User),
    ("depthTarget", true, BaseFormat::Fixed(wgpu::TextureFormat::Depth24PlusStencil8)),
    ("diffuseTarget", true, BaseFormat::User),
    ("specularTarget", true, BaseFormat::Fixed(wgpu::TextureFormat::Rgba8Snorm)),
    ("pigmentCtrlTarget", true, BaseFormat::Fixed(wgpu::TextureFormat::Rgba8Snorm)),
    ("substrateCtrlTarget", true, BaseFormat::Fixed(wgpu::TextureFormat::Rgba8Snorm)),
    ("edgeCtrlTarget", true, BaseFormat::Fixed(wgpu::TextureFormat::Rgba8Snorm)),
    ("abstractCtrlTarget", true, BaseFormat::Fixed(wgpu::TextureFormat::Rgba8Snorm)),
    ("substrateTarget", false, BaseFormat::Fixed(wgpu::TextureFormat::Rgba16Float)),
    ("linearDepth", false, BaseFormat::Fixed(wgpu::TextureFormat::Rg32Float)),
    ("edgeTarget", false, BaseFormat::Fixed(wgpu::TextureFormat::Rgba8Snorm)),
    ("velocity", false, BaseFormat::Fixed(wgpu::TextureFormat::Rg32Float)),
];

/// Substrate UV offset for animation time `t_ms`.
#[must_use]
pub fn substrate_uv_offset(t_ms: f64) -> [f32; 2] {
    let s = t_ms.sin();
    [(s * 0.5453).fract() as f32, (s * 0.8317).fract() as f32]
}

/// Scaled render size of a viewport dimension.
#[inline]
fn scaled(dimension: u32, scale: f32) -> u32 {
    ((dimension as f32 * scale) as u32).max(1)
}

/// The render override: targets, passes and settings of one viewport.
pub struct NprOverride {
    config: PipelineConfig,
    settings: EngineSettings,
    effects: EffectParameters,
    schema: AttributeSchema,

    targets: TargetRegistry,
    graph: RenderGraph,

    built: bool,
    target_update: bool,
    pending_rebuild: bool,

    previous_timeline_ms: f64,
    frame: Option<FrameContext>,
}

impl NprOverride {
    /// Creates the override and builds the graph for `config.initial_style`.
    pub fn new(config: PipelineConfig, host: &mut dyn Host) -> Result<Self> {
        let mut settings = EngineSettings::with_style(config.initial_style);
        settings.substrate_tex_filename.clone_from(&config.substrate_texture);

        if host.add_shader_path(&config.shader_root) {
            info!("Shader directory added: {}", config.shader_root.display());
        } else {
            debug!("Shader directory has previously been added");
        }

        let mut npr = Self {
            config,
            settings,
            effects: EffectParameters::default(),
            schema: AttributeSchema::new(),
            targets: TargetRegistry::new(),
            graph: RenderGraph::with_capacity(48),
            built: false,
            target_update: false,
            pending_rebuild: false,
            previous_timeline_ms: 0.0,
            frame: None,
        };
        npr.build(host)?;
        Ok(npr)
    }

    // ========================================================================
    // Build / teardown
    // ========================================================================

    /// Builds targets and passes for the active style.
    ///
    /// Only valid on a torn-down override; see [`teardown`](Self::teardown).
    pub fn build(&mut self, host: &mut dyn Host) -> Result<()> {
        if self.built {
            return Err(BrushworkError::ConfigurationMismatch(
                "build() called on a graph that is already built".to_owned(),
            ));
        }

        let style = self.settings.style.pipeline();
        self.schema = AttributeSchema::new();
        style.initialize_parameters(&mut self.schema, &self.settings, &self.effects);

        let api_name = match &self.frame {
            Some(frame) => frame.api_name.clone(),
            None => host.frame_context().map_or_else(|| "unknown".to_owned(), |f| f.api_name),
        };
        let title = format!("{} {}     ({api_name})", self.config.ui_name, self.settings.style);

        let user_format = self.settings.user_format();
        let settings = &self.settings;
        let mut builder = GraphBuilder::new(
            &mut self.graph,
            &mut self.targets,
            host,
            settings,
            &self.effects,
            &self.config.texture_root,
        );

        // Sized on the first update().
        for (name, multisampled, format) in BASE_TARGETS {
            let format = match format {
                BaseFormat::User => user_format,
                BaseFormat::Fixed(format) => format,
            };
            builder.add_matching_target(name, format, multisampled);
        }
        style.add_targets(&mut builder);
        for name in [STYLIZATION_TARGET, OUTPUT_TARGET] {
            builder.add_matching_target(name, user_format, false);
        }
        let present = builder.add_matching_target(PRESENT_TARGET, user_format, false);
        builder.set_present_target(present);

        builder.add_pass(
            Box::new(ScenePass::new(GEOMETRY_PASS, SceneFilter::ShadedItems, ClearMask::ALL)),
            &[
                "colorTarget",
                "depthTarget",
                "diffuseTarget",
                "specularTarget",
                "pigmentCtrlTarget",
                "substrateCtrlTarget",
                "edgeCtrlTarget",
                "abstractCtrlTarget",
                "velocity",
            ],
        );

        builder
            .quad(ADJUST_LOAD_PASS, ShaderSource::new("quadAdjustLoad", "adjustLoadMNPR"))
            .target("gColorTex", "colorTarget")
            .target("gZBuffer", "depthTarget")
            .target("gDiffuseTex", "diffuseTarget")
            .target("gSpecularTex", "specularTarget")
            .target("gLinearDepthTex", "linearDepth")
            .target("gVelocityTex", "velocity")
            .texture(SUBSTRATE_TEXTURE_PARAM, &settings.substrate_tex_filename)
            .param("gGamma", &settings.host_gamma)
            .param("gDepthRange", &settings.depth_range)
            .param("gSaturation", &self.effects.saturation)
            .param("gContrast", &self.effects.contrast)
            .param("gBrightness", &self.effects.brightness)
            .param("gSubstrateColor", &settings.substrate_color)
            .param("gAtmosphereTint", &settings.atmosphere_tint)
            .param("gAtmosphereRange", &settings.atmosphere_range)
            .param("gEnableVelocityPV", &settings.velocity_pv)
            .param("gSubstrateRoughness", &settings.substrate_roughness)
            .outputs(&[STYLIZATION_TARGET, "substrateTarget", "linearDepth", "velocity"])
            .add();

        builder
            .quad(EDGE_DETECTION_PASS, ShaderSource::new("quadEdgeDetection", "sobelRGBDEdgeDetection"))
            .target("gColorTex", STYLIZATION_TARGET)
            .target("gDepthTex", "linearDepth")
            .outputs(&["edgeTarget"])
            .add();

        style.add_passes(&mut builder);

        builder
            .quad(ANTIALIASING_PASS, ShaderSource::new("quadAA", "FXAA"))
            .target("gColorTex", STYLIZATION_TARGET)
            .param("gRenderScale", &settings.render_scale)
            .param("gAntialiasingQuality", &settings.antialiasing)
            .outputs(&[OUTPUT_TARGET])
            .add();

        builder
            .quad(
                SUBSTRATE_LIGHTING_PASS,
                ShaderSource::new("quadSubstrate", style.substrate_lighting_technique()),
            )
            .target("gColorTex", OUTPUT_TARGET)
            .target("gSubstrateTex", "substrateTarget")
            .param("gGamma", &settings.host_gamma)
            .param("gSubstrateLightDir", &settings.substrate_light_dir)
            .param("gSubstrateLightTilt", &settings.substrate_light_tilt)
            .param("gSubstrateShading", &settings.substrate_shading)
            .outputs(&[OUTPUT_TARGET])
            .add();

        builder
            .quad(DEBUGGER_PASS, ShaderSource::new("quadDebug", "debugPresentMNPR"))
            .target("gColorTex", OUTPUT_TARGET)
            .param("gMnprGamma", &settings.npr_gamma)
            .param("gColorChannels", &settings.color_channels)
            .param("gColorTransform", &settings.color_transform_mode)
            .outputs(&[PRESENT_TARGET])
            .add();

        builder.add_pass(
            Box::new(ScenePass::new(UI_PASS, SceneFilter::UiItems, ClearMask::empty())),
            &[PRESENT_TARGET, "depthTarget"],
        );
        builder.add_pass(Box::new(HudPass::new(title)), &[]);
        builder.add_pass(Box::new(PresentPass::new()), &[]);

        let passes = builder.pass_count();
        self.built = true;
        // First update() sizes everything to the viewport.
        self.target_update = true;
        info!(
            "Built {} pipeline: {} targets, {passes} passes",
            self.settings.style,
            self.targets.len()
        );
        Ok(())
    }

    /// Releases every pass and target. Safe to call twice.
    pub fn teardown(&mut self, host: &mut dyn Host) {
        self.graph.release_all(host);
        self.targets.clear(host);
        self.built = false;
        debug!("Render graph torn down");
    }

    /// Tears the graph down and builds it again for the current style.
    pub fn rebuild(&mut self, host: &mut dyn Host) -> Result<()> {
        self.teardown(host);
        self.build(host)
    }

    /// Rebuilds the stylization from scratch.
    pub fn reset_stylization(&mut self, host: &mut dyn Host) -> Result<()> {
        info!("Resetting {} stylization", self.settings.style);
        self.rebuild(host)
    }

    // ========================================================================
    // Per-frame
    // ========================================================================

    /// Reconciles settings and targets with the host's current frame.
    ///
    /// Fails only when the graph cannot run this frame at all: nothing is
    /// built, or the host has no frame context.
    pub fn update(&mut self, host: &mut dyn Host) -> Result<FrameContext> {
        if self.pending_rebuild {
            self.pending_rebuild = false;
            info!("Applying style change to {}", self.settings.style);
            self.rebuild(host)?;
        }
        if !self.built {
            return Err(BrushworkError::FrameSetup("render graph is not built".to_owned()));
        }
        let frame = host
            .frame_context()
            .ok_or_else(|| BrushworkError::FrameSetup("host has no frame context".to_owned()))?;
        if frame.viewport_width == 0 || frame.viewport_height == 0 {
            return Err(BrushworkError::FrameSetup(format!(
                "viewport is {}x{}",
                frame.viewport_width, frame.viewport_height
            )));
        }

        self.settings.time.set_scalar(frame.wall_clock_ms as f32);
        let seed = frame.wall_clock_ms as u64;
        let random: Vec<f32> = (0..3u64)
            .map(|i| StdRng::seed_from_u64(seed.wrapping_add(i)).random_range(0..255u32) as f32)
            .collect();
        self.settings.random.set_components(&random);

        if self.settings.npr_gamma.scalar().abs() < f32::EPSILON {
            self.settings
                .host_gamma
                .set_scalar(if frame.gamma_correction { 1.0 } else { 0.0 });
        }

        self.reconcile_size(&frame);
        self.update_substrate_animation(frame.timeline_ms, host);

        if self.target_update {
            self.flush_target_update(host);
        }
        if self.targets.has_missing_handles() && self.targets.reacquire_missing(host) > 0 {
            self.rebind_quad_targets();
        }

        self.frame = Some(frame.clone());
        Ok(frame)
    }

    /// One frame: [`update`](Self::update), then every enabled pass.
    pub fn render(&mut self, host: &mut dyn Host) -> Result<()> {
        let frame = self.update(host)?;
        let mut ctx = PassContext {
            host,
            targets: &self.targets,
            settings: &self.settings,
            frame: &frame,
        };
        self.graph.execute(&mut ctx);
        Ok(())
    }

    fn reconcile_size(&mut self, frame: &FrameContext) {
        let scale = self.settings.render_scale.scalar();
        let (width, height) = (scaled(frame.viewport_width, scale), scaled(frame.viewport_height, scale));

        let Some(first) = self.targets.descriptor(0) else {
            return;
        };
        let resize = first.width != width || first.height != height;
        let resample = first.sample_count != frame.sample_count;

        if resize {
            debug!("Resizing targets to {width}x{height} (scale {scale})");
            let last = self.targets.len().saturating_sub(1);
            for desc in &mut self.targets.descriptors_mut()[..last] {
                desc.width = width;
                desc.height = height;
            }
            for name in [OUTPUT_TARGET, PRESENT_TARGET] {
                if let Some(desc) = self.targets.descriptor_by_name_mut(name) {
                    desc.width = frame.viewport_width;
                    desc.height = frame.viewport_height;
                }
            }
            self.target_update = true;
        }

        if resample {
            debug!("MSAA changed to {}x", frame.sample_count);
            for desc in self.targets.descriptors_mut() {
                desc.sample_count = frame.sample_count;
            }
            self.target_update = true;
        }
    }

    fn update_substrate_animation(&mut self, timeline_ms: f64, host: &mut dyn Host) {
        let interval = f64::from(self.settings.substrate_update.scalar());
        if interval <= 0.0 || (timeline_ms - self.previous_timeline_ms).abs() <= interval {
            return;
        }
        let offset = substrate_uv_offset(timeline_ms);
        self.previous_timeline_ms = timeline_ms;
        self.settings.substrate_uv_offset.set_components(&offset);
        trace!("Substrate UV offset {offset:?} at {timeline_ms} ms");

        let Some(quad) = self.graph.pass_by_name_mut(ADJUST_LOAD_PASS).and_then(RenderPass::as_quad_mut) else {
            return;
        };
        let shader = quad.shader_instance();
        if let Some(texture) = quad.params_mut().texture_mut(SUBSTRATE_TEXTURE_PARAM) {
            texture.set_uv_offset(offset);
            if let Some(shader) = shader {
                texture.push_params(shader, host);
            }
        }
    }

    /// Sends the pending descriptor changes as one batch. A rejected batch
    /// stays pending for the next frame.
    fn flush_target_update(&mut self, host: &mut dyn Host) {
        match self.targets.update_target_descriptions(host) {
            Ok(updated) => {
                trace!("Target update: {updated} targets");
                self.target_update = false;
            }
            Err(e) => error!("Render targets could not be updated, retrying next frame: {e}"),
        }
    }

    /// Re-resolves every quad pass's target parameters by name.
    fn rebind_quad_targets(&mut self) {
        let targets = &self.targets;
        let rebound: usize = self
            .graph
            .iter_mut()
            .filter_map(RenderPass::as_quad_mut)
            .map(|quad| quad.params_mut().rebind_targets(targets))
            .sum();
        debug!("Rebound {rebound} target parameters");
    }

    // ========================================================================
    // Reconfiguration
    // ========================================================================

    /// Switches the raster format of the color-bearing targets. The change
    /// reaches the host with the next batched target update.
    pub fn change_color_depth(&mut self, depth: ColorDepth) {
        self.settings.color_depth = depth;
        let format = depth.format();
        for name in COLOR_DEPTH_TARGETS {
            if let Some(desc) = self.targets.descriptor_by_name_mut(name) {
                desc.format = format;
            }
        }
        self.target_update = true;
        debug!("Color depth set to {depth:?} ({format:?})");
    }

    /// Applies a sample count to every target in one batched update.
    pub fn change_msaa(&mut self, samples: u32, host: &mut dyn Host) {
        let samples = samples.max(1);
        for desc in self.targets.descriptors_mut() {
            desc.sample_count = samples;
        }
        self.target_update = true;
        self.flush_target_update(host);
        debug!("MSAA {samples}x applied");
    }

    /// Recompiles the antialiasing pass with the current quality setting.
    pub fn change_antialiasing_effect(&mut self, host: &mut dyn Host) {
        match self.graph.pass_by_name_mut(ANTIALIASING_PASS).and_then(RenderPass::as_quad_mut) {
            Some(quad) => {
                quad.reset_shader(host);
                debug!("Antialiasing quality {}", self.settings.antialiasing.scalar());
            }
            None => error!("Render pass '{ANTIALIASING_PASS}' not found"),
        }
    }

    /// Shows target `index` through the debugger pass.
    pub fn change_active_target(&mut self, index: usize) -> Result<()> {
        let len = self.targets.len();
        let name = self
            .targets
            .descriptor(index)
            .map(|d| d.name.clone())
            .ok_or(BrushworkError::IndexOutOfRange {
                context: "render target",
                index,
                len,
            })?;
        let quad = self
            .graph
            .pass_by_name_mut(DEBUGGER_PASS)
            .and_then(RenderPass::as_quad_mut)
            .ok_or_else(|| BrushworkError::ResourceNotFound {
                kind: "render pass",
                name: DEBUGGER_PASS.to_owned(),
            })?;
        quad.params_mut().add_target("gColorTex", &self.targets, &name);
        info!("Debugger shows '{name}'");
        Ok(())
    }

    /// Channel mask of the debugger pass, `[r, g, b, a]`.
    pub fn debug_channels(&mut self, channels: [f32; 4]) {
        self.settings.color_channels.set_components(&channels);
    }

    pub fn debug_color_transform(&mut self, mode: u32) {
        self.settings.color_transform_mode.set_scalar(mode as f32);
    }

    /// Forces a resize on the next update.
    pub fn refresh_targets(&mut self) {
        if let Some(desc) = self.targets.descriptor_mut(0) {
            desc.width = 1;
        }
    }

    /// Pins the gamma state the stylization sees, or hands it back to the host.
    pub fn set_gamma_freeze(&mut self, frozen: bool) {
        let value = match (frozen, self.settings.host_gamma.scalar() == 0.0) {
            (false, _) => 0.0,
            (true, true) => 0.5,
            (true, false) => 1.0,
        };
        self.settings.npr_gamma.set_scalar(value);
    }

    /// Records a style switch. The rebuild runs at the start of the next update.
    pub fn request_style(&mut self, style: StyleId) {
        if style == self.settings.style && !self.pending_rebuild {
            return;
        }
        info!("Changing style to: {style}");
        self.settings.style = style;
        self.settings.initialized = false;
        self.settings.render_scale.set_scalar(1.0);
        self.pending_rebuild = true;
    }

    /// Updates scale and file of the substrate texture and re-pushes it.
    pub fn update_substrate_texture(&mut self, scale: f32, file_name: &str, host: &mut dyn Host) {
        self.settings.substrate_scale.set_scalar(scale);
        let reload = file_name != self.settings.substrate_tex_filename;
        if reload {
            self.settings.substrate_tex_filename = file_name.to_owned();
        }

        let Some(quad) = self.graph.pass_by_name_mut(ADJUST_LOAD_PASS).and_then(RenderPass::as_quad_mut) else {
            warn!("Substrate texture not updated: '{ADJUST_LOAD_PASS}' is missing");
            return;
        };
        let shader = quad.shader_instance();
        let Some(texture) = quad.params_mut().texture_mut(SUBSTRATE_TEXTURE_PARAM) else {
            return;
        };
        texture.set_scale(scale);
        if reload {
            texture.load_texture(file_name, host);
        }
        if let Some(shader) = shader {
            texture.push_params(shader, host);
        }
    }

    /// Runs the active style's parameter computation.
    pub fn compute_style_parameters(&self, values: &BTreeMap<String, f32>) {
        let inputs = StyleInputs {
            values,
            schema: &self.schema,
            settings: &self.settings,
            effects: &self.effects,
        };
        self.settings.style.pipeline().compute_parameters(&inputs);
    }

    // ========================================================================
    // Queries and checked access
    // ========================================================================

    /// Names of every target, in registration order.
    #[must_use]
    pub fn render_targets(&self) -> Vec<String> {
        self.targets.names().map(str::to_owned).collect()
    }

    /// Names of every pass, in execution order.
    #[must_use]
    pub fn render_passes(&self) -> Vec<String> {
        self.graph.names()
    }

    pub fn pass_index(&self, name: &str) -> Result<usize> {
        self.graph.require_index(name)
    }

    pub fn pass(&self, name: &str) -> Result<&dyn RenderPass> {
        let index = self.graph.require_index(name)?;
        self.graph.pass(index).ok_or_else(|| BrushworkError::ResourceNotFound {
            kind: "render pass",
            name: name.to_owned(),
        })
    }

    pub fn pass_mut(&mut self, name: &str) -> Result<&mut (dyn RenderPass + 'static)> {
        let index = self.graph.require_index(name)?;
        self.graph.checked_mut(index)
    }

    /// Quad pass called `name`.
    pub fn quad_pass(&self, name: &str) -> Result<&QuadPass> {
        self.pass(name)?.as_quad().ok_or_else(|| BrushworkError::ResourceNotFound {
            kind: "quad pass",
            name: name.to_owned(),
        })
    }

    pub fn set_pass_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        let pass = self.graph.checked_mut(index)?;
        pass.set_enabled(enabled);
        debug!("Pass '{}' {}", pass.name(), if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    pub fn pass_enabled(&self, index: usize) -> Result<bool> {
        self.graph.pass(index).map(|p| p.enabled()).ok_or(BrushworkError::IndexOutOfRange {
            context: "render pass",
            index,
            len: self.graph.len(),
        })
    }

    /// Drops the shader instance of one quad pass, or of all of them.
    /// Returns how many instances were reset.
    pub fn reset_shader_instances(&mut self, index: Option<usize>, host: &mut dyn Host) -> Result<usize> {
        if let Some(index) = index {
            let pass = self.graph.checked_mut(index)?;
            return Ok(pass.as_quad_mut().map_or(0, |quad| {
                quad.reset_shader(host);
                1
            }));
        }
        let mut reset = 0;
        for quad in self.graph.iter_mut().filter_map(RenderPass::as_quad_mut) {
            quad.reset_shader(host);
            reset += 1;
        }
        info!("Reset {reset} shader instances");
        Ok(reset)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut EngineSettings {
        &mut self.settings
    }

    #[inline]
    #[must_use]
    pub fn effects(&self) -> &EffectParameters {
        &self.effects
    }

    #[inline]
    #[must_use]
    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    #[inline]
    #[must_use]
    pub fn graph(&self) -> &RenderGraph {
        &self.graph
    }

    #[inline]
    #[must_use]
    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Display name of the renderer.
    #[must_use]
    pub fn renderer_name(&self) -> &str {
        &self.config.renderer_name
    }

    #[inline]
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }

    #[inline]
    #[must_use]
    pub fn pending_rebuild(&self) -> bool {
        self.pending_rebuild
    }

    /// Frame context seen by the last successful update.
    #[must_use]
    pub fn last_frame(&self) -> Option<&FrameContext> {
        self.frame.as_ref()
    }

    /// Title line of the HUD pass.
    #[must_use]
    pub fn hud_title(&self) -> Option<String> {
        let pass = self.graph.pass_by_name(HUD_PASS_NAME)?;
        pass.as_hud().map(|hud| hud.title().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substrate_uv_offset_is_deterministic() {
        let a = substrate_uv_offset(250.0);
        let b = substrate_uv_offset(250.0);
        assert_eq!(a, b);
        let s = 250.0f64.sin();
        assert!((f64::from(a[0]) - (s * 0.5453).fract()).abs() < 1e-6);
        assert!((f64::from(a[1]) - (s * 0.8317).fract()).abs() < 1e-6);
    }

    #[test]
    fn test_scaled_never_collapses_to_zero() {
        assert_eq!(scaled(1280, 0.5), 640);
        assert_eq!(scaled(1, 0.5), 1);
        assert_eq!(scaled(801, 2.0), 1602);
    }
}
