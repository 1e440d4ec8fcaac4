//! Host Integration
//!
//! The graph drives a host application's viewport renderer but owns none of
//! its machinery. Everything the graph needs from the outside world goes
//! through the traits in this module:
//!
//! | Trait              | Responsibility                                        |
//! |--------------------|-------------------------------------------------------|
//! | [`TargetManager`]  | Allocate, resize-in-place and release render targets  |
//! | [`TextureManager`] | Load and release file textures                        |
//! | [`ShaderManager`]  | Compile shader instances, set parameters, samplers    |
//! | [`SceneAccess`]    | Mesh matrices, points and per-vertex color sets       |
//! | [`DrawSink`]       | Frame context and the actual draw submissions         |
//!
//! [`Host`] is the blanket union of all five and is what the pipeline takes.
//! [`headless::HeadlessHost`] is an in-memory implementation that records
//! every call; tests, benches and the demo run against it.

pub mod headless;

use std::path::Path;

use bitflags::bitflags;
use glam::{Mat4, Vec3, Vec4};

use crate::errors::Result;
use crate::renderer::core::{MeshId, SamplerHandle, ShaderHandle, TargetHandle, TextureHandle};
use crate::renderer::graph::params::SamplerStateDesc;
use crate::renderer::graph::passes::quad::ShaderSource;
use crate::renderer::graph::targets::RenderTargetDescriptor;

// ============================================================================
// Draw vocabulary
// ============================================================================

bitflags! {
    /// Which attachments a pass clears before drawing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u8 {
        const COLOR   = 1 << 0;
        const DEPTH   = 1 << 1;
        const STENCIL = 1 << 2;
        const ALL = Self::COLOR.bits() | Self::DEPTH.bits() | Self::STENCIL.bits();
    }
}

/// Which subset of the scene a scene pass asks the host to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneFilter {
    /// Shaded geometry (the G-buffer pass).
    ShadedItems,
    /// Manipulators, grids and other UI drawables.
    UiItems,
}

/// Display-mode override requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    ShadedTextured,
}

/// Lighting-mode override requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightingMode {
    NoLighting,
}

/// One scene draw, as handed to [`DrawSink::draw_scene`].
#[derive(Debug, Clone)]
pub struct SceneDrawRequest<'a> {
    pub pass: &'a str,
    pub filter: SceneFilter,
    pub display_mode: Option<DisplayMode>,
    pub lighting_mode: Option<LightingMode>,
    pub shadows: Option<bool>,
    pub post_effects: bool,
    pub clear: ClearMask,
    pub clear_color: wgpu::Color,
    pub clear_depth: f32,
    pub targets: &'a [Option<TargetHandle>],
}

/// A 2D text overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct HudText {
    pub text: String,
    /// Viewport-space position in pixels, origin bottom-left.
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Per-frame information read from the host at the start of `update()`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub sample_count: u32,
    /// Whether the host applies its own gamma correction.
    pub gamma_correction: bool,
    pub view_projection: Mat4,
    /// Wall clock, used to seed the noise parameters.
    pub wall_clock_ms: f64,
    /// Animation timeline position, used for substrate animation.
    pub timeline_ms: f64,
    /// Name of the graphics API backing the viewport.
    pub api_name: String,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,
            sample_count: 1,
            gamma_correction: true,
            view_projection: Mat4::IDENTITY,
            wall_clock_ms: 0.0,
            timeline_ms: 0.0,
            api_name: String::from("wgpu"),
        }
    }
}

/// Dimensions reported for a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
}

/// A value handed to [`ShaderManager::set_parameter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue<'a> {
    Float(&'a [f32]),
    Array(&'a [f32]),
    Matrix(Mat4),
    Target(Option<TargetHandle>),
    Texture(Option<TextureHandle>),
    Sampler(SamplerHandle),
}

// ============================================================================
// Host seams
// ============================================================================

pub trait TargetManager {
    fn acquire_target(&mut self, desc: &RenderTargetDescriptor) -> Result<TargetHandle>;

    /// Pushes changed descriptions into existing targets, all in one call.
    /// Handles stay valid; only the backing storage is reallocated.
    fn update_targets(&mut self, batch: &[(TargetHandle, &RenderTargetDescriptor)]) -> Result<()>;

    fn release_target(&mut self, handle: TargetHandle);
}

pub trait TextureManager {
    fn acquire_texture(&mut self, path: &Path) -> Result<(TextureHandle, TextureInfo)>;
    fn release_texture(&mut self, handle: TextureHandle);
}

pub trait ShaderManager {
    /// Registers a shader search path. Returns `false` if it was already known.
    fn add_shader_path(&mut self, path: &Path) -> bool;

    fn compile_shader(&mut self, source: &ShaderSource) -> Result<ShaderHandle>;

    /// Releases an instance and drops the compiled effect from the host cache
    /// so the next compile re-reads the source.
    fn evict_shader(&mut self, source: &ShaderSource, shader: ShaderHandle);

    /// Returns `false` when the shader has no parameter called `name`.
    fn set_parameter(&mut self, shader: ShaderHandle, name: &str, value: ParamValue<'_>) -> bool;

    fn acquire_sampler(&mut self, desc: &SamplerStateDesc) -> Result<SamplerHandle>;
    fn release_sampler(&mut self, sampler: SamplerHandle);
}

pub trait SceneAccess {
    fn meshes(&self) -> Vec<MeshId>;
    fn world_matrix(&self, mesh: MeshId) -> Option<Mat4>;
    fn points(&self, mesh: MeshId) -> Vec<Vec3>;
    fn matrix_attribute(&self, mesh: MeshId, name: &str) -> Option<Mat4>;
    fn set_matrix_attribute(&mut self, mesh: MeshId, name: &str, value: Mat4);
    fn color_set(&self, mesh: MeshId, name: &str) -> Option<Vec<Vec4>>;
    fn set_color_set(&mut self, mesh: MeshId, name: &str, colors: Vec<Vec4>);
}

pub trait DrawSink {
    /// `None` when the host renderer is not ready this frame.
    fn frame_context(&mut self) -> Option<FrameContext>;

    fn draw_scene(&mut self, request: &SceneDrawRequest<'_>);
    fn draw_quad(&mut self, shader: ShaderHandle, targets: &[Option<TargetHandle>], clear: ClearMask);
    fn draw_hud(&mut self, items: &[HudText], targets: &[Option<TargetHandle>]);
    fn present(&mut self, color: Option<TargetHandle>, depth: Option<TargetHandle>);

    /// Registers or removes the configuration node type. Returns whether the
    /// registration state changed.
    fn set_config_node_registered(&mut self, registered: bool) -> bool;
}

/// Everything the pipeline needs from its host.
pub trait Host: TargetManager + TextureManager + ShaderManager + SceneAccess + DrawSink {}

impl<T> Host for T where T: TargetManager + TextureManager + ShaderManager + SceneAccess + DrawSink + ?Sized {}
