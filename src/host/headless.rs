//! Headless Host
//!
//! An in-memory [`Host`](super::Host) that allocates nothing on a GPU and
//! records every call instead. Handles are plain counters; targets, textures,
//! samplers and shader instances live in maps until released, so leaks show
//! up as entries that never go away.
//!
//! Failures can be scripted per name:
//!
//! ```rust,ignore
//! let mut host = HeadlessHost::new();
//! host.fail_shader("quadAA");          // file or technique
//! host.fail_target("velocity");        // target name
//! host.fail_texture("missing.png");    // file name
//! host.fail_target_updates(true);      // every batched update
//! ```
//!
//! Targets are checked against the default wgpu limits, so a description
//! no device could allocate fails here too.
//!
//! Textures are sized from the file header via `image::image_dimensions`.
//! Files that only need to exist for the sake of a test can be registered
//! with [`HeadlessHost::add_virtual_texture`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3, Vec4};
use log::trace;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{
    ClearMask, DrawSink, FrameContext, HudText, ParamValue, SceneAccess, SceneDrawRequest, SceneFilter, ShaderManager,
    TargetManager, TextureInfo, TextureManager,
};
use crate::errors::{BrushworkError, Result};
use crate::renderer::core::{MeshId, SamplerHandle, ShaderHandle, TargetHandle, TextureHandle};
use crate::renderer::graph::params::SamplerStateDesc;
use crate::renderer::graph::passes::quad::ShaderSource;
use crate::renderer::graph::targets::RenderTargetDescriptor;

/// An owned copy of a [`ParamValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedParam {
    Float(Vec<f32>),
    Array(Vec<f32>),
    Matrix(Mat4),
    Target(Option<TargetHandle>),
    Texture(Option<TextureHandle>),
    Sampler(SamplerHandle),
}

impl From<ParamValue<'_>> for RecordedParam {
    fn from(value: ParamValue<'_>) -> Self {
        match value {
            ParamValue::Float(v) => Self::Float(v.to_vec()),
            ParamValue::Array(v) => Self::Array(v.to_vec()),
            ParamValue::Matrix(m) => Self::Matrix(m),
            ParamValue::Target(t) => Self::Target(t),
            ParamValue::Texture(t) => Self::Texture(t),
            ParamValue::Sampler(s) => Self::Sampler(s),
        }
    }
}

/// One recorded draw submission.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Scene {
        pass: String,
        filter: SceneFilter,
        clear: ClearMask,
        targets: Vec<Option<TargetHandle>>,
    },
    Quad {
        shader: ShaderHandle,
        clear: ClearMask,
        targets: Vec<Option<TargetHandle>>,
    },
    Hud {
        items: Vec<HudText>,
        targets: Vec<Option<TargetHandle>>,
    },
    Present {
        color: Option<TargetHandle>,
        depth: Option<TargetHandle>,
    },
}

/// A scene mesh as seen by the velocity pass.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMesh {
    pub world: Mat4,
    pub points: Vec<Vec3>,
    pub matrix_attributes: FxHashMap<String, Mat4>,
    pub color_sets: FxHashMap<String, Vec<Vec4>>,
}

impl HeadlessMesh {
    #[must_use]
    pub fn new(world: Mat4, points: Vec<Vec3>) -> Self {
        Self {
            world,
            points,
            ..Self::default()
        }
    }
}

/// Recording host for tests, benchmarks and offline runs.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    next_id: u64,
    frame: Option<FrameContext>,

    shader_paths: Vec<PathBuf>,
    targets: FxHashMap<TargetHandle, RenderTargetDescriptor>,
    textures: FxHashMap<TextureHandle, PathBuf>,
    samplers: FxHashMap<SamplerHandle, wgpu::SamplerDescriptor<'static>>,
    shaders: FxHashMap<ShaderHandle, ShaderSource>,
    parameters: FxHashMap<ShaderHandle, BTreeMap<String, RecordedParam>>,

    virtual_textures: FxHashMap<String, TextureInfo>,
    failing_shaders: FxHashSet<String>,
    failing_targets: FxHashSet<String>,
    failing_textures: FxHashSet<String>,
    failing_target_updates: bool,

    meshes: BTreeMap<MeshId, HeadlessMesh>,

    /// Every batched target update, in call order.
    pub target_batches: Vec<Vec<(TargetHandle, RenderTargetDescriptor)>>,
    pub draws: Vec<DrawCall>,
    pub compiles: usize,
    pub evictions: usize,
    pub config_node_registered: bool,
}

impl HeadlessHost {
    /// A host reporting a default 1280x720 frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame: Some(FrameContext::default()),
            ..Self::default()
        }
    }

    fn next_raw(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // ========================================================================
    // Scripting
    // ========================================================================

    /// Replaces the frame context; `None` makes frame setup fail.
    pub fn set_frame(&mut self, frame: Option<FrameContext>) {
        self.frame = frame;
    }

    /// Mutable access to the current frame context, if any.
    pub fn frame_mut(&mut self) -> Option<&mut FrameContext> {
        self.frame.as_mut()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if let Some(frame) = &mut self.frame {
            frame.viewport_width = width;
            frame.viewport_height = height;
        }
    }

    /// Makes every shader whose file or technique is `name` fail to compile.
    pub fn fail_shader(&mut self, name: &str) {
        self.failing_shaders.insert(name.to_owned());
    }

    pub fn fail_target(&mut self, name: &str) {
        self.failing_targets.insert(name.to_owned());
    }

    /// Lets the named target allocate again.
    pub fn heal_target(&mut self, name: &str) {
        self.failing_targets.remove(name);
    }

    /// Makes every batched target update fail until called with `false`.
    pub fn fail_target_updates(&mut self, fail: bool) {
        self.failing_target_updates = fail;
    }

    pub fn fail_texture(&mut self, file_name: &str) {
        self.failing_textures.insert(file_name.to_owned());
    }

    /// Serves `file_name` from any directory without touching the disk.
    pub fn add_virtual_texture(&mut self, file_name: &str, width: u32, height: u32) {
        self.virtual_textures
            .insert(file_name.to_owned(), TextureInfo { width, height });
    }

    pub fn add_mesh(&mut self, mesh: HeadlessMesh) -> MeshId {
        let id = MeshId::from_raw(self.next_raw());
        self.meshes.insert(id, mesh);
        id
    }

    #[must_use]
    pub fn mesh(&self, id: MeshId) -> Option<&HeadlessMesh> {
        self.meshes.get(&id)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut HeadlessMesh> {
        self.meshes.get_mut(&id)
    }

    /// Forgets recorded draws and target batches.
    pub fn clear_log(&mut self) {
        self.draws.clear();
        self.target_batches.clear();
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    #[must_use]
    pub fn shader_paths(&self) -> &[PathBuf] {
        &self.shader_paths
    }

    #[must_use]
    pub fn live_targets(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn target_desc(&self, handle: TargetHandle) -> Option<&RenderTargetDescriptor> {
        self.targets.get(&handle)
    }

    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    pub fn texture_path(&self, handle: TextureHandle) -> Option<&Path> {
        self.textures.get(&handle).map(PathBuf::as_path)
    }

    #[must_use]
    pub fn live_samplers(&self) -> usize {
        self.samplers.len()
    }

    /// The wgpu description a sampler was created from.
    #[must_use]
    pub fn sampler_desc(&self, handle: SamplerHandle) -> Option<&wgpu::SamplerDescriptor<'static>> {
        self.samplers.get(&handle)
    }

    #[must_use]
    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    #[must_use]
    pub fn shader_source(&self, shader: ShaderHandle) -> Option<&ShaderSource> {
        self.shaders.get(&shader)
    }

    /// Last value pushed to `name` on `shader`.
    #[must_use]
    pub fn parameter(&self, shader: ShaderHandle, name: &str) -> Option<&RecordedParam> {
        self.parameters.get(&shader)?.get(name)
    }

    /// Every parameter pushed to `shader`, by name.
    #[must_use]
    pub fn parameters(&self, shader: ShaderHandle) -> Option<&BTreeMap<String, RecordedParam>> {
        self.parameters.get(&shader)
    }

    /// Quad draws, in submission order.
    pub fn quad_draws(&self) -> impl Iterator<Item = (ShaderHandle, &[Option<TargetHandle>])> {
        self.draws.iter().filter_map(|call| match call {
            DrawCall::Quad { shader, targets, .. } => Some((*shader, targets.as_slice())),
            _ => None,
        })
    }

    /// Scene draws, by pass name, in submission order.
    pub fn scene_draws(&self) -> impl Iterator<Item = &str> {
        self.draws.iter().filter_map(|call| match call {
            DrawCall::Scene { pass, .. } => Some(pass.as_str()),
            _ => None,
        })
    }
}

// ============================================================================
// Host seams
// ============================================================================

/// Rejects descriptions beyond the default wgpu texture limits.
fn check_target_limits(desc: &RenderTargetDescriptor) -> Result<()> {
    let texture = desc.texture_descriptor();
    let limits = wgpu::Limits::default();
    let size = texture.size;
    if size.width > limits.max_texture_dimension_2d
        || size.height > limits.max_texture_dimension_2d
        || size.depth_or_array_layers > limits.max_texture_array_layers
    {
        trace!("Headless: target '{}' exceeds limits ({size:?})", desc.name);
        return Err(BrushworkError::ResourceAllocation {
            kind: "render target",
            name: desc.name.clone(),
        });
    }
    Ok(())
}

impl TargetManager for HeadlessHost {
    fn acquire_target(&mut self, desc: &RenderTargetDescriptor) -> Result<TargetHandle> {
        if self.failing_targets.contains(&desc.name) {
            return Err(BrushworkError::ResourceAllocation {
                kind: "render target",
                name: desc.name.clone(),
            });
        }
        check_target_limits(desc)?;
        let handle = TargetHandle::from_raw(self.next_raw());
        self.targets.insert(handle, desc.clone());
        Ok(handle)
    }

    fn update_targets(&mut self, batch: &[(TargetHandle, &RenderTargetDescriptor)]) -> Result<()> {
        if let Some((handle, _)) = batch.iter().find(|(handle, _)| !self.targets.contains_key(handle)) {
            return Err(BrushworkError::ResourceNotFound {
                kind: "render target",
                name: handle.to_string(),
            });
        }
        if self.failing_target_updates {
            return Err(BrushworkError::ResourceAllocation {
                kind: "render target batch",
                name: format!("{} targets", batch.len()),
            });
        }
        for (_, desc) in batch {
            check_target_limits(desc)?;
        }
        let mut record = Vec::with_capacity(batch.len());
        for &(handle, desc) in batch {
            self.targets.insert(handle, desc.clone());
            record.push((handle, desc.clone()));
        }
        trace!("Headless: {} targets updated", record.len());
        self.target_batches.push(record);
        Ok(())
    }

    fn release_target(&mut self, handle: TargetHandle) {
        self.targets.remove(&handle);
    }
}

impl TextureManager for HeadlessHost {
    fn acquire_texture(&mut self, path: &Path) -> Result<(TextureHandle, TextureInfo)> {
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failing_textures.contains(&file_name) {
            return Err(BrushworkError::ResourceAllocation {
                kind: "texture",
                name: path.display().to_string(),
            });
        }
        let info = match self.virtual_textures.get(&file_name) {
            Some(info) => *info,
            None => {
                let (width, height) = image::image_dimensions(path)?;
                TextureInfo { width, height }
            }
        };
        let handle = TextureHandle::from_raw(self.next_raw());
        self.textures.insert(handle, path.to_path_buf());
        Ok((handle, info))
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        self.textures.remove(&handle);
    }
}

impl ShaderManager for HeadlessHost {
    fn add_shader_path(&mut self, path: &Path) -> bool {
        if self.shader_paths.iter().any(|p| p == path) {
            return false;
        }
        self.shader_paths.push(path.to_path_buf());
        true
    }

    fn compile_shader(&mut self, source: &ShaderSource) -> Result<ShaderHandle> {
        if self.failing_shaders.contains(&source.file) || self.failing_shaders.contains(&source.technique) {
            return Err(BrushworkError::ResourceAllocation {
                kind: "shader instance",
                name: source.to_string(),
            });
        }
        let handle = ShaderHandle::from_raw(self.next_raw());
        self.shaders.insert(handle, source.clone());
        self.compiles += 1;
        Ok(handle)
    }

    fn evict_shader(&mut self, _source: &ShaderSource, shader: ShaderHandle) {
        self.shaders.remove(&shader);
        self.parameters.remove(&shader);
        self.evictions += 1;
    }

    fn set_parameter(&mut self, shader: ShaderHandle, name: &str, value: ParamValue<'_>) -> bool {
        if !self.shaders.contains_key(&shader) {
            return false;
        }
        self.parameters
            .entry(shader)
            .or_default()
            .insert(name.to_owned(), value.into());
        true
    }

    fn acquire_sampler(&mut self, desc: &SamplerStateDesc) -> Result<SamplerHandle> {
        let handle = SamplerHandle::from_raw(self.next_raw());
        self.samplers.insert(handle, desc.sampler_descriptor(None));
        Ok(handle)
    }

    fn release_sampler(&mut self, sampler: SamplerHandle) {
        self.samplers.remove(&sampler);
    }
}

impl SceneAccess for HeadlessHost {
    fn meshes(&self) -> Vec<MeshId> {
        self.meshes.keys().copied().collect()
    }

    fn world_matrix(&self, mesh: MeshId) -> Option<Mat4> {
        self.meshes.get(&mesh).map(|m| m.world)
    }

    fn points(&self, mesh: MeshId) -> Vec<Vec3> {
        self.meshes.get(&mesh).map(|m| m.points.clone()).unwrap_or_default()
    }

    fn matrix_attribute(&self, mesh: MeshId, name: &str) -> Option<Mat4> {
        self.meshes.get(&mesh)?.matrix_attributes.get(name).copied()
    }

    fn set_matrix_attribute(&mut self, mesh: MeshId, name: &str, value: Mat4) {
        if let Some(m) = self.meshes.get_mut(&mesh) {
            m.matrix_attributes.insert(name.to_owned(), value);
        }
    }

    fn color_set(&self, mesh: MeshId, name: &str) -> Option<Vec<Vec4>> {
        self.meshes.get(&mesh)?.color_sets.get(name).cloned()
    }

    fn set_color_set(&mut self, mesh: MeshId, name: &str, colors: Vec<Vec4>) {
        if let Some(m) = self.meshes.get_mut(&mesh) {
            m.color_sets.insert(name.to_owned(), colors);
        }
    }
}

impl DrawSink for HeadlessHost {
    fn frame_context(&mut self) -> Option<FrameContext> {
        self.frame.clone()
    }

    fn draw_scene(&mut self, request: &SceneDrawRequest<'_>) {
        self.draws.push(DrawCall::Scene {
            pass: request.pass.to_owned(),
            filter: request.filter,
            clear: request.clear,
            targets: request.targets.to_vec(),
        });
    }

    fn draw_quad(&mut self, shader: ShaderHandle, targets: &[Option<TargetHandle>], clear: ClearMask) {
        self.draws.push(DrawCall::Quad {
            shader,
            clear,
            targets: targets.to_vec(),
        });
    }

    fn draw_hud(&mut self, items: &[HudText], targets: &[Option<TargetHandle>]) {
        self.draws.push(DrawCall::Hud {
            items: items.to_vec(),
            targets: targets.to_vec(),
        });
    }

    fn present(&mut self, color: Option<TargetHandle>, depth: Option<TargetHandle>) {
        self.draws.push(DrawCall::Present { color, depth });
    }

    fn set_config_node_registered(&mut self, registered: bool) -> bool {
        let changed = self.config_node_registered != registered;
        self.config_node_registered = registered;
        changed
    }
}
