//! Shader Parameter Binding
//!
//! A [`ShaderParameterSet`] is the list of everything a quad pass feeds into
//! its shader instance: scalar and array floats, matrices, render targets,
//! file textures and sampler states.
//!
//! Float and matrix entries hold [`Shared`] sources, usually clones of the
//! engine settings or effect parameters. [`ShaderParameterSet::push_all`]
//! reads every source and sets it on the shader each frame; there is no
//! dirty tracking, the set is always pushed whole.
//!
//! Samplers and textures are different: they are bound once, when added or
//! when the shader instance is (re)compiled, through
//! [`ShaderParameterSet::bind_static`]. Textures are also re-pushed every
//! frame because their UV offset can animate.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{error, trace, warn};
use rustc_hash::FxHashMap;

use super::quad_texture::QuadTexture;
use super::targets::TargetRegistry;
use crate::errors::{BrushworkError, Result};
use crate::host::{ParamValue, ShaderManager, TextureManager};
use crate::renderer::core::{FloatParam, MatrixParam, SamplerHandle, ShaderHandle, TargetHandle};

// ─── Sampler states ────────────────────────────────────────────────────────

/// Address and filter mode of a sampler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerStateDesc {
    pub address_mode: wgpu::AddressMode,
    pub filter: wgpu::FilterMode,
}

impl SamplerStateDesc {
    pub const CLAMP_POINT: Self = Self::new(wgpu::AddressMode::ClampToEdge, wgpu::FilterMode::Nearest);
    pub const CLAMP_LINEAR: Self = Self::new(wgpu::AddressMode::ClampToEdge, wgpu::FilterMode::Linear);
    pub const MIRROR_POINT: Self = Self::new(wgpu::AddressMode::MirrorRepeat, wgpu::FilterMode::Nearest);

    #[must_use]
    pub const fn new(address_mode: wgpu::AddressMode, filter: wgpu::FilterMode) -> Self {
        Self { address_mode, filter }
    }

    /// The equivalent wgpu sampler description (min, mag and mip share the filter).
    #[must_use]
    pub fn sampler_descriptor<'a>(&self, label: Option<&'a str>) -> wgpu::SamplerDescriptor<'a> {
        let mipmap_filter = match self.filter {
            wgpu::FilterMode::Nearest => wgpu::MipmapFilterMode::Nearest,
            wgpu::FilterMode::Linear => wgpu::MipmapFilterMode::Linear,
        };
        wgpu::SamplerDescriptor {
            label,
            address_mode_u: self.address_mode,
            address_mode_v: self.address_mode,
            address_mode_w: self.address_mode,
            mag_filter: self.filter,
            min_filter: self.filter,
            mipmap_filter,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
struct SamplerBinding {
    desc: SamplerStateDesc,
    handle: Option<SamplerHandle>,
}

// ─── Target references ─────────────────────────────────────────────────────

/// A target parameter: the captured handle plus, when bound by name, the
/// name to re-resolve it from.
#[derive(Debug, Clone)]
struct TargetRef {
    source: Option<String>,
    handle: Option<TargetHandle>,
}

// ─── Parameter set ─────────────────────────────────────────────────────────

/// Named parameter bindings of one shader instance.
#[derive(Debug, Default)]
pub struct ShaderParameterSet {
    scalars: BTreeMap<String, FloatParam>,
    arrays: BTreeMap<String, FloatParam>,
    matrices: BTreeMap<String, MatrixParam>,
    targets: BTreeMap<String, TargetRef>,
    textures: BTreeMap<String, QuadTexture>,
    samplers: BTreeMap<String, SamplerBinding>,
    pushed_versions: FxHashMap<String, u64>,
}

impl ShaderParameterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Aliased values ────────────────────────────────────────────────

    /// Binds a float vector; later writes to `source` are picked up on push.
    pub fn add_scalar(&mut self, name: &str, source: &FloatParam) {
        self.scalars.insert(name.to_owned(), source.clone());
    }

    /// Binds a variable-length float array.
    pub fn add_array(&mut self, name: &str, source: &FloatParam) {
        self.arrays.insert(name.to_owned(), source.clone());
    }

    pub fn add_matrix(&mut self, name: &str, source: &MatrixParam) {
        self.matrices.insert(name.to_owned(), source.clone());
    }

    /// Binds a value owned by this set alone.
    pub fn add_constant(&mut self, name: &str, values: &[f32]) {
        self.scalars.insert(name.to_owned(), FloatParam::floats(values));
    }

    // ─── Targets ───────────────────────────────────────────────────────

    /// Binds a target handle directly. The handle is not re-resolved by
    /// [`rebind_targets`](Self::rebind_targets).
    pub fn add_target_ref(&mut self, name: &str, handle: Option<TargetHandle>) {
        self.targets.insert(name.to_owned(), TargetRef { source: None, handle });
    }

    /// Binds the target currently registered as `target`.
    pub fn add_target(&mut self, name: &str, registry: &TargetRegistry, target: &str) {
        let handle = registry.target_by_name(target);
        self.targets.insert(
            name.to_owned(),
            TargetRef {
                source: Some(target.to_owned()),
                handle,
            },
        );
    }

    /// Re-resolves every name-bound target against `registry`.
    pub fn rebind_targets(&mut self, registry: &TargetRegistry) -> usize {
        let mut rebound = 0;
        for target in self.targets.values_mut() {
            if let Some(source) = &target.source {
                target.handle = registry.target_by_name(source);
                rebound += 1;
            }
        }
        rebound
    }

    #[must_use]
    pub fn target(&self, name: &str) -> Option<TargetHandle> {
        self.targets.get(name).and_then(|t| t.handle)
    }

    /// The registry name a target parameter was bound from.
    #[must_use]
    pub fn target_source(&self, name: &str) -> Option<&str> {
        self.targets.get(name).and_then(|t| t.source.as_deref())
    }

    // ─── Textures & samplers ───────────────────────────────────────────

    /// Loads `file_name` from `directory` as texture parameter `name` and,
    /// if a shader instance is bound, pushes its four parameters right away.
    pub fn add_texture<H: ShaderManager + TextureManager + ?Sized>(
        &mut self,
        name: &str,
        directory: impl Into<PathBuf>,
        file_name: &str,
        shader: Option<ShaderHandle>,
        host: &mut H,
    ) -> &mut QuadTexture {
        if let Some(mut previous) = self.textures.remove(name) {
            previous.release(host);
        }
        let texture = QuadTexture::new(name, directory, file_name, host);
        if let Some(shader) = shader {
            texture.push_params(shader, host);
        }
        self.textures.entry(name.to_owned()).or_insert(texture)
    }

    #[must_use]
    pub fn texture(&self, name: &str) -> Option<&QuadTexture> {
        self.textures.get(name)
    }

    pub fn texture_mut(&mut self, name: &str) -> Option<&mut QuadTexture> {
        self.textures.get_mut(name)
    }

    /// Acquires a sampler and binds it immediately when a shader is present.
    ///
    /// Without a shader the sampler is kept and bound on the next
    /// [`bind_static`](Self::bind_static).
    pub fn add_sampler_state<H: ShaderManager + ?Sized>(
        &mut self,
        name: &str,
        desc: SamplerStateDesc,
        shader: Option<ShaderHandle>,
        host: &mut H,
    ) -> bool {
        if let Some(previous) = self.samplers.remove(name).and_then(|s| s.handle) {
            host.release_sampler(previous);
        }
        let handle = match host.acquire_sampler(&desc) {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("Sampler '{name}' could not be created: {e}");
                None
            }
        };
        let bound = match (shader, handle) {
            (Some(shader), Some(handle)) => host.set_parameter(shader, name, ParamValue::Sampler(handle)),
            (None, Some(_)) => {
                trace!("Sampler '{name}' deferred until a shader instance exists");
                false
            }
            _ => false,
        };
        self.samplers.insert(name.to_owned(), SamplerBinding { desc, handle });
        bound
    }

    #[must_use]
    pub fn sampler(&self, name: &str) -> Option<SamplerHandle> {
        self.samplers.get(name).and_then(|s| s.handle)
    }

    #[must_use]
    pub fn sampler_state(&self, name: &str) -> Option<SamplerStateDesc> {
        self.samplers.get(name).map(|s| s.desc)
    }

    /// Binds samplers and textures to a freshly compiled shader instance.
    pub fn bind_static<H: ShaderManager + ?Sized>(&self, shader: ShaderHandle, host: &mut H) -> usize {
        let mut bound = 0;
        for (name, sampler) in &self.samplers {
            if let Some(handle) = sampler.handle
                && host.set_parameter(shader, name, ParamValue::Sampler(handle))
            {
                bound += 1;
            }
        }
        for texture in self.textures.values() {
            bound += texture.push_params(shader, host);
        }
        bound
    }

    // ─── Pushing ───────────────────────────────────────────────────────

    /// Sets every float, array, matrix, target and texture entry on `shader`.
    ///
    /// Returns the number of parameters the shader accepted. Without a
    /// shader instance nothing is pushed and [`BrushworkError::NullParameterTarget`]
    /// is returned for the caller to log.
    pub fn push_all<H: ShaderManager + ?Sized>(
        &mut self,
        pass: &str,
        shader: Option<ShaderHandle>,
        host: &mut H,
    ) -> Result<usize> {
        let Some(shader) = shader else {
            return Err(BrushworkError::NullParameterTarget {
                pass: pass.to_owned(),
                parameters: self.len(),
            });
        };

        let mut accepted = 0usize;
        let mut accept = |ok: bool| accepted += usize::from(ok);

        for (name, source) in &self.scalars {
            accept(host.set_parameter(shader, name, ParamValue::Float(&source.read())));
            self.pushed_versions.insert(name.clone(), source.version());
        }
        for (name, source) in &self.arrays {
            accept(host.set_parameter(shader, name, ParamValue::Array(&source.read())));
            self.pushed_versions.insert(name.clone(), source.version());
        }
        for (name, source) in &self.matrices {
            accept(host.set_parameter(shader, name, ParamValue::Matrix(*source.read())));
            self.pushed_versions.insert(name.clone(), source.version());
        }
        for (name, target) in &self.targets {
            if target.handle.is_none() {
                warn!("Pass '{pass}': target parameter '{name}' is null");
            }
            accept(host.set_parameter(shader, name, ParamValue::Target(target.handle)));
        }
        for texture in self.textures.values() {
            accepted += texture.push_params(shader, host);
        }

        trace!("Pass '{pass}': pushed {accepted} parameters");
        Ok(accepted)
    }

    /// Aliased entries whose source changed since the last push.
    #[must_use]
    pub fn stale_parameters(&self) -> Vec<&str> {
        let versioned = self
            .scalars
            .iter()
            .chain(self.arrays.iter())
            .map(|(name, source)| (name, source.version()))
            .chain(self.matrices.iter().map(|(name, source)| (name, source.version())));

        versioned
            .filter(|(name, version)| self.pushed_versions.get(name.as_str()) != Some(version))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Number of bound parameters of every kind.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scalars.len()
            + self.arrays.len()
            + self.matrices.len()
            + self.targets.len()
            + self.textures.len()
            + self.samplers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<&FloatParam> {
        self.scalars.get(name)
    }

    #[must_use]
    pub fn array(&self, name: &str) -> Option<&FloatParam> {
        self.arrays.get(name)
    }

    #[must_use]
    pub fn matrix(&self, name: &str) -> Option<&MatrixParam> {
        self.matrices.get(name)
    }

    /// Releases textures and samplers owned by this set.
    pub fn release<H: ShaderManager + TextureManager + ?Sized>(&mut self, host: &mut H) {
        for texture in self.textures.values_mut() {
            texture.release(host);
        }
        for handle in self.samplers.values_mut().filter_map(|s| s.handle.take()) {
            host.release_sampler(handle);
        }
        self.textures.clear();
        self.samplers.clear();
        self.pushed_versions.clear();
    }
}
