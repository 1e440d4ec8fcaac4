//! Full-Screen Quad Pass
//!
//! A [`QuadPass`] draws one full-screen triangle with a shader instance the
//! host compiles from a [`ShaderSource`] (file + technique). The instance is
//! created lazily on first use and can be reset at any time to force a
//! recompile, e.g. after the shader source was edited on disk.
//!
//! Each frame the pass:
//!
//! 1. compiles the shader if needed, binding samplers and textures once;
//! 2. pushes its whole [`ShaderParameterSet`];
//! 3. looks its outputs up in the [`TargetRegistry`] by pass name;
//! 4. asks the host to draw.
//!
//! A failed compile is retried on the next frame; until then the pass draws
//! nothing.

use std::fmt;

use log::{debug, error, trace, warn};

use crate::host::{ClearMask, Host, ShaderManager, TextureManager};
use crate::renderer::core::{ShaderHandle, TargetHandle};
use crate::renderer::graph::params::ShaderParameterSet;
use crate::renderer::graph::pass::{PassContext, PassKind, PassState, RenderPass};
use crate::renderer::graph::targets::TargetRegistry;

/// A shader file plus the technique to compile from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderSource {
    pub subdir: Option<String>,
    pub file: String,
    pub technique: String,
}

impl ShaderSource {
    #[must_use]
    pub fn new(file: impl Into<String>, technique: impl Into<String>) -> Self {
        Self {
            subdir: None,
            file: file.into(),
            technique: technique.into(),
        }
    }

    /// A shader that lives in a style-specific subdirectory.
    #[must_use]
    pub fn in_subdir(subdir: impl Into<String>, file: impl Into<String>, technique: impl Into<String>) -> Self {
        Self {
            subdir: Some(subdir.into()),
            file: file.into(),
            technique: technique.into(),
        }
    }

    /// `subdir/file`, or just `file`.
    #[must_use]
    pub fn shader_name(&self) -> String {
        match &self.subdir {
            Some(dir) => format!("{dir}/{}", self.file),
            None => self.file.clone(),
        }
    }
}

impl fmt::Display for ShaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.shader_name(), self.technique)
    }
}

/// Full-screen post-processing / compositing pass.
#[derive(Debug)]
pub struct QuadPass {
    name: String,
    enabled: bool,
    state: PassState,
    clear: ClearMask,
    source: ShaderSource,
    params: ShaderParameterSet,
    shader: Option<ShaderHandle>,
    compile_failed: bool,
}

impl QuadPass {
    #[must_use]
    pub fn new(name: impl Into<String>, source: ShaderSource, clear: ClearMask) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            state: PassState::Uninitialized,
            clear,
            source,
            params: ShaderParameterSet::new(),
            shader: None,
            compile_failed: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &ShaderSource {
        &self.source
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &ShaderParameterSet {
        &self.params
    }

    #[inline]
    pub fn params_mut(&mut self) -> &mut ShaderParameterSet {
        &mut self.params
    }

    #[inline]
    #[must_use]
    pub fn clear_mask(&self) -> ClearMask {
        self.clear
    }

    /// The current shader instance, without compiling.
    #[inline]
    #[must_use]
    pub fn shader_instance(&self) -> Option<ShaderHandle> {
        self.shader
    }

    /// Compiles the shader instance if needed, pushes every parameter and
    /// returns the instance. `None` when compilation failed.
    pub fn shader<H: ShaderManager + ?Sized>(&mut self, host: &mut H) -> Option<ShaderHandle> {
        if self.shader.is_none() {
            match host.compile_shader(&self.source) {
                Ok(shader) => {
                    debug!("Pass '{}': compiled {}", self.name, self.source);
                    self.shader = Some(shader);
                    self.state = PassState::ShaderCompiled;
                    self.compile_failed = false;
                    self.params.bind_static(shader, host);
                }
                Err(e) => {
                    if self.compile_failed {
                        trace!("Pass '{}': {} still fails to compile", self.name, self.source);
                    } else {
                        error!("Pass '{}': shader {} failed to compile: {e}", self.name, self.source);
                        self.compile_failed = true;
                    }
                    return None;
                }
            }
        }

        if let Err(e) = self.params.push_all(&self.name, self.shader, host) {
            warn!("{e}");
        }
        self.shader
    }

    /// Drops the shader instance; the next [`shader`](Self::shader) call
    /// recompiles it from source.
    pub fn reset_shader<H: ShaderManager + ?Sized>(&mut self, host: &mut H) {
        if let Some(shader) = self.shader.take() {
            debug!("Pass '{}': resetting shader instance", self.name);
            host.evict_shader(&self.source, shader);
            self.state = PassState::ShaderReset;
        }
        self.compile_failed = false;
    }

    /// Output targets, resolved by name every call.
    #[must_use]
    pub fn target_override_list<'r>(&self, registry: &'r TargetRegistry) -> &'r [Option<TargetHandle>] {
        registry.operation_outputs(&self.name)
    }

    /// Releases the shader instance plus every texture and sampler.
    pub fn release_resources<H: ShaderManager + TextureManager + ?Sized>(&mut self, host: &mut H) {
        self.reset_shader(host);
        self.params.release(host);
        self.state = PassState::Destroyed;
    }
}

impl RenderPass for QuadPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PassKind {
        PassKind::Quad
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
        let Some(shader) = self.shader(ctx.host) else {
            return;
        };
        let targets = self.target_override_list(ctx.targets);
        if targets.is_empty() {
            warn!("Pass '{}' has no declared outputs", self.name);
        }
        ctx.host.draw_quad(shader, targets, self.clear);
        self.state = PassState::Active;
    }

    fn release(&mut self, host: &mut dyn Host) {
        self.release_resources(host);
    }

    fn as_quad(&self) -> Option<&QuadPass> {
        Some(self)
    }

    fn as_quad_mut(&mut self) -> Option<&mut QuadPass> {
        Some(self)
    }
}
