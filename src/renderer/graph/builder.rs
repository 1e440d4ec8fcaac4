//! Graph Builder
//!
//! [`GraphBuilder`] is the write side of a graph build. It borrows the pass
//! list, the target registry, the host and the settings for the duration of
//! one `build()` and offers a fluent API for the repetitive part: declaring
//! a quad pass, binding its parameters and wiring its outputs.
//!
//! ```rust,ignore
//! let settings = builder.settings();
//! builder
//!     .quad("[quad] edge detection", ShaderSource::new("quadEdgeDetection", "sobelRGBDEdgeDetection"))
//!     .target("gColorTex", "stylizationTarget")
//!     .target("gDepthTex", "linearDepth")
//!     .param("gGamma", &settings.host_gamma)
//!     .outputs(&["edgeTarget"])
//!     .add();
//! ```

use std::path::Path;

use smallvec::SmallVec;

use super::graph::RenderGraph;
use super::params::SamplerStateDesc;
use super::pass::RenderPass;
use super::passes::quad::{QuadPass, ShaderSource};
use super::targets::{RenderTargetDescriptor, TargetRegistry};
use crate::host::{ClearMask, Host};
use crate::renderer::core::{FloatParam, MatrixParam};
use crate::renderer::settings::{EffectParameters, EngineSettings};

/// Borrowed state for one graph build.
pub struct GraphBuilder<'a> {
    graph: &'a mut RenderGraph,
    targets: &'a mut TargetRegistry,
    host: &'a mut dyn Host,
    settings: &'a EngineSettings,
    effects: &'a EffectParameters,
    texture_dir: &'a Path,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        graph: &'a mut RenderGraph,
        targets: &'a mut TargetRegistry,
        host: &'a mut dyn Host,
        settings: &'a EngineSettings,
        effects: &'a EffectParameters,
        texture_dir: &'a Path,
    ) -> Self {
        Self {
            graph,
            targets,
            host,
            settings,
            effects,
            texture_dir,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &'a EngineSettings {
        self.settings
    }

    #[inline]
    #[must_use]
    pub fn effects(&self) -> &'a EffectParameters {
        self.effects
    }

    #[must_use]
    pub fn targets(&self) -> &TargetRegistry {
        self.targets
    }

    /// Appends a target, allocating it on the host.
    pub fn add_target(&mut self, desc: RenderTargetDescriptor) -> usize {
        self.targets.append(desc, None, self.host)
    }

    /// Appends a target sized like target 0. `multisampled` inherits its
    /// sample count, otherwise the target is single-sampled.
    pub fn add_matching_target(&mut self, name: &str, format: wgpu::TextureFormat, multisampled: bool) -> usize {
        let (width, height, samples) = self
            .targets
            .descriptor(0)
            .map_or((1, 1, 1), |d| (d.width, d.height, d.sample_count));
        let samples = if multisampled { samples } else { 1 };
        self.add_target(RenderTargetDescriptor::new(name, width, height, samples, format))
    }

    /// Designates the target at `index` as the presented color buffer.
    pub fn set_present_target(&mut self, index: usize) -> bool {
        self.targets.set_present_target(index)
    }

    /// Appends a non-quad pass and declares its outputs.
    pub fn add_pass(&mut self, pass: Box<dyn RenderPass>, outputs: &[&str]) -> usize {
        if !outputs.is_empty() {
            self.targets.set_operation_outputs(pass.name(), outputs);
        }
        self.graph.add_pass(pass)
    }

    /// Starts declaring a quad pass that does not clear its outputs.
    pub fn quad<'b>(&'b mut self, name: &str, source: ShaderSource) -> QuadPassBuilder<'b, 'a> {
        QuadPassBuilder {
            pass: QuadPass::new(name, source, ClearMask::empty()),
            outputs: SmallVec::new(),
            builder: self,
        }
    }

    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.graph.len()
    }
}

/// Fluent declaration of one [`QuadPass`].
pub struct QuadPassBuilder<'b, 'a> {
    builder: &'b mut GraphBuilder<'a>,
    pass: QuadPass,
    outputs: SmallVec<[String; 4]>,
}

impl QuadPassBuilder<'_, '_> {
    /// Binds target parameter `name` to the registry target `target`.
    #[must_use]
    pub fn target(mut self, name: &str, target: &str) -> Self {
        self.pass.params_mut().add_target(name, self.builder.targets, target);
        self
    }

    #[must_use]
    pub fn param(mut self, name: &str, source: &FloatParam) -> Self {
        self.pass.params_mut().add_scalar(name, source);
        self
    }

    #[must_use]
    pub fn array(mut self, name: &str, source: &FloatParam) -> Self {
        self.pass.params_mut().add_array(name, source);
        self
    }

    #[must_use]
    pub fn matrix(mut self, name: &str, source: &MatrixParam) -> Self {
        self.pass.params_mut().add_matrix(name, source);
        self
    }

    /// Binds a fixed value owned by the pass.
    #[must_use]
    pub fn constant(mut self, name: &str, values: &[f32]) -> Self {
        self.pass.params_mut().add_constant(name, values);
        self
    }

    #[must_use]
    pub fn sampler(mut self, name: &str, desc: SamplerStateDesc) -> Self {
        self.pass.params_mut().add_sampler_state(name, desc, None, self.builder.host);
        self
    }

    /// Loads `file_name` from the texture root as texture parameter `name`.
    #[must_use]
    pub fn texture(mut self, name: &str, file_name: &str) -> Self {
        let dir = self.builder.texture_dir;
        self.pass.params_mut().add_texture(name, dir, file_name, None, self.builder.host);
        self
    }

    #[must_use]
    pub fn outputs(mut self, targets: &[&str]) -> Self {
        self.outputs = targets.iter().map(|t| (*t).to_owned()).collect();
        self
    }

    /// Registers the pass and its outputs. Returns the pass index.
    pub fn add(self) -> usize {
        let outputs: SmallVec<[&str; 4]> = self.outputs.iter().map(String::as_str).collect();
        self.builder.add_pass(Box::new(self.pass), &outputs)
    }
}
