//! Sandbox
//!
//! A single test pass over the stylization target, meant as the starting
//! point for new styles.

use crate::renderer::graph::{GraphBuilder, ShaderSource};
use crate::renderer::settings::{EffectParameters, EngineSettings};

use super::{AttributeSchema, StyleId, StyleInputs, StylePipeline};

pub const TEST_TARGET: &str = "testTarget";

pub struct SandboxStyle;

impl StylePipeline for SandboxStyle {
    fn id(&self) -> StyleId {
        StyleId::Sandbox
    }

    fn add_targets(&self, builder: &mut GraphBuilder<'_>) {
        builder.add_matching_target(TEST_TARGET, wgpu::TextureFormat::Rgba8Snorm, false);
    }

    fn add_passes(&self, builder: &mut GraphBuilder<'_>) {
        let fx = builder.effects();
        builder
            .quad("[quad] test pass", ShaderSource::new("quadTest", "testTechnique"))
            .target("gColorTex", "stylizationTarget")
            .param("gAwesomeParameter", &fx.awesome_parameter)
            .outputs(&["stylizationTarget"])
            .add();
    }

    fn initialize_parameters(&self, schema: &mut AttributeSchema, _settings: &EngineSettings, _fx: &EffectParameters) {
        schema.declare("awesomeParameter", 1.0, Some(-5.0), Some(10.0));
    }

    fn compute_parameters(&self, inputs: &StyleInputs<'_>) {
        inputs
            .effects
            .awesome_parameter
            .set_scalar(inputs.value("awesomeParameter"));
    }
}
