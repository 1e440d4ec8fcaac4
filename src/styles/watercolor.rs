//! Watercolor
//!
//! Pigment density, separable bleeding with a Gaussian kernel, edge
//! darkening, gaps and overlaps, pigment application and substrate
//! distortion. One extra target, `bleedingTarget`.

use log::debug;

use crate::renderer::graph::{GraphBuilder, SamplerStateDesc, ShaderSource};
use crate::renderer::settings::{EffectParameters, EngineSettings};

use super::{AttributeSchema, StyleId, StyleInputs, StylePipeline};

pub const BLEEDING_TARGET: &str = "bleedingTarget";
pub const SEPARABLE_H: &str = "[quad] separable H";
pub const SEPARABLE_V: &str = "[quad] separable V";

/// Normalized Gaussian weights for a bleeding kernel of `radius` taps on
/// each side (`2 * radius + 1` weights, `sigma = 2 * radius`).
#[must_use]
pub fn gaussian_weights(radius: u32) -> Vec<f32> {
    let r = i64::from(radius);
    let sigma = (radius as f32 * 2.0).max(f32::EPSILON);
    let mut weights: Vec<f32> = (-r..=r)
        .map(|x| {
            let x = x as f32;
            0.15915 * (-0.5 * x * x / (sigma * sigma)).exp() / sigma
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    if sum > 0.0 {
        for w in &mut weights {
            *w /= sum;
        }
    }
    weights
}

pub struct WatercolorStyle;

impl StylePipeline for WatercolorStyle {
    fn id(&self) -> StyleId {
        StyleId::Watercolor
    }

    fn add_targets(&self, builder: &mut GraphBuilder<'_>) {
        builder.add_matching_target(BLEEDING_TARGET, wgpu::TextureFormat::Rgba8Snorm, false);
    }

    fn add_passes(&self, builder: &mut GraphBuilder<'_>) {
        let settings = builder.settings();
        let fx = builder.effects();

        builder
            .quad("[quad] pigment density", ShaderSource::new("quadPigmentManipulation", "pigmentDensityWC"))
            .target("gColorTex", "stylizationTarget")
            .target("gControlTex", "pigmentCtrlTarget")
            .param("gSubstrateColor", &settings.substrate_color)
            .outputs(&["stylizationTarget"])
            .add();

        for (name, technique, input) in [
            (SEPARABLE_H, "blurH", "stylizationTarget"),
            (SEPARABLE_V, "blurV", BLEEDING_TARGET),
        ] {
            builder
                .quad(name, ShaderSource::in_subdir("wc", "quadSeparable", technique))
                .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
                .target("gColorTex", input)
                .target("gEdgeTex", "edgeTarget")
                .target("gDepthTex", "linearDepth")
                .target("gEdgeControlTex", "edgeCtrlTarget")
                .target("gAbstractionControlTex", "abstractCtrlTarget")
                .param("gRenderScale", &settings.render_scale)
                .param("gBleedingThreshold", &fx.bleeding_threshold)
                .param("gEdgeDarkeningKernel", &fx.edge_darkening_width)
                .param("gGapsOverlapsKernel", &fx.gaps_overlaps_width)
                .param("gBleedingRadius", &fx.bleeding_radius)
                .array("gGaussianWeights", &fx.bleeding_weights)
                .outputs(&[BLEEDING_TARGET, "edgeTarget"])
                .add();
        }

        builder
            .quad("[quad] bleeding", ShaderSource::new("quadBlend", "blendFromAlpha"))
            .target("gColorTex", "stylizationTarget")
            .target("gBlendTex", BLEEDING_TARGET)
            .outputs(&["stylizationTarget"])
            .add();

        builder
            .quad("[quad] edge darkening", ShaderSource::new("quadEdgeManipulation", "gradientEdgesWC"))
            .target("gColorTex", "stylizationTarget")
            .target("gEdgeTex", "edgeTarget")
            .target("gControlTex", "edgeCtrlTarget")
            .param("gSubstrateColor", &settings.substrate_color)
            .param("gEdgeIntensity", &fx.edge_darkening_intensity)
            .outputs(&["stylizationTarget"])
            .add();

        builder
            .quad("[quad] gaps and overlaps", ShaderSource::new("quadGapsOverlaps", "gapsOverlaps"))
            .target("gColorTex", "stylizationTarget")
            .target("gEdgeTex", "edgeTarget")
            .target("gControlTex", "edgeCtrlTarget")
            .target("gBlendingTex", BLEEDING_TARGET)
            .param("gGORadius", &fx.gaps_overlaps_width)
            .param("gSubstrateColor", &settings.substrate_color)
            .outputs(&["stylizationTarget"])
            .add();

        builder
            .quad("[quad] pigment application", ShaderSource::new("quadPigmentApplication", "pigmentApplicationWC"))
            .target("gColorTex", "stylizationTarget")
            .target("gSubstrateTex", "substrateTarget")
            .target("gControlTex", "pigmentCtrlTarget")
            .param("gSubstrateColor", &settings.substrate_color)
            .param("gPigmentDensity", &fx.pigment_density)
            .param("gDryBrushThreshold", &fx.dry_brush_threshold)
            .outputs(&["stylizationTarget"])
            .add();

        builder
            .quad("[quad] substrate distortion", ShaderSource::new("quadSubstrate", "substrateDistortion"))
            .sampler("gSampler", SamplerStateDesc::MIRROR_POINT)
            .target("gColorTex", "stylizationTarget")
            .target("gDepthTex", "linearDepth")
            .target("gControlTex", "substrateCtrlTarget")
            .target("gSubstrateTex", "substrateTarget")
            .param("gSubstrateDistortion", &settings.substrate_distortion)
            .outputs(&["stylizationTarget"])
            .add();
    }

    fn initialize_parameters(&self, schema: &mut AttributeSchema, settings: &EngineSettings, _fx: &EffectParameters) {
        settings.velocity_pv.set_scalar(0.0);

        schema.declare("bleedingThreshold", 0.0002, Some(0.0), Some(1.0));
        schema.declare("bleedingRadius", 10.0, Some(1.0), Some(40.0));
        schema.declare("edgeDarkeningIntensity", 1.0, Some(0.0), Some(25.0));
        schema.declare("edgeDarkeningWidth", 3.0, Some(1.0), Some(50.0));
        schema.declare("maxGapsOverlapsWidth", 3.0, Some(1.0), Some(10.0));
        schema.declare("pigmentDensity", 5.0, None, None);
        schema.declare("drybrushThreshold", 15.0, Some(0.0), None);
    }

    fn compute_parameters(&self, inputs: &StyleInputs<'_>) {
        let fx = inputs.effects;
        let scale = inputs.render_scale();

        fx.bleeding_threshold.set_scalar(inputs.value("bleedingThreshold"));

        // Integer attribute, truncated after scaling.
        let radius = (inputs.value("bleedingRadius").trunc() * scale).trunc().max(0.0);
        let radius_changed = (fx.bleeding_radius.scalar() - radius).abs() > f32::EPSILON;
        if radius_changed || !inputs.settings.initialized {
            fx.bleeding_radius.set_scalar(radius);
            fx.bleeding_weights.set(gaussian_weights(radius as u32));
            debug!("Bleeding kernel rebuilt with radius {radius}");
        }

        fx.edge_darkening_intensity
            .set_scalar(inputs.value("edgeDarkeningIntensity") * scale);
        fx.edge_darkening_width
            .set_scalar((inputs.value("edgeDarkeningWidth").trunc() * scale).round());
        fx.gaps_overlaps_width
            .set_scalar((inputs.value("maxGapsOverlapsWidth").trunc() * scale).round());
        fx.pigment_density.set_scalar(inputs.value("pigmentDensity"));
        fx.dry_brush_threshold
            .set_scalar(20.0 - inputs.value("drybrushThreshold"));
    }
}
