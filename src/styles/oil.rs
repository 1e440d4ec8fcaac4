//! Oil Paint
//!
//! Color smoothing in Lab space, a structure-tensor driven tangent flow
//! map, coherent noise advected with per-vertex velocity and impasto
//! shading of the smoothed noise. Substrate lighting uses the impasto
//! technique.

use crate::renderer::graph::{GraphBuilder, SamplerStateDesc, ShaderSource};
use crate::renderer::settings::{EffectParameters, EngineSettings};

use super::{AttributeSchema, StyleId, StyleInputs, StylePipeline};

pub const LAB_TARGET: &str = "labTarget";
pub const STRUCTURE_TENSOR_TARGET: &str = "structureTensorTarget";
pub const TANGENT_FLOW_MAP_TARGET: &str = "tangentFlowMapTarget";
pub const NOISE_TARGET: &str = "noiseTarget";
pub const NOISE_SMOOTHED_TARGET: &str = "noiseSmoothedTarget";
pub const FILTER_TARGET: &str = "filterTarget";

pub const VELOCITY_ATTRIBUTE: &str = "velocityPV";

pub struct OilStyle;

impl StylePipeline for OilStyle {
    fn id(&self) -> StyleId {
        StyleId::Oil
    }

    fn add_targets(&self, builder: &mut GraphBuilder<'_>) {
        use wgpu::TextureFormat::{R16Float, Rg16Float, Rgba32Float};

        builder.add_matching_target(LAB_TARGET, Rgba32Float, false);
        builder.add_matching_target(STRUCTURE_TENSOR_TARGET, Rgba32Float, false);
        builder.add_matching_target(TANGENT_FLOW_MAP_TARGET, Rgba32Float, false);
        // previous frame encoded in y
        builder.add_matching_target(NOISE_TARGET, Rg16Float, false);
        builder.add_matching_target(NOISE_SMOOTHED_TARGET, Rg16Float, false);
        builder.add_matching_target(FILTER_TARGET, R16Float, false);
    }

    fn add_passes(&self, builder: &mut GraphBuilder<'_>) {
        let settings = builder.settings();
        let fx = builder.effects();

        builder
            .quad("[quad] gaps and overlaps", ShaderSource::new("quadGapsOverlaps", "gapsOverlaps"))
            .target("gColorTex", "stylizationTarget")
            .target("gEdgeTex", "edgeTarget")
            .target("gControlTex", "edgeCtrlTarget")
            .param("gGORadius", &fx.gaps_overlaps_width)
            .param("gSubstrateColor", &settings.substrate_color)
            .outputs(&["stylizationTarget", FILTER_TARGET])
            .add();

        builder
            .quad("[quad] pigment density", ShaderSource::new("quadPigmentManipulation", "pigmentDensityOP"))
            .target("gColorTex", "stylizationTarget")
            .target("gFilterTex", FILTER_TARGET)
            .target("gControlTex", "pigmentCtrlTarget")
            .param("gSubstrateColor", &settings.substrate_color)
            .outputs(&["stylizationTarget", FILTER_TARGET])
            .add();

        for pass in 0..2 {
            builder
                .quad(
                    &format!("[quad] color smoothing pass #{pass}"),
                    ShaderSource::new("quadBilateralSmoothing", "bilateralSeparated"),
                )
                .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
                .target("gColorTex", "stylizationTarget")
                .constant("gPass", &[1.0])
                .outputs(&["stylizationTarget"])
                .add();
        }

        builder
            .quad("[quad] rgb2lab color transform", ShaderSource::new("quadColorTransform", "rgb2labTransform"))
            .target("gColorTex", "stylizationTarget")
            .outputs(&[LAB_TARGET])
            .add();

        builder
            .quad("[quad] structure tensor", ShaderSource::new("quadTangentFlowMap", "structureTensor"))
            .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
            .target("gColorTex", LAB_TARGET)
            .outputs(&[STRUCTURE_TENSOR_TARGET])
            .add();

        builder
            .quad(
                "[quad] smoothing structure tensor",
                ShaderSource::in_subdir("op", "quadGaussianSmoothing", "gauss2D"),
            )
            .target("gColorTex", STRUCTURE_TENSOR_TARGET)
            .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
            .param("gSubstrateColor", &settings.substrate_color)
            .param("gSigma", &fx.oil_st_smoothing)
            .outputs(&[TANGENT_FLOW_MAP_TARGET])
            .add();

        builder
            .quad("[quad] tangent flow map synthesis", ShaderSource::new("quadTangentFlowMap", "tangentFlowMap"))
            .target("gColorTex", TANGENT_FLOW_MAP_TARGET)
            .outputs(&[TANGENT_FLOW_MAP_TARGET])
            .add();

        builder
            .quad(
                "[quad] edge flow-aligned smoothing",
                ShaderSource::in_subdir("op", "quadFlowAlignedSmoothing", "flowAlignedSmoothing"),
            )
            .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
            .target("gColorTex", "edgeTarget")
            .target("gTfmTex", TANGENT_FLOW_MAP_TARGET)
            .constant("gSigma", &[1.0])
            .outputs(&["edgeTarget"])
            .add();

        for (pass, dxdy) in [(0, [1.0, 0.0]), (1, [0.0, 1.0])] {
            builder
                .quad(
                    &format!("[quad] structure tensor adapted smoothing #{pass}"),
                    ShaderSource::in_subdir("op", "quadGaussianSmoothing", "gauss2DAdaptedXYSeparated"),
                )
                .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
                .target("gColorTex", STRUCTURE_TENSOR_TARGET)
                .target("gEdgeTex", "edgeTarget")
                .target("gControlTex", "abstractCtrlTarget")
                .param("gSigma", &fx.oil_st_smoothing)
                .constant("gDxDy", &dxdy)
                .param("gTauG", &fx.oil_paint_stroke_fidelity)
                .outputs(&[STRUCTURE_TENSOR_TARGET])
                .add();
        }

        builder
            .quad(
                "[quad] tangent flow map adaptive synthesis",
                ShaderSource::new("quadTangentFlowMap", "tangentFlowMap"),
            )
            .target("gColorTex", STRUCTURE_TENSOR_TARGET)
            .outputs(&[TANGENT_FLOW_MAP_TARGET])
            .add();

        builder
            .quad("[quad] noise synthesis", ShaderSource::in_subdir("op", "quadNoise", "noiseSynthesis"))
            .sampler("gSampler", SamplerStateDesc::CLAMP_LINEAR)
            .target("gColorTex", LAB_TARGET)
            .target("gDepthTex", "linearDepth")
            .target("gNoiseTex", NOISE_TARGET)
            .target("gVelocityTex", "velocity")
            .target("gControlTex", "pigmentCtrlTarget")
            .param("gScale", &fx.oil_brush_scale)
            .param("gMicro", &fx.oil_brush_micro)
            .param("gTime", &settings.time)
            .param("gRandom", &settings.random)
            .outputs(&[NOISE_TARGET])
            .add();

        builder
            .quad("[quad] noise pre-smoothing", ShaderSource::in_subdir("op", "quadGaussianSmoothing", "gauss2DX"))
            .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
            .target("gColorTex", NOISE_TARGET)
            .constant("gSigma", &[0.5])
            .outputs(&[NOISE_TARGET])
            .add();

        builder
            .quad(
                "[quad] noise advection (coherent noise)",
                ShaderSource::in_subdir("op", "quadNoise", "coherentNoiseSynthesis"),
            )
            .sampler("gSampler", SamplerStateDesc::CLAMP_LINEAR)
            .target("gColorTex", LAB_TARGET)
            .target("gDepthTex", "linearDepth")
            .target("gNoiseTex", NOISE_TARGET)
            .target("gVelocityTex", "velocity")
            .target("gControlTex", "pigmentCtrlTarget")
            .param("gScale", &fx.oil_brush_scale)
            .param("gMicro", &fx.oil_brush_micro)
            .param("gTime", &settings.time)
            .outputs(&[NOISE_TARGET])
            .add();

        builder
            .quad("[quad] noise post-smoothing", ShaderSource::in_subdir("op", "quadGaussianSmoothing", "gauss2DX"))
            .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
            .target("gColorTex", NOISE_TARGET)
            .constant("gSigma", &[0.5])
            .outputs(&[NOISE_TARGET])
            .add();

        builder
            .quad("[quad] pigment application", ShaderSource::new("quadPigmentApplication", "pigmentApplicationOP"))
            .target("gColorTex", "stylizationTarget")
            .target("gFilterTex", FILTER_TARGET)
            .target("gSubstrateTex", "substrateTarget")
            .target("gControlTex", "pigmentCtrlTarget")
            .param("gSubstrateColor", &settings.substrate_color)
            .param("gPigmentDensity", &fx.pigment_density)
            .param("gDryBrushThreshold", &fx.dry_brush_threshold)
            .outputs(&["stylizationTarget", FILTER_TARGET])
            .add();

        builder
            .quad(
                "[quad] noise and color (packed) flow-aligned smoothing",
                ShaderSource::in_subdir("op", "quadFlowAlignedSmoothing", "flowAlignedSmoothingThresholded"),
            )
            .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
            .target("gColorTex", "stylizationTarget")
            .target("gNoiseTex", NOISE_TARGET)
            .target("gTfmTex", TANGENT_FLOW_MAP_TARGET)
            .target("gEdgeTex", "edgeTarget")
            .target("gControlTex", "abstractCtrlTarget")
            .param("gSigma", &fx.oil_color_smoothing)
            .outputs(&["stylizationTarget", NOISE_SMOOTHED_TARGET])
            .add();

        builder
            .quad("[quad] noise texture shading", ShaderSource::in_subdir("op", "quadImpasto", "impasto"))
            .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
            .target("gColorTex", NOISE_SMOOTHED_TARGET)
            .target("gFilterTex", FILTER_TARGET)
            .target("gSubstrateTex", "substrateTarget")
            .target("gPigmentControlTex", "pigmentCtrlTarget")
            .target("gAbstractionControlTex", "abstractCtrlTarget")
            .param("gBumpScale", &fx.oil_bump_scale)
            .param("gSigma", &fx.oil_color_smoothing)
            .outputs(&["substrateTarget"])
            .add();

        builder
            .quad("[quad] oil compose", ShaderSource::in_subdir("op", "quadCompose", "oilCompose"))
            .target("gColorTex", "stylizationTarget")
            .target("gFilterTex", FILTER_TARGET)
            .outputs(&["stylizationTarget"])
            .add();

        builder
            .quad("[quad] substrate distortion", ShaderSource::new("quadSubstrate", "substrateDistortionEdges"))
            .target("gColorTex", "stylizationTarget")
            .target("gEdgeTex", "edgeTarget")
            .target("gControlTex", "substrateCtrlTarget")
            .target("gSubstrateTex", "substrateTarget")
            .param("gSubstrateDistortion", &settings.substrate_distortion)
            .outputs(&["stylizationTarget"])
            .add();
    }

    fn initialize_parameters(&self, schema: &mut AttributeSchema, settings: &EngineSettings, _fx: &EffectParameters) {
        // Coherent noise advection reads the velocity target.
        settings.velocity_pv.set_scalar(1.0);
        schema.declare(VELOCITY_ATTRIBUTE, 1.0, Some(0.0), Some(1.0));
        schema.declare("paintStrokeLength", 8.0, Some(0.1), Some(20.0));
        schema.declare("paintStrokeWidth", 2.5, Some(1.2), Some(20.0));
        schema.declare("paintStrokeFidelity", 1.2, Some(0.0), Some(1.2));
        schema.declare("impasto", 60.0, Some(0.0), Some(200.0));
    }

    fn compute_parameters(&self, inputs: &StyleInputs<'_>) {
        let fx = inputs.effects;
        let velocity = if inputs.value(VELOCITY_ATTRIBUTE) > 0.5 { 1.0 } else { 0.0 };
        inputs.settings.velocity_pv.set_scalar(velocity);
        fx.oil_color_smoothing.set_scalar(inputs.value("paintStrokeLength"));
        fx.oil_st_smoothing.set_scalar(inputs.value("paintStrokeWidth"));
        fx.oil_paint_stroke_fidelity
            .set_scalar(inputs.value("paintStrokeFidelity"));
        fx.oil_bump_scale.set_scalar(inputs.value("impasto"));
    }

    fn substrate_lighting_technique(&self) -> &'static str {
        "deferredImpastoLighting"
    }
}
