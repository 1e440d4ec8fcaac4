//! Charcoal
//!
//! Offset-driven blurring and mixing, edge softening, dry-media
//! granulation and smudging. Most of its targets follow the scene's MSAA
//! sample count.

use crate::renderer::graph::{GraphBuilder, SamplerStateDesc, ShaderSource};
use crate::renderer::settings::{EffectParameters, EngineSettings};

use super::{AttributeSchema, StyleId, StyleInputs, StylePipeline};

pub const OFFSET_TARGET: &str = "offsetTarget";
pub const GRANULATE_TARGET: &str = "granulateTarget";
pub const BLEND_TARGET: &str = "blendTarget";
pub const EDGE_BLUR_CONTROL: &str = "edgeBlurControl";
pub const EDGE_BLUR_TARGET: &str = "edgeBlurTarget";

pub struct CharcoalStyle;

impl StylePipeline for CharcoalStyle {
    fn id(&self) -> StyleId {
        StyleId::Charcoal
    }

    fn add_targets(&self, builder: &mut GraphBuilder<'_>) {
        let rgba8 = wgpu::TextureFormat::Rgba8Snorm;
        builder.add_matching_target(OFFSET_TARGET, rgba8, true);
        builder.add_matching_target(GRANULATE_TARGET, rgba8, true);
        builder.add_matching_target(BLEND_TARGET, rgba8, true);
        builder.add_matching_target(EDGE_BLUR_CONTROL, rgba8, false);
        builder.add_matching_target(EDGE_BLUR_TARGET, rgba8, true);
    }

    fn add_passes(&self, builder: &mut GraphBuilder<'_>) {
        let settings = builder.settings();
        let fx = builder.effects();

        builder
            .quad("[quad] offset Output", ShaderSource::in_subdir("ch", "quadOffset", "offsetOutput"))
            .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
            .target("gAbstractionControlTex", "abstractCtrlTarget")
            .outputs(&[OFFSET_TARGET])
            .add();

        for (name, technique) in [("[quad] offset H", "offsetH"), ("[quad] offset V", "offsetV")] {
            builder
                .quad(name, ShaderSource::in_subdir("ch", "quadOffsetBlend", technique))
                .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
                .target("gDepthTex", "linearDepth")
                .target("gOffsetTex", OFFSET_TARGET)
                .target("gControlTex", "abstractCtrlTarget")
                .outputs(&[OFFSET_TARGET])
                .add();
        }

        for (name, technique, input) in [
            ("[quad] blur H", "blurH", "stylizationTarget"),
            ("[quad] blur V", "blurV", BLEND_TARGET),
        ] {
            builder
                .quad(name, ShaderSource::in_subdir("ch", "quadBlur", technique))
                .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
                .target("gStylizationTex", input)
                .target("gControlTex", "pigmentCtrlTarget")
                .target("gOffsetTex", OFFSET_TARGET)
                .outputs(&[BLEND_TARGET])
                .add();
        }

        builder
            .quad("[quad] mixing", ShaderSource::in_subdir("ch", "quadOffset", "mixing"))
            .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
            .target("gStylizationTex", "stylizationTarget")
            .target("gBlendTex", BLEND_TARGET)
            .target("gAbstractionControlTex", "abstractCtrlTarget")
            .target("gOffsetTex", OFFSET_TARGET)
            .outputs(&["stylizationTarget"])
            .add();

        // The vertical pass reads the horizontal result.
        for (name, technique, input, blur) in [
            ("[quad] edge blur H", "edgeBlurH", "stylizationTarget", "edgeTarget"),
            ("[quad] edge blur V", "edgeBlurV", EDGE_BLUR_TARGET, EDGE_BLUR_CONTROL),
        ] {
            builder
                .quad(name, ShaderSource::in_subdir("ch", "quadEdgeBlur", technique))
                .sampler("gSampler", SamplerStateDesc::CLAMP_POINT)
                .target("gStylizationTex", input)
                .target("gEdgeBlurTex", blur)
                .target("gOffsetTex", OFFSET_TARGET)
                .target("gControlTex", "edgeCtrlTarget")
                .outputs(&[EDGE_BLUR_TARGET, EDGE_BLUR_CONTROL])
                .add();
        }

        builder
            .quad("[quad] edge filter", ShaderSource::in_subdir("ch", "quadEdgeManipulation", "edgeFilter"))
            .target("gEdgeSoftenTex", EDGE_BLUR_TARGET)
            .target("gStylizationTex", "stylizationTarget")
            .target("gEdgeBlurControlTex", EDGE_BLUR_CONTROL)
            .outputs(&["stylizationTarget"])
            .add();

        builder
            .quad("[quad] dry brush op", ShaderSource::in_subdir("ch", "quadCharcoal", "dryMedia"))
            .target("gLightingTex", "diffuseTarget")
            .target("gStylizationTex", "stylizationTarget")
            .target("gSubstrateTex", "substrateTarget")
            .target("gCtrlPigmentTex", "pigmentCtrlTarget")
            .param("gSubstrateRoughness", &settings.substrate_roughness)
            .param("gDryMediaThreshold", &fx.dry_media_threshold)
            .param("gSubstrateColor", &settings.substrate_color)
            .outputs(&["stylizationTarget"])
            .add();

        builder
            .quad("[quad] smudging", ShaderSource::in_subdir("ch", "quadSmudging", "smudging"))
            .target("gStylizationTex", "stylizationTarget")
            .target("gBlendTex", BLEND_TARGET)
            .target("gEdgeBlurTex", EDGE_BLUR_TARGET)
            .target("gControlTex", "abstractCtrlTarget")
            .target("gOffsetTex", OFFSET_TARGET)
            .outputs(&["stylizationTarget"])
            .add();

        builder
            .quad("[quad] pigment density", ShaderSource::new("quadPigmentManipulation", "pigmentDensityCC"))
            .target("gColorTex", "stylizationTarget")
            .target("gControlTex", "pigmentCtrlTarget")
            .outputs(&["stylizationTarget"])
            .add();
    }

    fn initialize_parameters(&self, schema: &mut AttributeSchema, settings: &EngineSettings, _fx: &EffectParameters) {
        settings.velocity_pv.set_scalar(0.0);
        schema.declare("dryMediaThreshold", 0.5, Some(0.0), None);
    }

    fn compute_parameters(&self, inputs: &StyleInputs<'_>) {
        inputs
            .effects
            .dry_media_threshold
            .set_scalar(inputs.value("dryMediaThreshold"));
    }
}
