//! Engine Settings & Effect Parameters
//!
//! Every user-tunable value the graph feeds into shaders lives here as a
//! [`FloatParam`]: a shared, versioned float vector. Quad passes bind clones
//! of these sources at build time, so a write made by the configuration
//! evaluation is visible to every pass on its next parameter push without
//! any propagation step.
//!
//! # Color depth
//!
//! | Value | Depth            | Format        |
//! |-------|------------------|---------------|
//! | 0     | 8 bit            | `Rgba8Snorm`  |
//! | 1     | 16 bit (default) | `Rgba16Snorm` |
//! | 2     | 32 bit           | `Rgba32Float` |
//!
//! Only five targets carry the user depth: `colorTarget`, `diffuseTarget`,
//! `stylizationTarget`, `outputTarget` and `presentTarget`.

use serde::{Deserialize, Serialize};

use crate::renderer::core::FloatParam;
use crate::styles::StyleId;

/// Substrate texture loaded when nothing else is configured.
pub const DEFAULT_SUBSTRATE_TEXTURE: &str = "rough_default_2k.jpg";

/// Largest bleeding kernel: radius 40 at render scale 2, both sides plus the
/// center tap.
pub const MAX_BLEEDING_TAPS: usize = 161;

/// User-selectable color depth of the color-bearing targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorDepth {
    Bits8,
    #[default]
    Bits16,
    Bits32,
}

impl ColorDepth {
    /// Maps the configuration enum (0..=2). Out-of-range values clamp to 32 bit.
    #[must_use]
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => Self::Bits8,
            1 => Self::Bits16,
            _ => Self::Bits32,
        }
    }

    #[must_use]
    pub fn index(self) -> u32 {
        match self {
            Self::Bits8 => 0,
            Self::Bits16 => 1,
            Self::Bits32 => 2,
        }
    }

    #[inline]
    #[must_use]
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            Self::Bits8 => wgpu::TextureFormat::Rgba8Snorm,
            Self::Bits16 => wgpu::TextureFormat::Rgba16Snorm,
            Self::Bits32 => wgpu::TextureFormat::Rgba32Float,
        }
    }
}

/// Engine-wide settings shared by the fixed passes.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Set once a full configuration cycle ran for the active style.
    pub initialized: bool,
    pub style: StyleId,
    pub color_depth: ColorDepth,

    /// Gamma state of the host viewport (0 or 1).
    pub host_gamma: FloatParam,
    /// Gamma freeze override. 0 lets `host_gamma` follow the host.
    pub npr_gamma: FloatParam,
    pub render_scale: FloatParam,
    pub antialiasing: FloatParam,
    pub depth_range: FloatParam,
    pub velocity_pv: FloatParam,

    // Debugger
    pub color_channels: FloatParam,
    pub color_transform_mode: FloatParam,

    // Atmosphere
    pub atmosphere_tint: FloatParam,
    pub atmosphere_range: FloatParam,

    // Noise inputs, refreshed every frame
    pub time: FloatParam,
    pub random: FloatParam,

    // Substrate
    pub substrate_tex_filename: String,
    pub substrate_color: FloatParam,
    pub substrate_shading: FloatParam,
    pub substrate_light_dir: FloatParam,
    pub substrate_light_tilt: FloatParam,
    pub substrate_scale: FloatParam,
    /// Interval between substrate UV jumps in ms; 0 disables them.
    pub substrate_update: FloatParam,
    pub substrate_roughness: FloatParam,
    pub substrate_uv_offset: FloatParam,
    pub substrate_distortion: FloatParam,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            initialized: false,
            style: StyleId::default(),
            color_depth: ColorDepth::default(),
            host_gamma: FloatParam::floats(&[1.0]),
            npr_gamma: FloatParam::floats(&[0.0]),
            render_scale: FloatParam::floats(&[1.0]),
            antialiasing: FloatParam::floats(&[1.0]),
            depth_range: FloatParam::floats(&[8.0, 50.0]),
            velocity_pv: FloatParam::floats(&[0.0]),
            color_channels: FloatParam::floats(&[1.0, 1.0, 1.0, 0.0]),
            color_transform_mode: FloatParam::floats(&[0.0]),
            atmosphere_tint: FloatParam::floats(&[1.0, 1.0, 1.0]),
            atmosphere_range: FloatParam::floats(&[25.0, 300.0]),
            time: FloatParam::floats(&[0.0]),
            random: FloatParam::floats(&[0.0, 0.0, 0.0]),
            substrate_tex_filename: DEFAULT_SUBSTRATE_TEXTURE.to_owned(),
            substrate_color: FloatParam::floats(&[1.0, 1.0, 1.0]),
            substrate_shading: FloatParam::floats(&[0.5]),
            substrate_light_dir: FloatParam::floats(&[180.0]),
            substrate_light_tilt: FloatParam::floats(&[45.0]),
            substrate_scale: FloatParam::floats(&[1.0]),
            substrate_update: FloatParam::floats(&[0.0]),
            substrate_roughness: FloatParam::floats(&[1.0]),
            substrate_uv_offset: FloatParam::floats(&[0.0, 0.0]),
            substrate_distortion: FloatParam::floats(&[1.0]),
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub fn with_style(style: StyleId) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Whether the geometry pass writes per-vertex velocity.
    #[inline]
    #[must_use]
    pub fn velocity_enabled(&self) -> bool {
        self.velocity_pv.scalar() > 0.5
    }

    #[inline]
    #[must_use]
    pub fn user_format(&self) -> wgpu::TextureFormat {
        self.color_depth.format()
    }
}

/// Per-effect parameters written by the active style.
#[derive(Debug, Clone)]
pub struct EffectParameters {
    // Post-processing
    pub saturation: FloatParam,
    pub contrast: FloatParam,
    pub brightness: FloatParam,

    // Watercolor
    pub bleeding_threshold: FloatParam,
    pub bleeding_radius: FloatParam,
    pub bleeding_weights: FloatParam,
    pub edge_darkening_intensity: FloatParam,
    pub edge_darkening_width: FloatParam,
    pub gaps_overlaps_width: FloatParam,
    pub pigment_density: FloatParam,
    pub dry_brush_threshold: FloatParam,

    // Oil
    pub oil_color_smoothing: FloatParam,
    pub oil_st_smoothing: FloatParam,
    pub oil_paint_stroke_fidelity: FloatParam,
    pub oil_bump_scale: FloatParam,
    pub oil_brush_scale: FloatParam,
    pub oil_brush_micro: FloatParam,

    // Charcoal
    pub dry_media_threshold: FloatParam,

    // Sandbox
    pub awesome_parameter: FloatParam,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            saturation: FloatParam::floats(&[1.0]),
            contrast: FloatParam::floats(&[1.0]),
            brightness: FloatParam::floats(&[1.0]),
            bleeding_threshold: FloatParam::floats(&[0.0002]),
            bleeding_radius: FloatParam::floats(&[10.0]),
            bleeding_weights: FloatParam::floats(&[0.0; MAX_BLEEDING_TAPS]),
            edge_darkening_intensity: FloatParam::floats(&[1.0]),
            edge_darkening_width: FloatParam::floats(&[3.0]),
            gaps_overlaps_width: FloatParam::floats(&[3.0]),
            pigment_density: FloatParam::floats(&[5.0]),
            dry_brush_threshold: FloatParam::floats(&[15.0]),
            oil_color_smoothing: FloatParam::floats(&[8.0]),
            oil_st_smoothing: FloatParam::floats(&[2.5]),
            oil_paint_stroke_fidelity: FloatParam::floats(&[1.2]),
            oil_bump_scale: FloatParam::floats(&[60.0]),
            oil_brush_scale: FloatParam::floats(&[0.75]),
            oil_brush_micro: FloatParam::floats(&[2.0]),
            dry_media_threshold: FloatParam::floats(&[0.5]),
            awesome_parameter: FloatParam::floats(&[1.0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_depth_formats() {
        assert_eq!(ColorDepth::from_index(0).format(), wgpu::TextureFormat::Rgba8Snorm);
        assert_eq!(ColorDepth::from_index(1).format(), wgpu::TextureFormat::Rgba16Snorm);
        assert_eq!(ColorDepth::from_index(2).format(), wgpu::TextureFormat::Rgba32Float);
        assert_eq!(ColorDepth::from_index(7), ColorDepth::Bits32);
        assert_eq!(ColorDepth::default().index(), 1);
    }

    #[test]
    fn test_cloned_sources_alias() {
        let settings = EngineSettings::default();
        let bound = settings.substrate_color.clone();
        settings.substrate_color.set_components(&[0.2, 0.3, 0.4]);
        assert_eq!(bound.get(), vec![0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_velocity_flag() {
        let settings = EngineSettings::default();
        assert!(!settings.velocity_enabled());
        settings.velocity_pv.set_scalar(1.0);
        assert!(settings.velocity_enabled());
    }
}
