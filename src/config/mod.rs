//! Configuration
//!
//! Two layers of configuration drive the pipeline:
//!
//! - [`PipelineConfig`]: fixed at construction. Names, shader and texture
//!   roots, the initial style. Usually loaded from a JSON file.
//! - [`ConfigValues`]: the user-facing attribute values, re-evaluated every
//!   time they change. [`ConfigNode::evaluate`] applies them to a live
//!   [`NprOverride`](crate::renderer::pipeline::NprOverride).
//!
//! Both deserialize with `#[serde(default)]`, so a preset only needs to list
//! the values it changes:
//!
//! ```json
//! { "style": "Oil", "colorDepth": 2, "styleValues": { "impasto": 120.0 } }
//! ```

pub mod node;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::renderer::settings::DEFAULT_SUBSTRATE_TEXTURE;
use crate::styles::StyleId;

pub use node::ConfigNode;

/// Construction-time configuration of an [`NprOverride`](crate::renderer::pipeline::NprOverride).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Internal renderer name reported to scripting.
    pub renderer_name: String,
    /// Name shown in the HUD title.
    pub ui_name: String,
    pub shader_root: PathBuf,
    pub texture_root: PathBuf,
    pub initial_style: StyleId,
    pub substrate_texture: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            renderer_name: String::from("brushwork"),
            ui_name: String::from("Brushwork"),
            shader_root: PathBuf::from("shaders"),
            texture_root: PathBuf::from("textures"),
            initial_style: StyleId::default(),
            substrate_texture: DEFAULT_SUBSTRATE_TEXTURE.to_owned(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        debug!("Loaded pipeline config from {}", path.display());
        Ok(config)
    }
}

/// User-facing configuration attributes.
///
/// Enum-valued attributes keep their raw index; out-of-range values are
/// clamped when applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigValues {
    pub style: StyleId,
    /// 0: 8 bit, 1: 16 bit, 2: 32 bit.
    pub color_depth: u32,
    /// 0: half, 1: normal, 2: double resolution.
    pub render_scale: u32,
    /// 0: none, 1: FXAA, 2: FXAA (high).
    pub antialiasing: u32,
    pub depth_range: [f32; 2],
    pub atmosphere_tint: [f32; 3],
    pub atmosphere_range: [f32; 2],

    pub substrate_texture: String,
    pub substrate_color: [f32; 3],
    pub substrate_shading: f32,
    pub substrate_light_dir: f32,
    pub substrate_light_tilt: f32,
    pub substrate_scale: f32,
    /// Substrate refreshes per second; 0 keeps it still.
    pub substrate_update: f32,
    pub substrate_roughness: f32,
    pub substrate_distortion: f32,

    pub saturation: f32,
    pub contrast: f32,
    pub brightness: f32,

    /// Attributes declared by the active style, by name.
    pub style_values: BTreeMap<String, f32>,
}

impl Default for ConfigValues {
    fn default() -> Self {
        Self {
            style: StyleId::default(),
            color_depth: 1,
            render_scale: 1,
            antialiasing: 1,
            depth_range: [8.0, 50.0],
            atmosphere_tint: [1.0, 1.0, 1.0],
            atmosphere_range: [25.0, 300.0],
            substrate_texture: DEFAULT_SUBSTRATE_TEXTURE.to_owned(),
            substrate_color: [1.0, 1.0, 1.0],
            substrate_shading: 0.5,
            substrate_light_dir: 180.0,
            substrate_light_tilt: 45.0,
            substrate_scale: 1.0,
            substrate_update: 0.0,
            substrate_roughness: 1.0,
            substrate_distortion: 1.0,
            saturation: 1.0,
            contrast: 1.0,
            brightness: 1.0,
            style_values: BTreeMap::new(),
        }
    }
}

impl ConfigValues {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Render-scale factor of the `render_scale` enum: 0.5, 1.0 or 2.0.
    #[must_use]
    pub fn render_scale_factor(&self) -> f32 {
        2f32.powi(self.render_scale.min(2) as i32) / 2.0
    }

    /// Substrate refresh interval in milliseconds, 0 when disabled.
    #[must_use]
    pub fn substrate_interval_ms(&self) -> f32 {
        if self.substrate_update > 0.0 {
            1000.0 / self.substrate_update
        } else {
            0.0
        }
    }

    /// Sets one style attribute, builder style.
    #[must_use]
    pub fn with_style_value(mut self, name: &str, value: f32) -> Self {
        self.style_values.insert(name.to_owned(), value);
        self
    }
}
