//! Stylization Pipelines
//!
//! A style contributes its own targets and quad passes to the graph, and
//! owns the configuration attributes that drive them. Styles are keyed by
//! [`StyleId`]; [`StyleId::pipeline`] returns the registered
//! [`StylePipeline`] for each variant.
//!
//! | Style        | Targets | Passes |
//! |--------------|---------|--------|
//! | `Framework`  | 0       | 0      |
//! | `Watercolor` | 1       | 8      |
//! | `Oil`        | 6       | 21     |
//! | `Charcoal`   | 5       | 12     |
//! | `Sandbox`    | 1       | 1      |

pub mod charcoal;
pub mod oil;
pub mod sandbox;
pub mod watercolor;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::BrushworkError;
use crate::renderer::graph::GraphBuilder;
use crate::renderer::settings::{EffectParameters, EngineSettings};

/// Every supported stylization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum StyleId {
    /// The bare framework: fixed passes only.
    Framework,
    #[default]
    Watercolor,
    Oil,
    Charcoal,
    Sandbox,
}

impl StyleId {
    pub const ALL: [StyleId; 5] = [Self::Framework, Self::Watercolor, Self::Oil, Self::Charcoal, Self::Sandbox];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Framework => "Framework",
            Self::Watercolor => "Watercolor",
            Self::Oil => "Oil",
            Self::Charcoal => "Charcoal",
            Self::Sandbox => "Sandbox",
        }
    }

    /// Position in [`StyleId::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// The registered pipeline of this style.
    #[must_use]
    pub fn pipeline(self) -> &'static dyn StylePipeline {
        match self {
            Self::Framework => &FrameworkStyle,
            Self::Watercolor => &watercolor::WatercolorStyle,
            Self::Oil => &oil::OilStyle,
            Self::Charcoal => &charcoal::CharcoalStyle,
            Self::Sandbox => &sandbox::SandboxStyle,
        }
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleId {
    type Err = BrushworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| BrushworkError::UnknownStyle(s.to_owned()))
    }
}

// ============================================================================
// Attribute schema
// ============================================================================

/// One user-facing configuration attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub default: f32,
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl AttributeSpec {
    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        let value = self.min.map_or(value, |min| value.max(min));
        self.max.map_or(value, |max| value.min(max))
    }
}

/// The style-specific attributes exposed by the configuration node.
#[derive(Debug, Clone, Default)]
pub struct AttributeSchema {
    attributes: Vec<AttributeSpec>,
}

impl AttributeSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an attribute. Re-declaring a name replaces the old entry.
    pub fn declare(&mut self, name: &'static str, default: f32, min: Option<f32>, max: Option<f32>) {
        let spec = AttributeSpec { name, default, min, max };
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => *existing = spec,
            None => self.attributes.push(spec),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.attributes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Inputs of one [`StylePipeline::compute_parameters`] call.
pub struct StyleInputs<'a> {
    pub values: &'a BTreeMap<String, f32>,
    pub schema: &'a AttributeSchema,
    pub settings: &'a EngineSettings,
    pub effects: &'a EffectParameters,
}

impl StyleInputs<'_> {
    /// The configured value of `name`, clamped to its declared range.
    /// Falls back to the declared default, then to `0.0`.
    #[must_use]
    pub fn value(&self, name: &str) -> f32 {
        let spec = self.schema.get(name);
        let raw = self
            .values
            .get(name)
            .copied()
            .or_else(|| spec.map(|s| s.default))
            .unwrap_or(0.0);
        spec.map_or(raw, |s| s.clamp(raw))
    }

    #[must_use]
    pub fn render_scale(&self) -> f32 {
        self.settings.render_scale.scalar()
    }
}

/// The four hooks a style registers.
pub trait StylePipeline: Sync {
    fn id(&self) -> StyleId;

    /// Appends the style's targets, after the fixed G-buffer targets.
    fn add_targets(&self, _builder: &mut GraphBuilder<'_>) {}

    /// Appends the style's quad passes, after edge detection.
    fn add_passes(&self, _builder: &mut GraphBuilder<'_>) {}

    /// Declares the style's configuration attributes.
    fn initialize_parameters(&self, _schema: &mut AttributeSchema, _settings: &EngineSettings, _effects: &EffectParameters) {}

    /// Writes configured values into the effect parameters.
    fn compute_parameters(&self, _inputs: &StyleInputs<'_>) {}

    /// Technique of the substrate lighting pass.
    fn substrate_lighting_technique(&self) -> &'static str {
        "deferredLighting"
    }
}

/// The fixed pipeline with nothing added.
pub struct FrameworkStyle;

impl StylePipeline for FrameworkStyle {
    fn id(&self) -> StyleId {
        StyleId::Framework
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_names_round_trip() {
        for style in StyleId::ALL {
            assert_eq!(style.name().parse::<StyleId>().ok(), Some(style));
            assert_eq!(style.pipeline().id(), style);
        }
    }

    #[test]
    fn test_unknown_style() {
        let err = "Pastel".parse::<StyleId>().unwrap_err();
        assert!(matches!(err, BrushworkError::UnknownStyle(name) if name == "Pastel"));
    }

    #[test]
    fn test_inputs_clamp_to_schema() {
        let mut schema = AttributeSchema::new();
        schema.declare("radius", 10.0, Some(1.0), Some(40.0));
        let settings = EngineSettings::default();
        let effects = EffectParameters::default();
        let mut values = BTreeMap::new();
        values.insert("radius".to_owned(), 99.0);

        let inputs = StyleInputs {
            values: &values,
            schema: &schema,
            settings: &settings,
            effects: &effects,
        };
        assert!((inputs.value("radius") - 40.0).abs() < f32::EPSILON);

        values.clear();
        let inputs = StyleInputs {
            values: &values,
            schema: &schema,
            settings: &settings,
            effects: &effects,
        };
        assert!((inputs.value("radius") - 10.0).abs() < f32::EPSILON);
        assert!(inputs.value("missing").abs() < f32::EPSILON);
    }
}
