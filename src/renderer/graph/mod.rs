//! Render-Operation Graph
//!
//! - [`TargetRegistry`]: named render targets, per-pass outputs and the present pair
//! - [`ShaderParameterSet`]: per-pass shader bindings, pushed every frame
//! - [`QuadTexture`]: a file texture with scale / UV offset metadata
//! - [`RenderPass`]: scene, quad, HUD and present passes
//! - [`RenderGraph`]: the ordered pass list
//! - [`GraphBuilder`]: fluent pass declaration used while building

pub mod builder;
pub mod graph;
pub mod params;
pub mod pass;
pub mod passes;
pub mod quad_texture;
pub mod targets;
pub mod velocity;

pub use builder::{GraphBuilder, QuadPassBuilder};
pub use graph::RenderGraph;
pub use params::{SamplerStateDesc, ShaderParameterSet};
pub use pass::{PassContext, PassKind, PassState, RenderPass};
pub use passes::{HudPass, PresentPass, QuadPass, ScenePass, ShaderSource};
pub use quad_texture::QuadTexture;
pub use targets::{RenderTargetDescriptor, TargetRegistry};
pub use velocity::VelocityTracker;
