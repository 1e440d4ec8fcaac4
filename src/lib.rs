//! # Brushwork
//!
//! A render-operation graph for stylized viewport rendering. The graph
//! replaces a host application's viewport renderer with an ordered list of
//! passes: one scene pass fills a G-buffer of color, depth and painted
//! control targets, a chain of full-screen quad passes turns it into
//! watercolor, oil paint or charcoal, and the result is presented with the
//! host's UI drawn on top.
//!
//! The host stays in charge of GPU objects and the scene; the graph only
//! talks to it through the traits in [`host`].
//!
//! ```rust,ignore
//! use brushwork::{ConfigNode, ConfigValues, NprOverride, PipelineConfig};
//! use brushwork::host::headless::HeadlessHost;
//!
//! let mut host = HeadlessHost::new();
//! let mut npr = NprOverride::new(PipelineConfig::default(), &mut host)?;
//! let node = ConfigNode::new();
//!
//! node.evaluate(&mut npr, &ConfigValues::default(), &mut host);
//! npr.render(&mut host)?;
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod commands;
pub mod config;
pub mod errors;
pub mod host;
pub mod renderer;
pub mod styles;
pub mod utils;

pub use commands::{Command, CommandOutput, dispatch};
pub use config::{ConfigNode, ConfigValues, PipelineConfig};
pub use errors::{BrushworkError, Result};
pub use host::Host;
pub use renderer::core::{FloatParam, MatrixParam, Shared};
pub use renderer::graph::{RenderGraph, RenderPass, TargetRegistry};
pub use renderer::{ColorDepth, EffectParameters, EngineSettings, NprOverride};
pub use styles::{StyleId, StylePipeline};
