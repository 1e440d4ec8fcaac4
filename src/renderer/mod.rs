//! Renderer
//!
//! - [`core`]: GPU handles and shared parameter sources
//! - [`graph`]: targets, shader parameters, passes and the pass list
//! - [`settings`]: engine settings and effect parameters
//! - [`pipeline`]: [`NprOverride`], which builds and runs the graph

pub mod core;
pub mod graph;
pub mod pipeline;
pub mod settings;

pub use pipeline::NprOverride;
pub use settings::{ColorDepth, EffectParameters, EngineSettings};
