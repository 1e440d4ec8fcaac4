//! Core vocabulary shared by every layer of the graph.
//!
//! - [`handles`]: opaque, `Copy` handles to host-owned GPU objects
//! - [`shared`]: versioned parameter sources aliased by shader parameter sets

pub mod handles;
pub mod shared;

pub use handles::{MeshId, SamplerHandle, ShaderHandle, TargetHandle, TextureHandle};
pub use shared::{FloatParam, MatrixParam, Shared};
