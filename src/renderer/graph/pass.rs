//! Render Pass Trait
//!
//! Every unit of work in the graph implements [`RenderPass`]. Passes run in
//! registration order, once per frame, on the host's render thread.
//!
//! # Per-pass state machine
//!
//! ```text
//! Uninitialized ──shader()──▶ ShaderCompiled ──execute()──▶ Active ◀─┐
//!                                   ▲                         │      │
//!                                   └──────shader()──── ShaderReset  │
//!                                                             │      │
//!                  release() from any state ──▶ Destroyed     └──────┘
//! ```
//!
//! Scene, HUD and present passes never compile a shader; they go straight
//! from `Uninitialized` to `Active` on their first execution.

use super::passes::hud::HudPass;
use super::passes::quad::QuadPass;
use super::passes::scene::ScenePass;
use super::targets::TargetRegistry;
use crate::host::{FrameContext, Host};
use crate::renderer::settings::EngineSettings;

/// The concrete kind of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    Scene,
    Quad,
    Hud,
    Present,
}

/// Lifecycle state of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PassState {
    #[default]
    Uninitialized,
    ShaderCompiled,
    Active,
    ShaderReset,
    Destroyed,
}

/// Everything a pass may touch while executing.
pub struct PassContext<'a> {
    pub host: &'a mut dyn Host,
    pub targets: &'a TargetRegistry,
    pub settings: &'a EngineSettings,
    pub frame: &'a FrameContext,
}

/// A named unit of GPU work.
///
/// Failures inside [`execute`](RenderPass::execute) are absorbed by the
/// pass: it logs, draws nothing (or draws with stale state) and the frame
/// carries on.
pub trait RenderPass {
    /// Unique name, also the key of the pass's declared outputs.
    fn name(&self) -> &str;

    fn kind(&self) -> PassKind;

    fn enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    fn state(&self) -> PassState;

    fn execute(&mut self, ctx: &mut PassContext<'_>);

    /// Releases every host resource the pass owns.
    fn release(&mut self, _host: &mut dyn Host) {}

    fn as_quad(&self) -> Option<&QuadPass> {
        None
    }

    fn as_quad_mut(&mut self) -> Option<&mut QuadPass> {
        None
    }

    fn as_scene(&self) -> Option<&ScenePass> {
        None
    }

    fn as_hud(&self) -> Option<&HudPass> {
        None
    }
}
