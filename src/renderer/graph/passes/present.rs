//! Present Pass
//!
//! Terminal pass. Hands the registry's designated present pair (color +
//! depth) back to the host viewport.

use log::warn;

use crate::renderer::graph::pass::{PassContext, PassKind, PassState, RenderPass};

pub const PRESENT_PASS_NAME: &str = "[present]";

#[derive(Debug)]
pub struct PresentPass {
    enabled: bool,
    state: PassState,
}

impl Default for PresentPass {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentPass {
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            state: PassState::Uninitialized,
        }
    }
}

impl RenderPass for PresentPass {
    fn name(&self) -> &str {
        PRESENT_PASS_NAME
    }

    fn kind(&self) -> PassKind {
        PassKind::Present
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn state(&self) -> PassState {
        self.state
    }

    fn execute(&mut self, ctx: &mut PassContext<'_>) {
        let [color, depth] = ctx.targets.present_targets();
        if color.is_none() {
            warn!("Present target is missing, the viewport shows the host's own image");
        }
        ctx.host.present(color, depth);
        self.state = PassState::Active;
    }
}
