//! HUD Pass
//!
//! Draws two lines of overlay text: a fixed title naming the renderer and
//! active style, and a statistics line refreshed about once per second.
//!
//! Frame time is the difference between consecutive host wall clocks, so a
//! host that replays frames at a fixed rate gets exact statistics.

use log::trace;

use crate::host::HudText;
use crate::renderer::graph::pass::{PassContext, PassKind, PassState, RenderPass};
use crate::utils::{FrameStats, FrameTimer};

pub const HUD_PASS_NAME: &str = "[hud]";

const TEXT_COLOR: [f32; 4] = [0.3, 0.3, 0.3, 1.0];

/// Formats the statistics line.
#[must_use]
pub fn stats_line(width: u32, height: u32, stats: FrameStats) -> String {
    format!(
        "Resolution [{width}, {height}]      FPS: {} -> each frame: {} us",
        stats.fps, stats.average_frame_us
    )
}

pub struct HudPass {
    enabled: bool,
    state: PassState,
    title: String,
    stats: String,
    timer: FrameTimer,
    last_wall_clock_ms: Option<f64>,
}

impl HudPass {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            enabled: true,
            state: PassState::Uninitialized,
            title: title.into(),
            stats: String::new(),
            timer: FrameTimer::new(),
            last_wall_clock_ms: None,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn stats(&self) -> &str {
        &self.stats
    }

    /// Accumulates one frame. The statistics line is rewritten only when
    /// the timer's window closes.
    pub fn tick(&mut self, elapsed_us: u64, width: u32, height: u32) {
        if let Some(stats) = self.timer.accumulate(elapsed_us) {
            self.stats = stats_line(width, height, stats);
            trace!("HUD: {}", self.stats);
        }
    }

    /// Title and statistics placed for a `width` x `height` viewport.
    #[must_use]
    pub fn overlay(&self, width: u32, height: u32) -> [HudText; 2] {
        let (w, h) = (width as f32, height as f32);
        [
            HudText {
                text: self.title.clone(),
                position: [w * 0.01, h * 0.97],
                color: TEXT_COLOR,
            },
            HudText {
                text: self.stats.clone(),
                position: [w * 0.01, h * 0.95],
                color: TEXT_COLOR,
            },
        ]
    }
}

impl RenderPass for HudPass {
    fn name(&self) -> &str {
        HUD_PASS_NAME
    }

    fn kind(&self) -> PassKind {
        PassKind::Hud
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
        let (width, height) = ctx
            .targets
            .descriptor(0)
            .map_or((0, 0), |desc| (desc.width, desc.height));

        let now = ctx.frame.wall_clock_ms;
        let elapsed_us = self
            .last_wall_clock_ms
            .map_or(0, |last| ((now - last).max(0.0) * 1000.0) as u64);
        self.last_wall_clock_ms = Some(now);
        self.tick(elapsed_us, width, height);

        let overlay = self.overlay(ctx.frame.viewport_width, ctx.frame.viewport_height);
        ctx.host.draw_hud(&overlay, &ctx.targets.present_targets());
        self.state = PassState::Active;
    }

    fn as_hud(&self) -> Option<&HudPass> {
        Some(self)
    }
}
