/// Accumulation window after which statistics are refreshed, in microseconds.
pub const STATS_WINDOW_US: u64 = 1_000_000;

/// Frame statistics over one accumulation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Frames counted in the window.
    pub fps: u32,
    /// Average frame duration in microseconds.
    pub average_frame_us: u64,
}

/// Frame-time accumulator behind the HUD statistics line.
#[derive(Debug)]
pub struct FrameTimer {
    frame_count: u32,
    accumulated_us: u64,
    pub current: FrameStats,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            accumulated_us: 0,
            current: FrameStats::default(),
        }
    }

    /// Adds one frame of `elapsed_us`. Once the window is exceeded the
    /// statistics are refreshed, the accumulators reset and the new
    /// statistics returned.
    pub fn accumulate(&mut self, elapsed_us: u64) -> Option<FrameStats> {
        self.frame_count += 1;
        self.accumulated_us = self.accumulated_us.saturating_add(elapsed_us);

        if self.accumulated_us > STATS_WINDOW_US {
            self.current = FrameStats {
                fps: self.frame_count,
                average_frame_us: self.accumulated_us / u64::from(self.frame_count),
            };

            // Reset counter
            self.accumulated_us = 0;
            self.frame_count = 0;

            return Some(self.current);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_refresh_after_window() {
        let mut timer = FrameTimer::new();
        for _ in 0..59 {
            assert!(timer.accumulate(16_000).is_none());
        }
        // 60 * 16ms = 960ms, still inside the window
        assert!(timer.accumulate(16_000).is_none());

        let stats = timer.accumulate(50_000).expect("window exceeded");
        assert_eq!(stats.fps, 61);
        assert_eq!(stats.average_frame_us, 1_010_000 / 61);
    }

    #[test]
    fn test_exactly_one_second_does_not_refresh() {
        let mut timer = FrameTimer::new();
        assert!(timer.accumulate(STATS_WINDOW_US).is_none());
        assert!(timer.accumulate(1).is_some());
    }
}
