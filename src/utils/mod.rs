//! Utility Module
//!
//! - [`FrameTimer`]: frame-time accumulation behind the HUD statistics

pub mod frame_timer;

pub use frame_timer::{FrameStats, FrameTimer};
