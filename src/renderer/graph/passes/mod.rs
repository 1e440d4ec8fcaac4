//! Concrete render passes.

pub mod hud;
pub mod present;
pub mod quad;
pub mod scene;

pub use hud::HudPass;
pub use present::PresentPass;
pub use quad::{QuadPass, ShaderSource};
pub use scene::ScenePass;
