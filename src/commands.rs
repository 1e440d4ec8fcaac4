//! Scripting Command Surface
//!
//! [`dispatch`] runs one [`Command`] against the live override. Every
//! command needs an override instance; without one it fails with
//! [`BrushworkError::ConfigurationMismatch`]. Index arguments are checked
//! and fail with [`BrushworkError::IndexOutOfRange`] instead of touching
//! anything.
//!
//! Registration of the configuration node goes through the caller's
//! [`ConfigNode`], which keeps its own flag in step with the host.

use log::{debug, warn};

use crate::config::ConfigNode;
use crate::errors::{BrushworkError, Result};
use crate::host::Host;
use crate::renderer::pipeline::NprOverride;
use crate::styles::StyleId;

/// One scripting operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Name of the active style.
    QueryStyle,
    /// Index of the active style in [`StyleId::ALL`].
    QueryStyleIndex,
    /// Requests a style switch, applied on the next update.
    SetStyle(StyleId),
    ResetStylization,
    ListTargets,
    ListPasses,
    /// Shows the target at this index through the debugger pass.
    SetActiveTarget(usize),
    PassEnabled(usize),
    SetPassEnabled(usize, bool),
    /// Recompiles the shader of the quad pass at this index.
    ReloadPassShader(usize),
    /// Recompiles every quad pass shader.
    RefreshShaders,
    RendererName,
    /// Debugger channel mask.
    PresentChannels([bool; 4]),
    PresentColorTransform(u32),
    RegisterConfigNode(bool),
    /// Freezes the gamma state, or hands it back to the host.
    GammaFreeze(bool),
}

/// Result of a successful [`dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    None,
    Text(String),
    Index(usize),
    Names(Vec<String>),
    Bool(bool),
    Count(usize),
}

pub fn dispatch(
    npr: Option<&mut NprOverride>,
    node: &mut ConfigNode,
    command: Command,
    host: &mut dyn Host,
) -> Result<CommandOutput> {
    let Some(npr) = npr else {
        warn!("No render override instance was found");
        return Err(BrushworkError::ConfigurationMismatch(format!(
            "no render override instance for {command:?}"
        )));
    };
    debug!("Command {command:?}");

    let output = match command {
        Command::QueryStyle => CommandOutput::Text(npr.settings().style.name().to_owned()),
        Command::QueryStyleIndex => CommandOutput::Index(npr.settings().style.index()),
        Command::SetStyle(style) => {
            npr.request_style(style);
            CommandOutput::None
        }
        Command::ResetStylization => {
            npr.reset_stylization(host)?;
            CommandOutput::None
        }
        Command::ListTargets => CommandOutput::Names(npr.render_targets()),
        Command::ListPasses => CommandOutput::Names(npr.render_passes()),
        Command::SetActiveTarget(index) => {
            npr.change_active_target(index)?;
            CommandOutput::None
        }
        Command::PassEnabled(index) => CommandOutput::Bool(npr.pass_enabled(index)?),
        Command::SetPassEnabled(index, enabled) => {
            npr.set_pass_enabled(index, enabled)?;
            CommandOutput::Bool(enabled)
        }
        Command::ReloadPassShader(index) => CommandOutput::Count(npr.reset_shader_instances(Some(index), host)?),
        Command::RefreshShaders => CommandOutput::Count(npr.reset_shader_instances(None, host)?),
        Command::RendererName => CommandOutput::Text(npr.config().ui_name.clone()),
        Command::PresentChannels(mask) => {
            npr.debug_channels(mask.map(|on| if on { 1.0 } else { 0.0 }));
            CommandOutput::None
        }
        Command::PresentColorTransform(mode) => {
            npr.debug_color_transform(mode);
            CommandOutput::None
        }
        Command::RegisterConfigNode(true) => CommandOutput::Bool(node.register(host)),
        Command::RegisterConfigNode(false) => CommandOutput::Bool(node.deregister(host)),
        Command::GammaFreeze(frozen) => {
            npr.set_gamma_freeze(frozen);
            CommandOutput::None
        }
    };
    Ok(output)
}
