//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`BrushworkError`] covers the failure modes of the
//! render-operation graph:
//! - Lookups of targets, passes and parameters by name or index
//! - GPU resource allocation reported by the host
//! - Configuration and command-surface mismatches
//! - Frame setup failures (no usable frame context)
//!
//! Per-pass failures never cross a pass boundary. They are logged and the
//! pass degrades to a no-op draw; only frame setup, checked lookups and
//! configuration loading surface an `Err` to the caller.
//!
//! # Usage
//!
//! ```rust,ignore
//! use brushwork::errors::{BrushworkError, Result};
//!
//! fn select_pass(index: usize, len: usize) -> Result<usize> {
//!     if index >= len {
//!         return Err(BrushworkError::IndexOutOfRange { context: "render pass", index, len });
//!     }
//!     Ok(index)
//! }
//! ```

use thiserror::Error;

/// The main error type for the Brushwork pipeline.
#[derive(Error, Debug)]
pub enum BrushworkError {
    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// A named target, pass or parameter does not exist.
    #[error("{kind} not found: {name}")]
    ResourceNotFound {
        /// What kind of resource was looked up (e.g. "render target")
        kind: &'static str,
        /// The name that failed to resolve
        name: String,
    },

    /// An index supplied by a caller is outside the valid range.
    #[error("Index out of range: {context} (index: {index}, len: {len})")]
    IndexOutOfRange {
        /// Description of what was being accessed
        context: &'static str,
        /// The invalid index
        index: usize,
        /// Number of valid entries
        len: usize,
    },

    // ========================================================================
    // GPU Resource Errors
    // ========================================================================
    /// The host could not create a target, texture, sampler or shader instance.
    #[error("Failed to allocate {kind}: {name}")]
    ResourceAllocation {
        /// Resource kind ("render target", "texture", "shader instance", ...)
        kind: &'static str,
        /// Name, path or technique of the resource
        name: String,
    },

    /// A parameter push was attempted without a bound shader instance.
    #[error("Cannot set parameters of pass '{pass}': no shader instance ({parameters} pending)")]
    NullParameterTarget {
        /// Pass (or shader) the parameters belong to
        pass: String,
        /// Number of parameters that were not pushed
        parameters: usize,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A command expected a live render override but none is registered.
    #[error("Configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    /// The style name does not name a registered style.
    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    /// The frame-setup step could not obtain a valid frame context.
    #[error("Frame setup failed: {0}")]
    FrameSetup(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// Image header could not be read.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Alias for `Result<T, BrushworkError>`.
pub type Result<T> = std::result::Result<T, BrushworkError>;
