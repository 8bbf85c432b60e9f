//! Crate-level error types for `minerkit-kernel`.
//!
//! Provides a unified [`KernelError`] that composes errors from every
//! sub-module (plugin, config, IO, serialization, hardware probing) together
//! with [`error_stack::Report`] for context-carrying error propagation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use minerkit_kernel::error::{KernelError, KernelResult};
//! use error_stack::ResultExt;
//!
//! fn read_probe_output() -> KernelResult<String> {
//!     let text = std::fs::read_to_string("nvidia-smi.csv")
//!         .map_err(KernelError::from)
//!         .map_err(error_stack::Report::new)
//!         .attach("reading captured nvidia-smi output")?;
//!     Ok(text)
//! }
//! ```

use thiserror::Error;

/// Crate-level error type for `minerkit-kernel`.
///
/// Wraps each sub-module's typed error via `#[from]` so that the `?`
/// operator converts them automatically. Use
/// [`error_stack::Report<KernelError>`] (via [`KernelResult`]) to attach
/// human-readable context as the error propagates up the call stack.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KernelError {
    /// A configuration-related error (requires the `config` feature).
    #[cfg(feature = "config")]
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A low-level I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A plugin sub-system error.
    #[error("Plugin error: {0}")]
    Plugin(#[from] crate::plugin::PluginError),

    /// Hardware probe output could not be interpreted.
    #[error("Probe error: {0}")]
    Probe(String),

    /// An internal / untyped error described by a message string.
    #[error("{0}")]
    Internal(String),
}

/// Convenience result alias using [`error_stack::Report`].
///
/// Equivalent to `Result<T, error_stack::Report<KernelError>>`.
pub type KernelResult<T> = Result<T, error_stack::Report<KernelError>>;
