//! Typed errors for the plugin sub-system.

use thiserror::Error;

/// Errors that can occur while preparing a miner launch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PluginError {
    /// A launch was requested before any mining pair was assigned.
    #[error("No mining pairs assigned to miner")]
    NoMiningPairs,

    /// The assigned mining pairs cannot share one worker process.
    #[error("Mining pairs cannot be grouped: {0}")]
    IncompatiblePairs(String),

    /// An operation was attempted while the plugin was in an incompatible state.
    #[error("Plugin not in valid state: expected {expected}, got {actual}")]
    InvalidState {
        /// The state(s) that were expected.
        expected: String,
        /// The state the plugin was actually in.
        actual: String,
    },

    /// Plugin configuration is invalid or missing.
    #[error("Plugin configuration error: {0}")]
    ConfigError(String),

    /// An I/O error surfaced during a plugin operation.
    #[error("Plugin I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A (de)serialization error surfaced during a plugin operation.
    #[error("Plugin serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Catch-all for errors that don't fit the above categories.
    #[error("{0}")]
    Other(String),
}
