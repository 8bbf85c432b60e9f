use std::path::PathBuf;

/// Failures surfaced by CLI commands
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Snapshot error in {}: {message}", .path.display())]
    Snapshot { path: PathBuf, message: String },

    #[error("Probe configuration error: {0}")]
    ProbeConfig(&'static str),

    #[error("No device can run {0}")]
    NoEligibleDevices(String),

    #[error("Plugin error: {0}")]
    Plugin(#[from] minerkit_kernel::PluginError),

    #[error("Binary package incomplete, missing: {}", .0.join(", "))]
    MissingFiles(Vec<String>),
}
