//! Configuration for hardware probing

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which vendor tools to run when enumerating devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// `nvidia-smi` executable, looked up on `PATH` when not absolute
    pub nvidia_smi: PathBuf,

    /// `rocm-smi` executable, looked up on `PATH` when not absolute
    pub rocm_smi: PathBuf,

    /// Skip NVIDIA probing entirely
    pub skip_nvidia: bool,

    /// Skip AMD probing entirely
    pub skip_amd: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            nvidia_smi: PathBuf::from("nvidia-smi"),
            rocm_smi: PathBuf::from("rocm-smi"),
            skip_nvidia: false,
            skip_amd: false,
        }
    }
}

impl ProbeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `nvidia-smi` binary
    pub fn with_nvidia_smi(mut self, path: impl Into<PathBuf>) -> Result<Self, &'static str> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err("nvidia_smi path must not be empty");
        }
        self.nvidia_smi = path;
        Ok(self)
    }

    /// Use a specific `rocm-smi` binary
    pub fn with_rocm_smi(mut self, path: impl Into<PathBuf>) -> Result<Self, &'static str> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err("rocm_smi path must not be empty");
        }
        self.rocm_smi = path;
        Ok(self)
    }

    pub fn without_nvidia(mut self) -> Self {
        self.skip_nvidia = true;
        self
    }

    pub fn without_amd(mut self) -> Self {
        self.skip_amd = true;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
