//! CLI context shared by all commands

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::OutputFormat;
use minerkit_hardware::{HardwareSnapshot, ProbeConfig};
use minerkit_kernel::DriverVersion;
use minerkit_kernel::config::load_config;
use minerkit_plugins::BMinerPlugin;
use std::path::{Path, PathBuf};

/// Plugin and hardware sources a command works against
pub struct CliContext {
    pub plugin: BMinerPlugin,
    pub output: OutputFormat,
    snapshot_path: Option<PathBuf>,
    driver: Option<DriverVersion>,
    probe: ProbeConfig,
}

impl CliContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let plugin = match &cli.plugin_root {
            Some(root) => BMinerPlugin::new().with_plugin_root(root),
            None => BMinerPlugin::new(),
        };

        Ok(Self {
            plugin,
            output: cli.output.unwrap_or_default(),
            snapshot_path: cli.snapshot.clone(),
            driver: cli.driver,
            probe: probe_config(cli)?,
        })
    }

    pub fn plugin_root(&self) -> PathBuf {
        self.plugin.plugin_root()
    }

    /// Devices from `--snapshot`, or probed from the machine.
    pub fn hardware(&self) -> anyhow::Result<HardwareSnapshot> {
        let mut snapshot = match &self.snapshot_path {
            Some(path) => load_snapshot(path)?,
            None => HardwareSnapshot::detect(&self.probe),
        };
        if let Some(driver) = self.driver {
            tracing::debug!(driver = %driver, "driver version overridden");
            snapshot.nvidia_driver = Some(driver);
        }
        Ok(snapshot)
    }
}

fn load_snapshot(path: &Path) -> Result<HardwareSnapshot, CliError> {
    load_config(path).map_err(|e| CliError::Snapshot {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn probe_config(cli: &Cli) -> Result<ProbeConfig, CliError> {
    let mut config = ProbeConfig::new();
    if let Some(path) = &cli.nvidia_smi {
        config = config.with_nvidia_smi(path).map_err(CliError::ProbeConfig)?;
    }
    if let Some(path) = &cli.rocm_smi {
        config = config.with_rocm_smi(path).map_err(CliError::ProbeConfig)?;
    }
    if cli.skip_nvidia {
        config = config.without_nvidia();
    }
    if cli.skip_amd {
        config = config.without_amd();
    }
    Ok(config)
}
