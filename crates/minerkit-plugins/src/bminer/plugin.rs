//! The BMiner plugin entry point.

use super::algorithms::supported_algorithms;
use super::miner::{BINARY_NAME, BMiner};
use super::options::{default_environment, default_options_package};
use crate::binaries::missing_files;
use crate::internals::MinerInternals;
use minerkit_kernel::{
    BinaryPackageMissingFilesChecker, Device, DriverVersion, InitInternals, Miner, MinerPlugin,
    MiningPair, PluginMetadata, SupportedAlgorithms,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use uuid::{Uuid, uuid};

/// Identity BMiner was published under.
pub const BMINER_UUID: Uuid = uuid!("92a7fd10-498d-11e9-87d3-6b57d758e2c6");

/// Directory all plugin roots live in when none is given explicitly.
pub const MINER_PLUGINS_DIR: &str = "miner_plugins";

/// Binaries sub-directory of a plugin root.
pub const BINS_DIR: &str = "bins";

/// Two pairs share a worker when their primary algorithm matches.
///
/// Devices and vendors do not matter: BMiner mines CUDA and AMD cards from
/// one process.
pub fn can_group(a: &MiningPair, b: &MiningPair) -> bool {
    a.algorithm.first_algorithm_type() == b.algorithm.first_algorithm_type()
}

/// BMiner plugin.
pub struct BMinerPlugin {
    metadata: PluginMetadata,
    built_in: Arc<MinerInternals>,
    internals: OnceLock<Arc<MinerInternals>>,
    plugin_root: OnceLock<PathBuf>,
}

impl BMinerPlugin {
    pub fn new() -> Self {
        Self::with_uuid(BMINER_UUID)
    }

    /// Same plugin published under another identity.
    pub fn with_uuid(uuid: Uuid) -> Self {
        Self {
            metadata: PluginMetadata::new(uuid, "BMiner")
                .with_version(1, 2)
                .with_author("Domen Kirn Krefl"),
            built_in: Arc::new(MinerInternals {
                options: default_options_package(),
                environment: default_environment(),
            }),
            internals: OnceLock::new(),
            plugin_root: OnceLock::new(),
        }
    }

    /// Pin the plugin root without loading internals yet.
    pub fn with_plugin_root(self, plugin_root: impl Into<PathBuf>) -> Self {
        let _ = self.plugin_root.set(plugin_root.into());
        self
    }

    /// Root set by [`Self::with_plugin_root`] or the first
    /// [`InitInternals::init_internals`] call, otherwise
    /// `miner_plugins/<uuid>` relative to the working directory.
    pub fn plugin_root(&self) -> PathBuf {
        self.plugin_root
            .get()
            .cloned()
            .unwrap_or_else(|| Path::new(MINER_PLUGINS_DIR).join(self.metadata.uuid.to_string()))
    }

    pub fn bins_root(&self) -> PathBuf {
        self.plugin_root().join(BINS_DIR)
    }

    /// Loaded settings, or the built-ins before initialization.
    pub fn internals(&self) -> Arc<MinerInternals> {
        self.internals
            .get()
            .cloned()
            .unwrap_or_else(|| self.built_in.clone())
    }
}

impl Default for BMinerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl MinerPlugin for BMinerPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    fn supported_algorithms(
        &self,
        devices: &[Device],
        installed_driver: Option<DriverVersion>,
    ) -> SupportedAlgorithms {
        supported_algorithms(&self.metadata.uuid.to_string(), devices, installed_driver)
    }

    fn can_group(&self, a: &MiningPair, b: &MiningPair) -> bool {
        can_group(a, b)
    }

    fn create_miner(&self) -> Box<dyn Miner> {
        Box::new(BMiner::new(self.internals(), self.bins_root()))
    }
}

impl InitInternals for BMinerPlugin {
    /// Internals and binaries always share one root: a root pinned with
    /// [`BMinerPlugin::with_plugin_root`] takes precedence over `plugin_root`.
    fn init_internals(&self, plugin_root: &Path) {
        if self.internals.get().is_some() {
            tracing::debug!(plugin = %self.metadata.name, "internals already initialized");
            return;
        }
        let root = self.plugin_root.get_or_init(|| plugin_root.to_path_buf());
        if root != plugin_root {
            tracing::warn!(
                plugin = %self.metadata.name,
                pinned = %root.display(),
                requested = %plugin_root.display(),
                "plugin root already pinned, loading internals from the pinned root"
            );
        }
        let loaded = MinerInternals::load(root, &self.built_in.options, &self.built_in.environment);
        if self.internals.set(Arc::new(loaded)).is_ok() {
            tracing::info!(
                plugin = %self.metadata.name,
                root = %root.display(),
                "internals initialized"
            );
        }
    }
}

impl BinaryPackageMissingFilesChecker for BMinerPlugin {
    fn check_binary_package_missing_files(&self) -> Vec<String> {
        let bins_root = self.bins_root();
        missing_files(&bins_root, &[BINARY_NAME]).collect()
    }
}
