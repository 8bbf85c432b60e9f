//! Persisted plugin internals
//!
//! Every plugin ships built-in launch settings. A user may override them by
//! dropping files into `<plugin_root>/internals/`:
//!
//! - `MinerOptionsPackage.{json,yaml,yml,toml}`
//! - `MinerSystemEnvironmentVariables.{json,yaml,yml,toml}`
//!
//! A well-formed file replaces the built-in package as a whole; there is no
//! per-field merge. An absent or malformed file leaves the built-ins in
//! place. When no file exists the built-ins are written out as JSON so the
//! user has a template to edit.

use crate::environment::MinerSystemEnvironmentVariables;
use crate::options::MinerOptionsPackage;
use minerkit_kernel::config::{find_config_file, load_config, save_config};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Directory under the plugin root holding override files.
pub const INTERNALS_DIR: &str = "internals";
/// File stem of the options package override.
pub const OPTIONS_PACKAGE_STEM: &str = "MinerOptionsPackage";
/// File stem of the environment variables override.
pub const ENVIRONMENT_STEM: &str = "MinerSystemEnvironmentVariables";

/// Launch settings a plugin runs with after startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MinerInternals {
    pub options: MinerOptionsPackage,
    pub environment: MinerSystemEnvironmentVariables,
}

impl MinerInternals {
    /// Load both override files, falling back to the given built-ins.
    pub fn load(
        plugin_root: &Path,
        default_options: &MinerOptionsPackage,
        default_environment: &MinerSystemEnvironmentVariables,
    ) -> Self {
        Self {
            options: load_options(plugin_root, default_options),
            environment: load_or_write_defaults(plugin_root, ENVIRONMENT_STEM, default_environment),
        }
    }
}

/// Options package override from `plugin_root`, or `built_in_defaults`.
pub fn load_options(plugin_root: &Path, built_in_defaults: &MinerOptionsPackage) -> MinerOptionsPackage {
    load_or_write_defaults(plugin_root, OPTIONS_PACKAGE_STEM, built_in_defaults)
}

/// Read `<plugin_root>/internals/<stem>.*` if present and well-formed.
pub fn read_internal_settings<T>(plugin_root: &Path, stem: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let path = find_config_file(plugin_root.join(INTERNALS_DIR), stem)?;
    match load_config(&path) {
        Ok(settings) => {
            tracing::info!(path = %path.display(), "using user internals override");
            Some(settings)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed internals file");
            None
        }
    }
}

fn template_path(plugin_root: &Path, stem: &str) -> PathBuf {
    plugin_root.join(INTERNALS_DIR).join(format!("{stem}.json"))
}

fn load_or_write_defaults<T>(plugin_root: &Path, stem: &str, defaults: &T) -> T
where
    T: DeserializeOwned + Serialize + Clone,
{
    if let Some(settings) = read_internal_settings(plugin_root, stem) {
        return settings;
    }

    // Keep a malformed user file for inspection rather than overwriting it.
    if find_config_file(plugin_root.join(INTERNALS_DIR), stem).is_none() {
        let path = template_path(plugin_root, stem);
        if let Err(e) = save_config(&path, defaults) {
            tracing::warn!(path = %path.display(), error = %e, "could not write internals template");
        }
    }

    defaults.clone()
}
