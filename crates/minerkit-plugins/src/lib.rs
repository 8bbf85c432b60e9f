//! 矿工插件模块
//!
//! Miner plugins for minerkit.
//!
//! - [`options`]: launch option schema, extra-parameter parsing and argv rendering
//! - [`environment`]: worker environment variables
//! - [`internals`]: user override files under `<plugin_root>/internals/`
//! - [`binaries`]: required-file checks for a plugin's binary package
//! - [`bminer`]: the BMiner plugin

pub mod binaries;
pub mod bminer;
pub mod environment;
pub mod internals;
pub mod options;

pub use bminer::{BMINER_UUID, BMiner, BMinerPlugin};
pub use environment::{DeviceEnvironmentVariables, EnvironmentVariable, MinerSystemEnvironmentVariables};
pub use internals::{MinerInternals, load_options};
pub use minerkit_kernel::{
    BinaryPackageMissingFilesChecker, InitInternals, Miner, MinerPlugin, PluginError,
    PluginMetadata, PluginResult,
};
pub use options::{
    LaunchOverrides, MinerOption, MinerOptionType, MinerOptionsPackage, OptionValue,
    parse_extra_launch_parameters, render_arguments,
};
