use crate::algorithm::{MiningPair, SupportedAlgorithms};
use crate::device::{Device, DriverVersion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub mod error;
pub use error::PluginError;


/// Plugin result type using the typed [`PluginError`].
pub type PluginResult<T> = Result<T, PluginError>;

// ============================================================================
// 插件元数据
// ============================================================================

/// 插件元数据
/// Plugin metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// 插件唯一标识
    /// Unique plugin identifier, also the name of the plugin root directory
    pub uuid: Uuid,
    /// 插件名称
    /// Plugin name
    pub name: String,
    /// 插件版本
    /// Plugin version as `major.minor`
    pub version: (u32, u32),
    /// 插件作者
    /// Plugin author
    pub author: Option<String>,
}

impl PluginMetadata {
    pub fn new(uuid: Uuid, name: &str) -> Self {
        Self {
            uuid,
            name: name.to_string(),
            version: (1, 0),
            author: None,
        }
    }

    pub fn with_version(mut self, major: u32, minor: u32) -> Self {
        self.version = (major, minor);
        self
    }

    pub fn with_author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    /// `major.minor` string form of [`Self::version`].
    pub fn version_string(&self) -> String {
        format!("{}.{}", self.version.0, self.version.1)
    }
}

// ============================================================================
// 插件 trait
// ============================================================================

/// 矿工插件 trait
/// Miner plugin trait
///
/// A plugin decides which algorithms each device may run, which mining pairs
/// may share one worker process, and produces [`Miner`] instances that turn a
/// group of pairs into a worker command line.
pub trait MinerPlugin: Send + Sync {
    /// 获取插件元数据
    /// Get plugin metadata
    fn metadata(&self) -> &PluginMetadata;

    /// 获取插件 UUID（便捷方法）
    /// Get plugin UUID (convenience method)
    fn plugin_uuid(&self) -> Uuid {
        self.metadata().uuid
    }

    /// 获取支持的算法
    /// Map each eligible device to the algorithms it can run.
    ///
    /// `installed_driver` is the machine-wide NVIDIA driver version, `None`
    /// when no NVIDIA driver is installed.
    fn supported_algorithms(
        &self,
        devices: &[Device],
        installed_driver: Option<DriverVersion>,
    ) -> SupportedAlgorithms;

    /// 是否可以合并到同一进程
    /// Whether two mining pairs may run inside one worker process.
    fn can_group(&self, a: &MiningPair, b: &MiningPair) -> bool;

    /// 创建矿工实例
    /// Create a miner carrying the plugin's loaded launch settings.
    fn create_miner(&self) -> Box<dyn Miner>;
}

/// Plugins that load persisted internal settings from their root directory.
pub trait InitInternals {
    /// Load settings overrides from `plugin_root`. Runs once; repeated calls
    /// keep the first result.
    fn init_internals(&self, plugin_root: &Path);
}

/// Plugins that can report missing files of their binary package.
pub trait BinaryPackageMissingFilesChecker {
    /// Names of required files absent from the plugin's binary directory.
    fn check_binary_package_missing_files(&self) -> Vec<String>;
}

/// Where a miner keeps its executable and which directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinAndCwdPaths {
    /// Full path of the worker executable
    pub binary: PathBuf,
    /// Working directory of the worker process, also the binaries root
    pub cwd: PathBuf,
}

/// 矿工实例
/// A worker launch under construction.
pub trait Miner: Send {
    /// Assign the group of pairs this worker will mine.
    fn set_mining_pairs(&mut self, pairs: Vec<MiningPair>) -> PluginResult<()>;

    /// Mining pairs currently assigned.
    fn mining_pairs(&self) -> &[MiningPair];

    /// User supplied extra worker parameters, e.g. `-intensity 8 -nofee`.
    fn set_extra_launch_parameters(&mut self, text: &str);

    /// Executable and working directory of the worker.
    fn bin_and_cwd_paths(&self) -> BinAndCwdPaths;

    /// Full worker argument vector for the assigned pairs.
    fn command_line(&self, pool_url: &str, username: &str, api_port: u16)
    -> PluginResult<Vec<String>>;

    /// Environment variables the worker process is started with.
    fn environment(&self) -> BTreeMap<String, String>;
}
