//! Compute device snapshots handed to miner plugins by the host.
//!
//! Devices are enumerated once by the host and are immutable afterwards.
//! The installed NVIDIA driver is a machine-wide fact and therefore lives
//! outside [`Device`] as a [`DriverVersion`] passed next to the device list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vendor family of a compute device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "vendor", rename_all = "lowercase")]
#[non_exhaustive]
pub enum DeviceVendor {
    /// AMD GPU, identified by its silicon codename (e.g. `Ellesmere`, `gfx900`)
    Amd { codename: String },
    /// NVIDIA CUDA GPU with its compute capability
    Cuda { sm_major: u32, sm_minor: u32 },
}

impl DeviceVendor {
    pub fn is_amd(&self) -> bool {
        matches!(self, DeviceVendor::Amd { .. })
    }

    pub fn is_cuda(&self) -> bool {
        matches!(self, DeviceVendor::Cuda { .. })
    }
}

impl fmt::Display for DeviceVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceVendor::Amd { codename } => write!(f, "AMD ({codename})"),
            DeviceVendor::Cuda { sm_major, sm_minor } => {
                write!(f, "CUDA (sm_{sm_major}{sm_minor})")
            }
        }
    }
}

/// A single compute device as enumerated by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    /// Stable identifier (the vendor UUID when available)
    pub uuid: String,
    /// Bus / enumeration index used on the worker command line
    pub id: u32,
    /// Marketing name, e.g. `GeForce GTX 1080 Ti`
    pub name: String,
    /// Vendor family and its capability marker
    pub vendor: DeviceVendor,
    /// Total device memory in bytes
    pub memory_bytes: u64,
}

impl Device {
    pub fn cuda(
        uuid: impl Into<String>,
        id: u32,
        name: impl Into<String>,
        sm_major: u32,
        sm_minor: u32,
        memory_bytes: u64,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            id,
            name: name.into(),
            vendor: DeviceVendor::Cuda { sm_major, sm_minor },
            memory_bytes,
        }
    }

    pub fn amd(
        uuid: impl Into<String>,
        id: u32,
        name: impl Into<String>,
        codename: impl Into<String>,
        memory_bytes: u64,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            id,
            name: name.into(),
            vendor: DeviceVendor::Amd {
                codename: codename.into(),
            },
            memory_bytes,
        }
    }
}

/// Error returned when a driver version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid driver version: {0:?}")]
pub struct ParseDriverVersionError(pub String);

/// Installed GPU driver version as a `major.minor` pair.
///
/// Ordering is lexicographic on `(major, minor)`, so `397.44 < 410.48`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriverVersion {
    pub major: u32,
    pub minor: u32,
}

impl DriverVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl FromStr for DriverVersion {
    type Err = ParseDriverVersionError;

    /// Parses `"397.44"`; trailing components (`"535.104.05"`) are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDriverVersionError(s.to_string());
        let mut parts = s.trim().split('.');
        let major = parts
            .next()
            .filter(|p| !p.is_empty())
            .and_then(|p| p.parse().ok())
            .ok_or_else(err)?;
        let minor = match parts.next() {
            Some(p) => p.parse().map_err(|_| err())?,
            None => 0,
        };
        Ok(Self { major, minor })
    }
}
