//! Vendor-qualified device selection.
//!
//! CUDA and AMD enumerate from 0 independently, so a bare id is ambiguous.
//! Selectors use the worker's own `-devices` notation: `N` (or `cuda:N`) for
//! CUDA devices and `amd:N` for AMD devices.

use minerkit_kernel::{Device, DeviceVendor};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceSelector {
    Cuda(u32),
    Amd(u32),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid device {0:?}, expected N, cuda:N or amd:N")]
pub struct ParseSelectorError(String);

impl DeviceSelector {
    /// Selector naming `device`, `None` for vendors without one.
    pub fn of(device: &Device) -> Option<Self> {
        match device.vendor {
            DeviceVendor::Cuda { .. } => Some(Self::Cuda(device.id)),
            DeviceVendor::Amd { .. } => Some(Self::Amd(device.id)),
            _ => None,
        }
    }

    pub fn matches(&self, device: &Device) -> bool {
        Self::of(device) == Some(*self)
    }
}

impl FromStr for DeviceSelector {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (vendor, id) = text.split_once(':').unwrap_or(("cuda", text));
        let id: u32 = id.parse().map_err(|_| ParseSelectorError(s.to_string()))?;
        match vendor.to_ascii_lowercase().as_str() {
            "cuda" => Ok(Self::Cuda(id)),
            "amd" => Ok(Self::Amd(id)),
            _ => Err(ParseSelectorError(s.to_string())),
        }
    }
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cuda(id) => write!(f, "{id}"),
            Self::Amd(id) => write!(f, "amd:{id}"),
        }
    }
}

/// Display label for a device, e.g. `0` or `amd:0`.
pub fn device_label(device: &Device) -> String {
    DeviceSelector::of(device).map_or_else(|| device.id.to_string(), |selector| selector.to_string())
}
