//! # minerkit-hardware
//!
//! GPU enumeration for minerkit hosts.
//!
//! Builds the device list and the installed NVIDIA driver version that miner
//! plugins resolve their supported algorithms against:
//!
//! | Vendor | Tool       | Generation marker         |
//! |--------|------------|---------------------------|
//! | NVIDIA | nvidia-smi | compute capability        |
//! | AMD    | rocm-smi   | GFX version / card series |
//!
//! Missing tools are treated as "no devices of that vendor".
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use minerkit_hardware::{HardwareSnapshot, ProbeConfig};
//!
//! let snapshot = HardwareSnapshot::detect(&ProbeConfig::default());
//! println!("{} devices, driver {:?}", snapshot.devices.len(), snapshot.nvidia_driver);
//! ```

pub mod config;
pub mod hardware;

pub use config::ProbeConfig;
pub use hardware::{HardwareSnapshot, NvidiaQuery};
