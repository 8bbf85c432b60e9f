//! # minerkit-kernel
//!
//! Shared contracts between a mining host and its miner plugins:
//!
//! - [`device`]: immutable device snapshots and the installed driver version
//! - [`algorithm`]: algorithm identities, mining pairs and the memory filter
//! - [`plugin`]: the [`MinerPlugin`] trait family and plugin errors
//! - [`config`]: multi-format config loading (feature `config`)
//! - [`error`]: crate-level [`KernelError`](error::KernelError)

// device module
pub mod device;
pub use device::*;

// algorithm module
pub mod algorithm;
pub use algorithm::*;

// plugin module
pub mod plugin;
pub use plugin::*;

// error module
pub mod error;

// config module
#[cfg(feature = "config")]
pub mod config;
