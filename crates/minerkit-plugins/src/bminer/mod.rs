//! BMiner: closed-source CUDA/AMD miner for equihash, ethash, beam and
//! grin cuckoo cycle variants.

pub mod algorithms;
pub mod miner;
pub mod options;
pub mod plugin;

pub use miner::{BINARY_NAME, BMiner};
pub use plugin::{BMINER_UUID, BMinerPlugin, can_group};
