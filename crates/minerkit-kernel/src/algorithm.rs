//! Algorithm identities, mining pairs and memory-sufficiency filtering.

use crate::device::Device;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Mining algorithm kinds known to the kernel.
///
/// Plugins map every variant to their own wire names, so the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlgorithmType {
    ZHash,
    DaggerHashimoto,
    Beam,
    GrinCuckaroo29,
    GrinCuckatoo31,
}

impl AlgorithmType {
    /// Every algorithm type, in declaration order.
    pub const ALL: [AlgorithmType; 5] = [
        AlgorithmType::ZHash,
        AlgorithmType::DaggerHashimoto,
        AlgorithmType::Beam,
        AlgorithmType::GrinCuckaroo29,
        AlgorithmType::GrinCuckatoo31,
    ];
}

impl fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgorithmType::ZHash => "ZHash",
            AlgorithmType::DaggerHashimoto => "DaggerHashimoto",
            AlgorithmType::Beam => "Beam",
            AlgorithmType::GrinCuckaroo29 => "GrinCuckaroo29",
            AlgorithmType::GrinCuckatoo31 => "GrinCuckatoo31",
        };
        f.write_str(name)
    }
}

/// Minimum device memory, in bytes, each algorithm needs to run.
static MINIMUM_MEMORY: LazyLock<HashMap<AlgorithmType, u64>> = LazyLock::new(|| {
    HashMap::from([
        // 1.75 GB
        (AlgorithmType::ZHash, 1_879_047_230),
        // 3 GB DAG
        (AlgorithmType::DaggerHashimoto, 3 * 1024 * 1024 * 1024),
        // 2.9 GB
        (AlgorithmType::Beam, 3_113_849_695),
        // 5.6 GB
        (AlgorithmType::GrinCuckaroo29, 6_012_951_136),
        // 7.54 GB
        (AlgorithmType::GrinCuckatoo31, 8_100_000_000),
    ])
});

/// Minimum memory for a single algorithm type; unknown types need nothing.
pub fn minimum_memory(algorithm_type: AlgorithmType) -> u64 {
    MINIMUM_MEMORY.get(&algorithm_type).copied().unwrap_or(0)
}

/// An algorithm offered by a plugin.
///
/// Single algorithms carry one [`AlgorithmType`]; dual-mining algorithms carry
/// two, with the primary one first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAlgorithm")]
pub struct Algorithm {
    /// Owning plugin identifier
    pub plugin_uuid: String,
    ids: Vec<AlgorithmType>,
    /// Default enabled state shown to the user
    pub enabled: bool,
}

#[derive(Deserialize)]
struct RawAlgorithm {
    plugin_uuid: String,
    ids: Vec<AlgorithmType>,
    enabled: bool,
}

impl TryFrom<RawAlgorithm> for Algorithm {
    type Error = &'static str;

    fn try_from(raw: RawAlgorithm) -> Result<Self, Self::Error> {
        if raw.ids.is_empty() {
            return Err("algorithm must name at least one algorithm type");
        }
        Ok(Self {
            plugin_uuid: raw.plugin_uuid,
            ids: raw.ids,
            enabled: raw.enabled,
        })
    }
}

impl Algorithm {
    pub fn new(plugin_uuid: impl Into<String>, algorithm_type: AlgorithmType) -> Self {
        Self {
            plugin_uuid: plugin_uuid.into(),
            ids: vec![algorithm_type],
            enabled: true,
        }
    }

    pub fn dual(
        plugin_uuid: impl Into<String>,
        first: AlgorithmType,
        second: AlgorithmType,
    ) -> Self {
        Self {
            plugin_uuid: plugin_uuid.into(),
            ids: vec![first, second],
            enabled: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// All algorithm types, primary first.
    pub fn ids(&self) -> &[AlgorithmType] {
        &self.ids
    }

    /// The primary algorithm type, used as the grouping key.
    pub fn first_algorithm_type(&self) -> AlgorithmType {
        self.ids[0]
    }

    pub fn second_algorithm_type(&self) -> Option<AlgorithmType> {
        self.ids.get(1).copied()
    }

    pub fn is_dual(&self) -> bool {
        self.ids.len() > 1
    }

    /// Memory needed to run every component of this algorithm.
    pub fn minimum_memory(&self) -> u64 {
        self.ids.iter().map(|ty| minimum_memory(*ty)).max().unwrap_or(0)
    }

    /// `ZHash` or `DaggerHashimoto+Beam` for dual algorithms.
    pub fn algorithm_name(&self) -> String {
        self.ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.algorithm_name())
    }
}

/// Drop every algorithm that needs more memory than the device has.
///
/// Order of the remaining algorithms is preserved.
pub fn filter_insufficient_memory(memory_bytes: u64, algorithms: Vec<Algorithm>) -> Vec<Algorithm> {
    algorithms
        .into_iter()
        .filter(|algorithm| {
            let required = algorithm.minimum_memory();
            if memory_bytes < required {
                tracing::debug!(
                    algorithm = %algorithm,
                    required,
                    available = memory_bytes,
                    "algorithm filtered: insufficient device memory"
                );
                false
            } else {
                true
            }
        })
        .collect()
}

/// A device paired with the algorithm it should mine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningPair {
    pub device: Device,
    pub algorithm: Algorithm,
}

impl MiningPair {
    pub fn new(device: Device, algorithm: Algorithm) -> Self {
        Self { device, algorithm }
    }
}

/// Devices mapped to the algorithms a plugin supports on them.
pub type SupportedAlgorithms = HashMap<Device, Vec<Algorithm>>;
