//! System environment variables for worker processes.
//!
//! Stored as lists of name/value entries rather than maps: the config loader
//! normalises map keys, and environment variable names are case-sensitive.

use minerkit_kernel::MiningPair;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One environment variable assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Variables applied only when a given device takes part in the launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEnvironmentVariables {
    pub device_uuid: String,
    #[serde(default)]
    pub variables: Vec<EnvironmentVariable>,
}

/// Environment a plugin's workers are started with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerSystemEnvironmentVariables {
    /// Applied to every launch
    #[serde(default)]
    pub default_system_environment_variables: Vec<EnvironmentVariable>,
    /// Applied per device, overriding defaults of the same name
    #[serde(default)]
    pub custom_system_environment_variables: Vec<DeviceEnvironmentVariables>,
}

impl MinerSystemEnvironmentVariables {
    /// Environment for a worker mining `pairs`.
    ///
    /// Defaults come first; custom variables of each participating device are
    /// layered on top in pair order.
    pub fn render(&self, pairs: &[MiningPair]) -> BTreeMap<String, String> {
        let mut env: BTreeMap<String, String> = self
            .default_system_environment_variables
            .iter()
            .map(|var| (var.name.clone(), var.value.clone()))
            .collect();

        for pair in pairs {
            let custom = self
                .custom_system_environment_variables
                .iter()
                .filter(|entry| entry.device_uuid == pair.device.uuid)
                .flat_map(|entry| entry.variables.iter());
            for var in custom {
                env.insert(var.name.clone(), var.value.clone());
            }
        }

        env
    }
}
