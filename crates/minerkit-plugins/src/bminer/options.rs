//! Built-in BMiner launch settings.
//!
//! Values mirror BMiner's own command-line defaults and are passed through
//! to the worker unvalidated.

use crate::environment::MinerSystemEnvironmentVariables;
use crate::options::{MinerOption, MinerOptionsPackage};

/// BMiner's worker options.
pub fn default_options_package() -> MinerOptionsPackage {
    MinerOptionsPackage {
        general_options: vec![
            // Dual mining sub-solver: 0..=3, or -1 to tune automatically
            MinerOption::single("bminer_dual_subsolver", "-dual-subsolver", Some("-1")),
            // CPU intensity for grin/AE mining: 0..=12
            MinerOption::single("bminer_cpu_intensity", "-intensity", Some("6")),
            // Append logs to the given path
            MinerOption::single("bminer_logfile", "-logfile=", None),
            // Disables the devfee along with some optimizations
            MinerOption::flag("bminer_nofee", "-nofee"),
            // Personalization string for equihash 144,5 coins
            MinerOption::single("bminer_pers", "-pers", Some("BgoldPoW")),
        ],
        temperature_options: vec![
            // BMiner throttles itself above this temperature
            MinerOption::single("bminer_max_temp", "-max-temperature", Some("85")),
        ],
    }
}

/// BMiner needs no extra environment.
pub fn default_environment() -> MinerSystemEnvironmentVariables {
    MinerSystemEnvironmentVariables::default()
}
