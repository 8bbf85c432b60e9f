//! Which devices BMiner can drive, and with which algorithms.

use minerkit_kernel::{
    Algorithm, AlgorithmType, Device, DeviceVendor, DriverVersion, SupportedAlgorithms,
    filter_insufficient_memory,
};

/// CUDA 9.2 runtime requires driver 397.44.
pub const MINIMUM_CUDA_DRIVER: DriverVersion = DriverVersion::new(397, 44);

/// Maxwell and newer.
pub const MINIMUM_SM_MAJOR: u32 = 5;

/// GCN4+ silicon markers, matched case-insensitively as substrings.
pub const GCN4_CODENAMES: &[&str] = &[
    "ellesmere", "baffin", "lexa", "polaris", "vega", "gfx803", "gfx900", "gfx906",
];

/// CUDA candidates with their default enabled state.
pub const CUDA_CANDIDATES: &[(AlgorithmType, bool)] = &[
    (AlgorithmType::ZHash, false),
    (AlgorithmType::DaggerHashimoto, false),
    (AlgorithmType::Beam, false),
    (AlgorithmType::GrinCuckaroo29, true),
    (AlgorithmType::GrinCuckatoo31, true),
];

/// AMD candidates with their default enabled state.
pub const AMD_CANDIDATES: &[(AlgorithmType, bool)] = &[(AlgorithmType::Beam, false)];

pub fn is_gcn4(codename: &str) -> bool {
    let codename = codename.to_lowercase();
    GCN4_CODENAMES.iter().any(|marker| codename.contains(marker))
}

fn candidates(plugin_uuid: &str, table: &[(AlgorithmType, bool)]) -> Vec<Algorithm> {
    table
        .iter()
        .map(|(algorithm_type, enabled)| {
            Algorithm::new(plugin_uuid, *algorithm_type).with_enabled(*enabled)
        })
        .collect()
}

/// Algorithms BMiner offers on each eligible device.
///
/// AMD devices must be GCN4 or newer. CUDA devices are only considered when
/// `installed_driver` is at least [`MINIMUM_CUDA_DRIVER`], and then need
/// compute capability [`MINIMUM_SM_MAJOR`] or higher. Candidates the device
/// lacks memory for are dropped, and devices left with nothing are omitted.
pub fn supported_algorithms(
    plugin_uuid: &str,
    devices: &[Device],
    installed_driver: Option<DriverVersion>,
) -> SupportedAlgorithms {
    let mut supported = SupportedAlgorithms::new();
    let cuda_allowed = installed_driver.is_some_and(|driver| driver >= MINIMUM_CUDA_DRIVER);
    if !cuda_allowed {
        tracing::debug!(
            driver = ?installed_driver,
            minimum = %MINIMUM_CUDA_DRIVER,
            "CUDA devices skipped: driver too old or missing"
        );
    }

    for device in devices {
        let table = match &device.vendor {
            DeviceVendor::Amd { codename } if is_gcn4(codename) => AMD_CANDIDATES,
            DeviceVendor::Cuda { sm_major, .. } if cuda_allowed && *sm_major >= MINIMUM_SM_MAJOR => {
                CUDA_CANDIDATES
            }
            _ => {
                tracing::debug!(device = %device.name, vendor = %device.vendor, "device not eligible");
                continue;
            }
        };

        let algorithms =
            filter_insufficient_memory(device.memory_bytes, candidates(plugin_uuid, table));
        if !algorithms.is_empty() {
            supported.insert(device.clone(), algorithms);
        }
    }

    supported
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: u64 = 1024 * 1024 * 1024;
    const UUID: &str = "92a7fd10-498d-11e9-87d3-6b57d758e2c6";
    const DRIVER_OK: Option<DriverVersion> = Some(DriverVersion::new(410, 48));

    fn kinds(algorithms: &[Algorithm]) -> Vec<AlgorithmType> {
        algorithms.iter().map(Algorithm::first_algorithm_type).collect()
    }

    #[test]
    fn test_gcn4_whitelist() {
        assert!(is_gcn4("Ellesmere"));
        assert!(is_gcn4("gfx900"));
        assert!(is_gcn4("Vega 10 XL/XT [Radeon RX Vega 56/64]"));
        assert!(is_gcn4("Polaris 20"));
        assert!(!is_gcn4("Tahiti"));
        assert!(!is_gcn4("gfx1030"));
        assert!(!is_gcn4(""));
    }

    #[test]
    fn test_sm6_device_gets_full_cuda_list() {
        let gpu = Device::cuda("GPU-1", 0, "GTX 1080 Ti", 6, 1, 11 * GB);
        let supported = supported_algorithms(UUID, &[gpu.clone()], DRIVER_OK);

        let algorithms = &supported[&gpu];
        assert_eq!(
            kinds(algorithms),
            vec![
                AlgorithmType::ZHash,
                AlgorithmType::DaggerHashimoto,
                AlgorithmType::Beam,
                AlgorithmType::GrinCuckaroo29,
                AlgorithmType::GrinCuckatoo31,
            ]
        );
        let enabled: Vec<bool> = algorithms.iter().map(|a| a.enabled).collect();
        assert_eq!(enabled, vec![false, false, false, true, true]);
        assert!(algorithms.iter().all(|a| a.plugin_uuid == UUID));
    }

    #[test]
    fn test_memory_filter_applies_to_cuda() {
        let gpu = Device::cuda("GPU-1", 0, "GTX 1060 6GB", 6, 1, 6 * GB);
        let supported = supported_algorithms(UUID, &[gpu.clone()], DRIVER_OK);
        assert_eq!(
            kinds(&supported[&gpu]),
            vec![
                AlgorithmType::ZHash,
                AlgorithmType::DaggerHashimoto,
                AlgorithmType::Beam,
                AlgorithmType::GrinCuckaroo29,
            ]
        );
    }

    #[test]
    fn test_old_driver_excludes_all_cuda() {
        let devices = vec![
            Device::cuda("GPU-1", 0, "GTX 1080", 6, 1, 8 * GB),
            Device::cuda("GPU-2", 1, "RTX 2080", 7, 5, 8 * GB),
        ];
        assert!(supported_algorithms(UUID, &devices, Some(DriverVersion::new(397, 31))).is_empty());
        assert!(supported_algorithms(UUID, &devices, None).is_empty());
    }

    #[test]
    fn test_exact_minimum_driver_is_enough() {
        let gpu = Device::cuda("GPU-1", 0, "GTX 1080", 6, 1, 8 * GB);
        let supported = supported_algorithms(UUID, &[gpu], Some(MINIMUM_CUDA_DRIVER));
        assert_eq!(supported.len(), 1);
    }

    #[test]
    fn test_old_compute_capability_excluded() {
        let kepler = Device::cuda("GPU-K", 0, "GTX 780", 3, 5, 3 * GB);
        let maxwell = Device::cuda("GPU-M", 1, "GTX 970", 5, 2, 4 * GB);
        let supported = supported_algorithms(UUID, &[kepler.clone(), maxwell.clone()], DRIVER_OK);
        assert!(!supported.contains_key(&kepler));
        assert!(supported.contains_key(&maxwell));
    }

    #[test]
    fn test_amd_gcn4_gets_beam_disabled() {
        let rx580 = Device::amd("AMD-0", 0, "RX 580", "Ellesmere", 8 * GB);
        let supported = supported_algorithms(UUID, &[rx580.clone()], None);
        let algorithms = &supported[&rx580];
        assert_eq!(kinds(algorithms), vec![AlgorithmType::Beam]);
        assert!(!algorithms[0].enabled);
    }

    #[test]
    fn test_amd_outside_whitelist_has_no_entry() {
        let r9 = Device::amd("AMD-1", 1, "R9 280X", "Tahiti", 3 * GB);
        assert!(supported_algorithms(UUID, &[r9], DRIVER_OK).is_empty());
    }

    #[test]
    fn test_device_without_any_fitting_algorithm_is_omitted() {
        let small_amd = Device::amd("AMD-2", 2, "RX 560", "Baffin", 2 * GB);
        let small_cuda = Device::cuda("GPU-3", 3, "GTX 1050", 6, 1, GB);
        let supported = supported_algorithms(UUID, &[small_amd, small_cuda], DRIVER_OK);
        assert!(supported.is_empty());
    }

    #[test]
    fn test_mixed_vendors_and_empty_input() {
        assert!(supported_algorithms(UUID, &[], DRIVER_OK).is_empty());

        let devices = vec![
            Device::amd("AMD-0", 0, "RX Vega 64", "gfx900", 8 * GB),
            Device::cuda("GPU-0", 1, "GTX 1070", 6, 1, 8 * GB),
        ];
        let supported = supported_algorithms(UUID, &devices, DRIVER_OK);
        assert_eq!(supported.len(), 2);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let devices = vec![
            Device::amd("AMD-0", 0, "RX 580", "Ellesmere", 8 * GB),
            Device::cuda("GPU-0", 1, "GTX 1070", 6, 1, 8 * GB),
            Device::cuda("GPU-1", 2, "GTX 760", 3, 0, 2 * GB),
        ];
        let first = supported_algorithms(UUID, &devices, DRIVER_OK);
        let second = supported_algorithms(UUID, &devices, DRIVER_OK);
        assert_eq!(first, second);
    }
}
