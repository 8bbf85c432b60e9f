//! A single BMiner worker launch.

use super::plugin::can_group;
use crate::internals::MinerInternals;
use crate::options::{LaunchOverrides, parse_extra_launch_parameters, render_arguments};
use minerkit_kernel::{
    AlgorithmType, BinAndCwdPaths, Miner, MiningPair, PluginError, PluginResult,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Worker executable name inside the binaries directory.
#[cfg(windows)]
pub const BINARY_NAME: &str = "bminer.exe";
/// Worker executable name inside the binaries directory.
#[cfg(not(windows))]
pub const BINARY_NAME: &str = "bminer";

/// URI scheme BMiner expects for each algorithm.
pub fn uri_scheme(algorithm_type: AlgorithmType) -> &'static str {
    match algorithm_type {
        AlgorithmType::ZHash => "zhash",
        AlgorithmType::DaggerHashimoto => "ethstratum",
        AlgorithmType::Beam => "beam",
        AlgorithmType::GrinCuckaroo29 => "cuckaroo29",
        AlgorithmType::GrinCuckatoo31 => "cuckatoo31",
    }
}

/// `stratum+tcp://host:port` → `host:port`
fn pool_host(pool_url: &str) -> &str {
    pool_url
        .split_once("://")
        .map_or(pool_url, |(_, rest)| rest)
        .trim_end_matches('/')
}

/// A BMiner worker under construction.
#[derive(Debug, Clone)]
pub struct BMiner {
    internals: Arc<MinerInternals>,
    bins_root: PathBuf,
    pairs: Vec<MiningPair>,
    overrides: LaunchOverrides,
}

impl BMiner {
    pub fn new(internals: Arc<MinerInternals>, bins_root: PathBuf) -> Self {
        Self {
            internals,
            bins_root,
            pairs: Vec::new(),
            overrides: LaunchOverrides::new(),
        }
    }

    pub fn internals(&self) -> &MinerInternals {
        &self.internals
    }

    /// `0,1,amd:2`: AMD devices carry BMiner's `amd:` prefix.
    fn device_list(&self) -> String {
        let mut ids: Vec<(bool, u32)> = self
            .pairs
            .iter()
            .map(|pair| (pair.device.vendor.is_amd(), pair.device.id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.iter()
            .map(|(amd, id)| if *amd { format!("amd:{id}") } else { id.to_string() })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Miner for BMiner {
    fn set_mining_pairs(&mut self, pairs: Vec<MiningPair>) -> PluginResult<()> {
        let Some(first) = pairs.first() else {
            return Err(PluginError::NoMiningPairs);
        };
        if let Some(odd) = pairs.iter().find(|pair| !can_group(first, pair)) {
            return Err(PluginError::IncompatiblePairs(format!(
                "{} on {} vs {} on {}",
                first.algorithm, first.device.name, odd.algorithm, odd.device.name
            )));
        }
        self.pairs = pairs;
        Ok(())
    }

    fn mining_pairs(&self) -> &[MiningPair] {
        &self.pairs
    }

    fn set_extra_launch_parameters(&mut self, text: &str) {
        self.overrides = parse_extra_launch_parameters(text, &self.internals.options);
    }

    fn bin_and_cwd_paths(&self) -> BinAndCwdPaths {
        BinAndCwdPaths {
            binary: self.bins_root.join(BINARY_NAME),
            cwd: self.bins_root.clone(),
        }
    }

    fn command_line(
        &self,
        pool_url: &str,
        username: &str,
        api_port: u16,
    ) -> PluginResult<Vec<String>> {
        let Some(first) = self.pairs.first() else {
            return Err(PluginError::NoMiningPairs);
        };
        let host = pool_host(pool_url);
        let algorithm = &first.algorithm;

        let mut args = vec![
            "-uri".to_string(),
            format!("{}://{username}@{host}", uri_scheme(algorithm.first_algorithm_type())),
        ];
        if let Some(second) = algorithm.second_algorithm_type() {
            args.push("-uri2".to_string());
            args.push(format!("{}://{username}@{host}", uri_scheme(second)));
        }
        args.extend([
            "-api".to_string(),
            format!("127.0.0.1:{api_port}"),
            "-devices".to_string(),
            self.device_list(),
        ]);
        args.extend(render_arguments(&self.internals.options, &self.overrides));

        tracing::debug!(
            algorithm = %algorithm,
            devices = self.pairs.len(),
            "built bminer command line"
        );
        Ok(args)
    }

    fn environment(&self) -> BTreeMap<String, String> {
        self.internals.environment.render(&self.pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bminer::options::{default_environment, default_options_package};
    use crate::environment::{DeviceEnvironmentVariables, EnvironmentVariable};
    use minerkit_kernel::{Algorithm, Device};

    const GB: u64 = 1024 * 1024 * 1024;

    fn miner() -> BMiner {
        let internals = MinerInternals {
            options: default_options_package(),
            environment: default_environment(),
        };
        BMiner::new(Arc::new(internals), PathBuf::from("/plugins/bminer/bins"))
    }

    fn cuda_pair(id: u32, algorithm_type: AlgorithmType) -> MiningPair {
        MiningPair::new(
            Device::cuda(format!("GPU-{id}"), id, "GTX 1080", 6, 1, 8 * GB),
            Algorithm::new("p", algorithm_type),
        )
    }

    fn amd_pair(id: u32) -> MiningPair {
        MiningPair::new(
            Device::amd(format!("AMD-{id}"), id, "RX 580", "Ellesmere", 8 * GB),
            Algorithm::new("p", AlgorithmType::Beam),
        )
    }

    #[test]
    fn test_uri_scheme_covers_every_algorithm() {
        let schemes: std::collections::BTreeSet<&str> =
            AlgorithmType::ALL.into_iter().map(uri_scheme).collect();
        assert_eq!(schemes.len(), AlgorithmType::ALL.len());
        assert_eq!(uri_scheme(AlgorithmType::DaggerHashimoto), "ethstratum");
        assert_eq!(uri_scheme(AlgorithmType::GrinCuckatoo31), "cuckatoo31");
    }

    #[test]
    fn test_pool_host() {
        assert_eq!(pool_host("stratum+tcp://beam.eu.nicehash.com:3370"), "beam.eu.nicehash.com:3370");
        assert_eq!(pool_host("beam.eu.nicehash.com:3370/"), "beam.eu.nicehash.com:3370");
    }

    #[test]
    fn test_command_line_with_defaults() {
        let mut miner = miner();
        miner
            .set_mining_pairs(vec![cuda_pair(1, AlgorithmType::Beam), amd_pair(0)])
            .unwrap();

        let args = miner
            .command_line("stratum+tcp://beam.eu.nicehash.com:3370", "wallet.rig", 4000)
            .unwrap();
        assert_eq!(
            args,
            vec![
                "-uri",
                "beam://wallet.rig@beam.eu.nicehash.com:3370",
                "-api",
                "127.0.0.1:4000",
                "-devices",
                "1,amd:0",
                "-dual-subsolver",
                "-1",
                "-intensity",
                "6",
                "-pers",
                "BgoldPoW",
                "-max-temperature",
                "85",
            ]
        );
    }

    #[test]
    fn test_command_line_with_extra_parameters() {
        let mut miner = miner();
        miner.set_mining_pairs(vec![cuda_pair(0, AlgorithmType::GrinCuckatoo31)]).unwrap();
        miner.set_extra_launch_parameters("-nofee -logfile=/tmp/bminer.log -max-temperature 70");

        let args = miner.command_line("stratum+tcp://grin.example:3372", "u", 4001).unwrap();
        assert_eq!(args[1], "cuckatoo31://u@grin.example:3372");
        assert!(args.contains(&"-nofee".to_string()));
        assert!(args.contains(&"-logfile=/tmp/bminer.log".to_string()));
        let pos = args.iter().position(|a| a == "-max-temperature").unwrap();
        assert_eq!(args[pos + 1], "70");
    }

    #[test]
    fn test_dual_algorithm_adds_second_uri() {
        let mut miner = miner();
        let pair = MiningPair::new(
            Device::cuda("GPU-0", 0, "GTX 1080", 6, 1, 8 * GB),
            Algorithm::dual("p", AlgorithmType::DaggerHashimoto, AlgorithmType::Beam),
        );
        miner.set_mining_pairs(vec![pair]).unwrap();

        let args = miner.command_line("stratum+tcp://pool:1", "u", 1).unwrap();
        assert_eq!(&args[..4], &["-uri", "ethstratum://u@pool:1", "-uri2", "beam://u@pool:1"]);
    }

    #[test]
    fn test_empty_pairs_rejected() {
        let mut miner = miner();
        assert!(matches!(miner.set_mining_pairs(vec![]), Err(PluginError::NoMiningPairs)));
        assert!(matches!(miner.command_line("p", "u", 1), Err(PluginError::NoMiningPairs)));
    }

    #[test]
    fn test_mixed_primary_algorithms_rejected() {
        let mut miner = miner();
        let result = miner.set_mining_pairs(vec![
            cuda_pair(0, AlgorithmType::Beam),
            cuda_pair(1, AlgorithmType::ZHash),
        ]);
        assert!(matches!(result, Err(PluginError::IncompatiblePairs(_))));
        assert!(miner.mining_pairs().is_empty());
    }

    #[test]
    fn test_bin_and_cwd_paths() {
        let paths = miner().bin_and_cwd_paths();
        assert_eq!(paths.cwd, PathBuf::from("/plugins/bminer/bins"));
        assert_eq!(paths.binary, PathBuf::from("/plugins/bminer/bins").join(BINARY_NAME));
    }

    #[test]
    fn test_environment_uses_grouped_devices() {
        let internals = MinerInternals {
            options: default_options_package(),
            environment: crate::environment::MinerSystemEnvironmentVariables {
                default_system_environment_variables: vec![EnvironmentVariable::new("A", "1")],
                custom_system_environment_variables: vec![DeviceEnvironmentVariables {
                    device_uuid: "GPU-1".into(),
                    variables: vec![EnvironmentVariable::new("B", "2")],
                }],
            },
        };
        let mut miner = BMiner::new(Arc::new(internals), PathBuf::from("bins"));
        miner.set_mining_pairs(vec![cuda_pair(1, AlgorithmType::Beam)]).unwrap();

        let env = miner.environment();
        assert_eq!(env.get("A").map(String::as_str), Some("1"));
        assert_eq!(env.get("B").map(String::as_str), Some("2"));
    }
}
