//! `minerkit launch`

use crate::context::CliContext;
use crate::error::CliError;
use crate::output::{Report, TableBuilder, emit};
use crate::selector::{DeviceSelector, device_label};
use colored::Colorize;
use minerkit_kernel::{Device, InitInternals, MinerPlugin, MiningPair, SupportedAlgorithms};
use serde::Serialize;
use std::collections::BTreeMap;

/// Launch options collected from the command line
pub struct LaunchArgs<'a> {
    pub algorithm: &'a str,
    pub pool: &'a str,
    pub user: &'a str,
    pub api_port: u16,
    pub extra: &'a str,
    pub devices: &'a [DeviceSelector],
}

#[derive(Debug, Serialize)]
pub struct LaunchReport {
    pub algorithm: String,
    pub devices: Vec<String>,
    pub binary: String,
    pub cwd: String,
    pub arguments: Vec<String>,
    pub environment: BTreeMap<String, String>,
}

impl Report for LaunchReport {
    fn to_table(&self) -> TableBuilder {
        let mut table = TableBuilder::new()
            .headers(&["key", "value"])
            .add_row(vec!["algorithm".into(), self.algorithm.clone()])
            .add_row(vec!["devices".into(), self.devices.join(", ")])
            .add_row(vec!["binary".into(), self.binary.clone()])
            .add_row(vec!["cwd".into(), self.cwd.clone()])
            .add_row(vec!["arguments".into(), self.arguments.join(" ")]);
        for (name, value) in &self.environment {
            table = table.add_row(vec![format!("env {name}"), value.clone()]);
        }
        table
    }

    fn to_text(&self) -> String {
        let mut lines = vec![
            format!("{} {}", "Algorithm:".bold(), self.algorithm),
            format!("{} {}", "Devices:".bold(), self.devices.join(", ")),
            format!("{} {}", "Working dir:".bold(), self.cwd),
        ];
        for (name, value) in &self.environment {
            lines.push(format!("{name}={value}"));
        }
        lines.push(format!("{} {}", self.binary, self.arguments.join(" ")));
        lines.join("\n")
    }
}

/// Pairs for every selected device that supports `algorithm`, in
/// enumeration order.
pub fn select_pairs(
    devices: &[Device],
    supported: &SupportedAlgorithms,
    algorithm: &str,
    only: &[DeviceSelector],
) -> Vec<MiningPair> {
    devices
        .iter()
        .filter(|device| only.is_empty() || only.iter().any(|selector| selector.matches(device)))
        .filter_map(|device| {
            supported
                .get(device)?
                .iter()
                .find(|candidate| candidate.algorithm_name().eq_ignore_ascii_case(algorithm))
                .map(|candidate| MiningPair::new(device.clone(), candidate.clone()))
        })
        .collect()
}

pub fn run(ctx: &CliContext, args: LaunchArgs<'_>) -> anyhow::Result<()> {
    let snapshot = ctx.hardware()?;
    ctx.plugin.init_internals(&ctx.plugin_root());

    let supported = ctx
        .plugin
        .supported_algorithms(&snapshot.devices, snapshot.nvidia_driver);
    let pairs = select_pairs(&snapshot.devices, &supported, args.algorithm, args.devices);
    let Some(first) = pairs.first() else {
        return Err(CliError::NoEligibleDevices(args.algorithm.to_string()).into());
    };
    let algorithm = first.algorithm.algorithm_name();
    let device_names = pairs
        .iter()
        .map(|pair| format!("#{} {}", device_label(&pair.device), pair.device.name))
        .collect();

    let mut miner = ctx.plugin.create_miner();
    miner.set_mining_pairs(pairs).map_err(CliError::from)?;
    miner.set_extra_launch_parameters(args.extra);

    let paths = miner.bin_and_cwd_paths();
    let arguments = miner
        .command_line(args.pool, args.user, args.api_port)
        .map_err(CliError::from)?;

    let report = LaunchReport {
        algorithm,
        devices: device_names,
        binary: paths.binary.display().to_string(),
        cwd: paths.cwd.display().to_string(),
        arguments,
        environment: miner.environment(),
    };
    emit(&report, ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minerkit_kernel::DriverVersion;
    use minerkit_plugins::BMinerPlugin;

    const GB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_select_pairs_filters_by_algorithm_and_id() {
        let devices = vec![
            Device::cuda("GPU-0", 0, "GTX 1080 Ti", 6, 1, 11 * GB),
            Device::cuda("GPU-1", 1, "GTX 1050", 6, 1, 2 * GB),
            Device::amd("AMD-0", 2, "RX 580", "Ellesmere", 8 * GB),
        ];
        let plugin = BMinerPlugin::new();
        let supported = plugin.supported_algorithms(&devices, Some(DriverVersion::new(411, 31)));

        let beam = select_pairs(&devices, &supported, "beam", &[]);
        let ids: Vec<u32> = beam.iter().map(|p| p.device.id).collect();
        assert_eq!(ids, vec![0, 2]);

        let only_amd = select_pairs(&devices, &supported, "Beam", &[DeviceSelector::Amd(2)]);
        assert_eq!(only_amd.len(), 1);
        assert!(select_pairs(&devices, &supported, "Beam", &[DeviceSelector::Cuda(2)]).is_empty());

        let heavy = [DeviceSelector::Cuda(1), DeviceSelector::Amd(2)];
        assert!(select_pairs(&devices, &supported, "GrinCuckatoo31", &heavy).is_empty());
        assert!(select_pairs(&devices, &supported, "scrypt", &[]).is_empty());
    }

    #[test]
    fn test_select_pairs_tells_vendors_apart() {
        let devices = vec![
            Device::cuda("GPU-0", 0, "GTX 1080 Ti", 6, 1, 11 * GB),
            Device::amd("AMD-0", 0, "RX 580", "Ellesmere", 8 * GB),
        ];
        let plugin = BMinerPlugin::new();
        let supported = plugin.supported_algorithms(&devices, Some(DriverVersion::new(411, 31)));

        let cuda = select_pairs(&devices, &supported, "beam", &["0".parse().unwrap()]);
        assert_eq!(cuda.len(), 1);
        assert_eq!(cuda[0].device.uuid, "GPU-0");

        let amd = select_pairs(&devices, &supported, "beam", &["amd:0".parse().unwrap()]);
        assert_eq!(amd.len(), 1);
        assert_eq!(amd[0].device.uuid, "AMD-0");

        let mut miner = plugin.create_miner();
        miner.set_mining_pairs(amd).unwrap();
        let args = miner.command_line("stratum+tcp://pool:3370", "u", 4000).unwrap();
        assert!(args.windows(2).any(|w| w == ["-devices", "amd:0"]));
    }
}
