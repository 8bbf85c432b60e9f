//! `minerkit algorithms`

use crate::context::CliContext;
use crate::output::{Report, TableBuilder, emit, format_bytes};
use crate::selector::device_label;
use colored::Colorize;
use minerkit_kernel::{DriverVersion, MinerPlugin};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AlgorithmEntry {
    pub name: String,
    pub enabled: bool,
    pub minimum_memory_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct DeviceAlgorithms {
    pub id: u32,
    /// Vendor-qualified id accepted by `launch --device`
    pub selector: String,
    pub name: String,
    pub algorithms: Vec<AlgorithmEntry>,
}

#[derive(Debug, Serialize)]
pub struct AlgorithmsReport {
    pub plugin: String,
    pub nvidia_driver: Option<DriverVersion>,
    /// Eligible devices in enumeration order
    pub devices: Vec<DeviceAlgorithms>,
    /// Devices the plugin cannot drive
    pub unsupported: Vec<String>,
}

impl Report for AlgorithmsReport {
    fn to_table(&self) -> TableBuilder {
        let mut table = TableBuilder::new().headers(&["id", "device", "algorithm", "enabled", "min memory"]);
        for device in &self.devices {
            for algorithm in &device.algorithms {
                table = table.add_row(vec![
                    device.selector.clone(),
                    device.name.clone(),
                    algorithm.name.clone(),
                    algorithm.enabled.to_string(),
                    format_bytes(algorithm.minimum_memory_bytes),
                ]);
            }
        }
        table
    }

    fn to_text(&self) -> String {
        let mut lines = Vec::new();
        for device in &self.devices {
            lines.push(format!("#{} {}", device.selector, device.name.bold()));
            for algorithm in &device.algorithms {
                let state = if algorithm.enabled {
                    "enabled".green()
                } else {
                    "disabled".dimmed()
                };
                lines.push(format!("    {:<16} {}", algorithm.name, state));
            }
        }
        for name in &self.unsupported {
            lines.push(format!("{} {}", name, "(not supported)".yellow()));
        }
        if lines.is_empty() {
            lines.push("No devices detected.".yellow().to_string());
        }
        lines.join("\n")
    }
}

pub fn run(ctx: &CliContext) -> anyhow::Result<()> {
    let snapshot = ctx.hardware()?;
    let supported = ctx
        .plugin
        .supported_algorithms(&snapshot.devices, snapshot.nvidia_driver);

    let mut report = AlgorithmsReport {
        plugin: ctx.plugin.metadata().name.clone(),
        nvidia_driver: snapshot.nvidia_driver,
        devices: Vec::new(),
        unsupported: Vec::new(),
    };
    for device in &snapshot.devices {
        match supported.get(device) {
            Some(algorithms) => report.devices.push(DeviceAlgorithms {
                id: device.id,
                selector: device_label(device),
                name: device.name.clone(),
                algorithms: algorithms
                    .iter()
                    .map(|algorithm| AlgorithmEntry {
                        name: algorithm.algorithm_name(),
                        enabled: algorithm.enabled,
                        minimum_memory_bytes: algorithm.minimum_memory(),
                    })
                    .collect(),
            }),
            None => report.unsupported.push(device.name.clone()),
        }
    }

    emit(&report, ctx.output)
}
