//! `minerkit devices`

use crate::context::CliContext;
use crate::output::{Report, TableBuilder, emit, format_bytes};
use crate::selector::device_label;
use colored::Colorize;
use minerkit_hardware::HardwareSnapshot;
use minerkit_kernel::config::save_config;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct DevicesReport {
    #[serde(flatten)]
    pub snapshot: HardwareSnapshot,
}

impl Report for DevicesReport {
    fn to_table(&self) -> TableBuilder {
        self.snapshot.devices.iter().fold(
            TableBuilder::new().headers(&["id", "name", "vendor", "memory", "uuid"]),
            |table, device| {
                table.add_row(vec![
                    device_label(device),
                    device.name.clone(),
                    device.vendor.to_string(),
                    format_bytes(device.memory_bytes),
                    device.uuid.clone(),
                ])
            },
        )
    }

    fn to_text(&self) -> String {
        let mut lines = vec![match self.snapshot.nvidia_driver {
            Some(driver) => format!("NVIDIA driver: {}", driver.to_string().green()),
            None => format!("NVIDIA driver: {}", "not installed".yellow()),
        }];
        if self.snapshot.devices.is_empty() {
            lines.push("No devices detected.".yellow().to_string());
        }
        for device in &self.snapshot.devices {
            lines.push(format!(
                "  #{:<6} {} [{}] {}",
                device_label(device),
                device.name.bold(),
                device.vendor,
                format_bytes(device.memory_bytes)
            ));
        }
        lines.join("\n")
    }
}

pub fn run(ctx: &CliContext, save: Option<&Path>) -> anyhow::Result<()> {
    let snapshot = ctx.hardware()?;

    if let Some(path) = save {
        save_config(path, &snapshot)?;
        tracing::info!(path = %path.display(), devices = snapshot.devices.len(), "snapshot saved");
    }

    emit(&DevicesReport { snapshot }, ctx.output)
}
