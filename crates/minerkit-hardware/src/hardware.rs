//! GPU enumeration for miner plugins
//!
//! Produces the immutable [`Device`] snapshots and the installed NVIDIA
//! driver version that plugins resolve algorithms against.
//!
//! Detection shells out to the vendor management tools rather than linking
//! GPU libraries, so the crate builds on machines without any GPU stack:
//!
//! - NVIDIA: `nvidia-smi --query-gpu=... --format=csv,noheader,nounits`
//! - AMD: `rocm-smi --showproductname --showmeminfo vram --csv`
//!
//! Output parsing is split from command execution so it can be tested
//! against captured tool output.

use crate::config::ProbeConfig;
use error_stack::{Report, ResultExt};
use minerkit_kernel::device::{Device, DeviceVendor, DriverVersion};
use minerkit_kernel::error::{KernelError, KernelResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

const MIB: u64 = 1024 * 1024;

/// Fields requested from `nvidia-smi`, in output column order.
///
/// Every driver release answers this query.
pub const NVIDIA_QUERY_FIELDS: &str = "index,uuid,name,memory.total";

/// Compute capability query. Drivers before R510 reject `compute_cap`.
pub const NVIDIA_COMPUTE_CAP_FIELDS: &str = "index,compute_cap";

/// Capability recorded when the driver cannot report one.
///
/// Below every plugin's minimum, so such devices resolve no algorithms.
pub const UNKNOWN_COMPUTE_CAPABILITY: (u32, u32) = (0, 0);

/// Result of an `nvidia-smi` device query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvidiaQuery {
    pub devices: Vec<Device>,
    /// Installed driver, from a separate `driver_version` query
    pub driver: Option<DriverVersion>,
}

/// Everything the host learned about the machine's GPUs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HardwareSnapshot {
    /// All detected devices, NVIDIA first
    #[serde(default)]
    pub devices: Vec<Device>,
    /// Installed NVIDIA driver, `None` when no NVIDIA driver answered
    pub nvidia_driver: Option<DriverVersion>,
}

impl HardwareSnapshot {
    /// Probe the machine with the tools named in `config`.
    ///
    /// Missing tools are not an error: the corresponding vendor simply
    /// contributes no devices. Tool failures are logged and skipped.
    /// Runs synchronously.
    pub fn detect(config: &ProbeConfig) -> Self {
        let mut snapshot = Self::default();

        if !config.skip_nvidia {
            match probe_nvidia(&config.nvidia_smi) {
                Ok(Some(query)) => {
                    snapshot.nvidia_driver = query.driver;
                    snapshot.devices.extend(query.devices);
                }
                Ok(None) => tracing::debug!("nvidia-smi not found, skipping NVIDIA devices"),
                Err(report) => tracing::warn!(error = ?report, "NVIDIA probe failed"),
            }
        }

        if !config.skip_amd {
            match probe_amd(&config.rocm_smi) {
                Ok(Some(devices)) => snapshot.devices.extend(devices),
                Ok(None) => tracing::debug!("rocm-smi not found, skipping AMD devices"),
                Err(report) => tracing::warn!(error = ?report, "AMD probe failed"),
            }
        }

        tracing::info!(
            devices = snapshot.devices.len(),
            nvidia_driver = ?snapshot.nvidia_driver,
            "hardware detection finished"
        );
        snapshot
    }
}

// ============================================================================
// Tool execution
// ============================================================================

fn locate_tool(tool: &Path) -> Option<PathBuf> {
    which::which(tool).ok()
}

fn run_tool(tool: &Path, args: &[&str]) -> KernelResult<String> {
    let output = Command::new(tool)
        .args(args)
        .output()
        .map_err(KernelError::from)
        .map_err(Report::new)
        .attach(format!("running {}", tool.display()))?;

    if !output.status.success() {
        return Err(Report::new(KernelError::Probe(format!(
            "{} exited with {}",
            tool.display(),
            output.status
        )))
        .attach(String::from_utf8_lossy(&output.stderr).trim().to_string()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Query NVIDIA devices; `Ok(None)` when `nvidia-smi` is not installed.
///
/// The device list, the driver version and the compute capabilities are
/// three queries. A failed capability query leaves the devices with
/// [`UNKNOWN_COMPUTE_CAPABILITY`] instead of failing the vendor.
pub fn probe_nvidia(nvidia_smi: &Path) -> KernelResult<Option<NvidiaQuery>> {
    let Some(tool) = locate_tool(nvidia_smi) else {
        return Ok(None);
    };

    let query = format!("--query-gpu={NVIDIA_QUERY_FIELDS}");
    let mut devices = parse_nvidia_devices(&run_tool(&tool, &[&query, "--format=csv,noheader,nounits"])?)?;

    let driver_output = run_tool(&tool, &["--query-gpu=driver_version", "--format=csv,noheader"])?;
    let driver = parse_driver_version(&driver_output);
    if driver.is_none() && !devices.is_empty() {
        tracing::warn!(output = driver_output.trim(), "unrecognised NVIDIA driver version");
    }

    let query = format!("--query-gpu={NVIDIA_COMPUTE_CAP_FIELDS}");
    match run_tool(&tool, &[&query, "--format=csv,noheader,nounits"]) {
        Ok(output) => apply_compute_capabilities(&mut devices, &parse_compute_capabilities(&output)?),
        Err(report) => tracing::warn!(
            error = ?report,
            "compute capability not reported, CUDA devices left unclassified"
        ),
    }

    Ok(Some(NvidiaQuery { devices, driver }))
}

fn apply_compute_capabilities(devices: &mut [Device], capabilities: &HashMap<u32, (u32, u32)>) {
    for device in devices {
        if let Some(&(sm_major, sm_minor)) = capabilities.get(&device.id) {
            device.vendor = DeviceVendor::Cuda { sm_major, sm_minor };
        }
    }
}

/// Query AMD devices; `Ok(None)` when `rocm-smi` is not installed.
pub fn probe_amd(rocm_smi: &Path) -> KernelResult<Option<Vec<Device>>> {
    let Some(tool) = locate_tool(rocm_smi) else {
        return Ok(None);
    };
    let stdout = run_tool(&tool, &["--showproductname", "--showmeminfo", "vram", "--csv"])?;
    parse_rocm_devices(&stdout).map(Some)
}

// ============================================================================
// Output parsing
// ============================================================================

/// First non-empty line of `nvidia-smi --query-gpu=driver_version` output.
pub fn parse_driver_version(output: &str) -> Option<DriverVersion> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse().ok())
}

fn probe_error(message: String, line_no: usize, line: &str) -> Report<KernelError> {
    Report::new(KernelError::Probe(message)).attach(format!("line {}: {line}", line_no + 1))
}

/// Parse `nvidia-smi` rows of [`NVIDIA_QUERY_FIELDS`].
///
/// The name column may itself contain commas, so the fixed columns are read
/// from both ends of the row. Devices carry [`UNKNOWN_COMPUTE_CAPABILITY`]
/// until [`parse_compute_capabilities`] output is applied.
pub fn parse_nvidia_devices(csv: &str) -> KernelResult<Vec<Device>> {
    let mut devices = Vec::new();

    for (line_no, line) in csv.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split(',').map(str::trim).collect();
        if cols.len() < 4 {
            return Err(probe_error(
                format!("expected 4 columns, found {}", cols.len()),
                line_no,
                line,
            ));
        }
        let n = cols.len();

        let id: u32 = cols[0]
            .parse()
            .map_err(|_| probe_error(format!("bad index {:?}", cols[0]), line_no, line))?;
        let memory_mib: u64 = cols[n - 1]
            .parse()
            .map_err(|_| probe_error(format!("bad memory {:?}", cols[n - 1]), line_no, line))?;

        let (sm_major, sm_minor) = UNKNOWN_COMPUTE_CAPABILITY;
        devices.push(Device::cuda(
            cols[1],
            id,
            cols[2..n - 1].join(","),
            sm_major,
            sm_minor,
            memory_mib * MIB,
        ));
    }

    Ok(devices)
}

/// Parse `nvidia-smi` rows of [`NVIDIA_COMPUTE_CAP_FIELDS`] into index → (major, minor).
///
/// Rows reporting `[N/A]` or similar are skipped.
pub fn parse_compute_capabilities(csv: &str) -> KernelResult<HashMap<u32, (u32, u32)>> {
    let mut capabilities = HashMap::new();

    for (line_no, line) in csv.lines().enumerate() {
        let Some((index, capability)) = line.split_once(',') else {
            if line.trim().is_empty() {
                continue;
            }
            return Err(probe_error("expected 2 columns".into(), line_no, line));
        };
        let id: u32 = index
            .trim()
            .parse()
            .map_err(|_| probe_error(format!("bad index {:?}", index.trim()), line_no, line))?;
        match parse_compute_capability(capability.trim()) {
            Some(capability) => {
                capabilities.insert(id, capability);
            }
            None => tracing::debug!(id, capability = capability.trim(), "no compute capability"),
        }
    }

    Ok(capabilities)
}

fn parse_compute_capability(text: &str) -> Option<(u32, u32)> {
    let (major, minor) = text.split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

fn column(header: &[&str], names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| names.iter().any(|name| h.eq_ignore_ascii_case(name)))
}

/// Parse `rocm-smi --showproductname --showmeminfo vram --csv`.
///
/// Columns are located by header name because their set and order differ
/// between ROCm releases. The `GFX Version` column (e.g. `gfx900`) is used as
/// the generation marker, falling back to `Card series`.
pub fn parse_rocm_devices(csv: &str) -> KernelResult<Vec<Device>> {
    let mut lines = csv
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<&str> = header_line.split(',').map(str::trim).collect();

    let device_col = column(&header, &["device"]).ok_or_else(|| {
        Report::new(KernelError::Probe("rocm-smi output has no device column".into()))
            .attach(header_line.to_string())
    })?;
    let vram_col = column(&header, &["VRAM Total Memory (B)"]).ok_or_else(|| {
        Report::new(KernelError::Probe("rocm-smi output has no VRAM column".into()))
            .attach(header_line.to_string())
    })?;
    let series_col = column(&header, &["Card series", "Card Series"]);
    let gfx_col = column(&header, &["GFX Version"]);
    let uuid_col = column(&header, &["Unique ID", "GUID"]);

    let mut devices = Vec::new();
    for (line_no, line) in lines {
        let cols: Vec<&str> = line.split(',').map(str::trim).collect();
        let cell = |idx: usize| cols.get(idx).copied().unwrap_or("");

        let device = cell(device_col);
        let id: u32 = device
            .trim_start_matches(|c: char| !c.is_ascii_digit())
            .parse()
            .map_err(|_| probe_error(format!("bad device {device:?}"), line_no, line))?;
        let memory_bytes: u64 = cell(vram_col)
            .parse()
            .map_err(|_| probe_error(format!("bad VRAM {:?}", cell(vram_col)), line_no, line))?;

        let name = series_col.map(cell).unwrap_or("").to_string();
        let codename = gfx_col
            .map(cell)
            .filter(|gfx| !gfx.is_empty() && *gfx != "N/A")
            .unwrap_or(&name)
            .to_string();
        let uuid = uuid_col
            .map(cell)
            .filter(|uuid| !uuid.is_empty() && *uuid != "N/A")
            .map(str::to_string)
            .unwrap_or_else(|| format!("AMD-{id}"));

        devices.push(Device::amd(uuid, id, name, codename, memory_bytes));
    }

    Ok(devices)
}

// ============================================================================
// Tests
// ============================================================================
