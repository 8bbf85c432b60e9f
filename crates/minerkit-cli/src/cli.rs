//! CLI command definitions using clap

use crate::output::OutputFormat;
use crate::selector::DeviceSelector;
use clap::{Parser, Subcommand};
use minerkit_kernel::DriverVersion;
use std::path::PathBuf;

/// minerkit - inspect GPUs and render BMiner launches
#[derive(Parser)]
#[command(name = "minerkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, table)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<OutputFormat>,

    /// Plugin root directory [default: miner_plugins/<plugin uuid>]
    #[arg(long, global = true, env = "MINERKIT_PLUGIN_ROOT")]
    pub plugin_root: Option<PathBuf>,

    /// Installed NVIDIA driver version, overrides the probed one
    #[arg(long, global = true)]
    pub driver: Option<DriverVersion>,

    /// Read devices from a saved snapshot instead of probing the machine
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// nvidia-smi executable
    #[arg(long, global = true)]
    pub nvidia_smi: Option<PathBuf>,

    /// rocm-smi executable
    #[arg(long, global = true)]
    pub rocm_smi: Option<PathBuf>,

    /// Do not query NVIDIA devices
    #[arg(long, global = true)]
    pub skip_nvidia: bool,

    /// Do not query AMD devices
    #[arg(long, global = true)]
    pub skip_amd: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List detected devices
    Devices {
        /// Write the device snapshot to this file (json, yaml or toml)
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Show which algorithms each device may run
    Algorithms,

    /// Print the worker command line for one algorithm
    Launch {
        /// Algorithm name, e.g. Beam or GrinCuckatoo31
        #[arg(short, long)]
        algorithm: String,

        /// Pool URL, e.g. stratum+tcp://beam.eu.nicehash.com:3370
        #[arg(short, long)]
        pool: String,

        /// Pool username (wallet.worker)
        #[arg(short, long)]
        user: String,

        /// Local API port of the worker
        #[arg(long, default_value_t = 4000)]
        api_port: u16,

        /// Extra worker parameters, e.g. "-nofee -intensity 8"
        #[arg(short, long, default_value = "", allow_hyphen_values = true)]
        extra: String,

        /// Only use these devices: N or cuda:N for CUDA, amd:N for AMD
        #[arg(short, long = "device")]
        devices: Vec<DeviceSelector>,
    },

    /// Check the binary package for missing files
    Check {
        /// Exit with failure when files are missing
        #[arg(long)]
        strict: bool,
    },
}
