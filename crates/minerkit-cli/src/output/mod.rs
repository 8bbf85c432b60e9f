//! Output formatting module
//!
//! Every command builds a serializable report and hands it here together
//! with a table rendering and a plain text rendering.

mod table;

pub use table::TableBuilder;

use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for automation
    Json,
    /// Table-formatted output
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// A command result that knows how to show itself in each format.
pub trait Report: Serialize {
    fn to_table(&self) -> TableBuilder;

    fn to_text(&self) -> String;
}

/// Print `report` to stdout in `format`.
pub fn emit<R: Report>(report: &R, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => println!("{}", report.to_table().build()),
    }
    Ok(())
}

/// `1.50 GiB`
pub fn format_bytes(bytes: u64) -> String {
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
    format!("{:.2} GiB", bytes as f64 / GIB)
}
