//! `minerkit check`

use crate::context::CliContext;
use crate::error::CliError;
use crate::output::{Report, TableBuilder, emit};
use colored::Colorize;
use minerkit_kernel::{BinaryPackageMissingFilesChecker, MinerPlugin};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub plugin: String,
    pub version: String,
    pub bins_root: String,
    pub missing: Vec<String>,
}

impl Report for CheckReport {
    fn to_table(&self) -> TableBuilder {
        let table = TableBuilder::new().headers(&["file", "status"]);
        if self.missing.is_empty() {
            return table.add_row(vec![self.bins_root.clone(), "complete".into()]);
        }
        self.missing.iter().fold(table, |table, file| {
            table.add_row(vec![file.clone(), "missing".into()])
        })
    }

    fn to_text(&self) -> String {
        let header = format!("{} {} ({})", self.plugin.bold(), self.version, self.bins_root);
        if self.missing.is_empty() {
            return format!("{header}\n{} binary package complete", "✓".green());
        }
        let mut lines = vec![header];
        lines.extend(
            self.missing
                .iter()
                .map(|file| format!("{} missing {file}", "✗".red())),
        );
        lines.join("\n")
    }
}

pub fn run(ctx: &CliContext, strict: bool) -> anyhow::Result<()> {
    let metadata = ctx.plugin.metadata();
    let report = CheckReport {
        plugin: metadata.name.clone(),
        version: metadata.version_string(),
        bins_root: ctx.plugin.bins_root().display().to_string(),
        missing: ctx.plugin.check_binary_package_missing_files(),
    };
    emit(&report, ctx.output)?;

    if strict && !report.missing.is_empty() {
        return Err(CliError::MissingFiles(report.missing).into());
    }
    Ok(())
}
