//! Report rendering
//!
//! YAML is the default, matching what operators have always reviewed. JSON
//! is for machine consumers; the table view is a coloured terminal summary.

use clap::ValueEnum;
use colored::Colorize;
use fleet_health_core::Report;
use std::fmt::Write;

use crate::error::CliError;

/// Output format options for the report
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// YAML document, one entry per machine
    #[default]
    Yaml,
    /// JSON array for machine processing
    Json,
    /// Human-readable table with colors
    Table,
}

/// Render reports in the requested format
pub fn render_reports(reports: &[Report], format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(reports)?),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(reports)?)),
        OutputFormat::Table => Ok(render_table(reports)),
    }
}

fn render_table(reports: &[Report]) -> String {
    let mut out = String::new();
    let line = "─".repeat(72);

    if reports.is_empty() {
        let _ = writeln!(out, "  {}", "No machines need attention.".green());
        return out;
    }

    for report in reports {
        let _ = writeln!(out, "{}", line);
        let _ = writeln!(
            out,
            "  {} ({})  {}",
            report.hostname.as_deref().unwrap_or("<no hostname>").bold(),
            report.sla,
            report.serial.as_deref().unwrap_or("-")
        );
        let _ = writeln!(
            out,
            "    {} / {}  user: {}",
            report.model.as_deref().unwrap_or("-"),
            report.device_type.as_deref().unwrap_or("-"),
            report.username
        );

        for (kind, problem) in &report.problems {
            let status = if problem.acknowledged {
                "ACK ".yellow()
            } else {
                "OPEN".red().bold()
            };
            let _ = writeln!(
                out,
                "    [{}] {:<8} {}",
                status,
                kind.name(),
                problem.description
            );
        }
    }

    let open: usize = reports.iter().map(Report::unacknowledged_count).sum();
    let _ = writeln!(out, "{}", line);
    let _ = writeln!(
        out,
        "  {} machine(s), {} open problem(s)",
        reports.len(),
        open
    );
    out
}
