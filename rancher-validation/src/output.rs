//! Report formatting for the CLI

use crate::checks::CheckReport;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "CHECK")]
    check: String,
    #[tabled(rename = "SECRET")]
    secret: String,
    #[tabled(rename = "RESULT")]
    result: String,
    #[tabled(rename = "DETAIL")]
    detail: String,
}

impl From<&CheckReport> for CheckRow {
    fn from(report: &CheckReport) -> Self {
        Self {
            check: report.check.clone(),
            secret: if report.secret.is_empty() {
                "-".to_string()
            } else {
                report.secret.clone()
            },
            result: if report.passed {
                "PASS".to_string()
            } else {
                "FAIL".to_string()
            },
            detail: truncate(&report.detail, 80),
        }
    }
}

/// Print check reports in `format`, followed by a summary line for tables
pub fn print_reports(reports: &[CheckReport], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            print_table(reports.iter().map(CheckRow::from).collect());
            print_summary(reports);
        }
        OutputFormat::Json => print_json(&reports)?,
        OutputFormat::Yaml => print_yaml(&reports)?,
    }
    Ok(())
}

pub fn print_summary(reports: &[CheckReport]) {
    let failed = reports.iter().filter(|r| !r.passed).count();
    if failed == 0 {
        print_success(&format!("{} of {} checks passed", reports.len(), reports.len()));
    } else {
        print_error(&format!("{} of {} checks failed", failed, reports.len()));
    }
}

pub fn print_table<T: Tabled>(data: Vec<T>) {
    if data.is_empty() {
        println!("{}", "No checks were run".yellow());
        return;
    }

    println!("{}", Table::new(data));
}

pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

pub fn print_yaml<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_yaml::to_string(data)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

/// Truncate to `max_len` characters with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
