//! Rendering audit results for the terminal.
//!
//! Three formats are supported:
//!
//! - **Plain**: flagged demos in detail, then a one-line summary per demo.
//! - **Table**: an aligned row per demo with mode, command and verdict,
//!   followed by totals and the list of demos to update.
//! - **JSON**: the full report plus summary counts.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::audit::{AuditReport, DemoEnding, EndingStatus};
use crate::demo::Demo;
use crate::error::Result;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Aligned table
    Table,
    /// JSON output
    Json,
}

const RULE_WIDE: usize = 70;
const RULE_NARROW: usize = 60;
const RULE_DETAIL: usize = 50;

/// Render an audit report.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(report: &AuditReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(PlainReport(report).to_string()),
        OutputFormat::Table => Ok(TableReport(report).to_string()),
        OutputFormat::Json => {
            let json = JsonReport {
                summary: Summary::of(report),
                report,
            };
            Ok(serde_json::to_string_pretty(&json)?)
        }
    }
}

/// Render an inventory of scanned demos.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_demo_list(demos: &[Demo], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain | OutputFormat::Table => Ok(DemoList(demos).to_string()),
        OutputFormat::Json => {
            let entries: Vec<DemoListEntry<'_>> = demos.iter().map(DemoListEntry::from).collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
    }
}

/// Short label for a verdict.
#[must_use]
pub fn status_label(status: EndingStatus) -> &'static str {
    match status {
        EndingStatus::Normal => "✓ OK",
        EndingStatus::TrailingEscape => "↩ Ends with ESC",
        EndingStatus::NeedsEscape => "✗ NEEDS ESC",
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    total: usize,
    ok: usize,
    flagged: usize,
    skipped: usize,
    missing: usize,
}

impl Summary {
    fn of(report: &AuditReport) -> Self {
        Self {
            total: report.total(),
            ok: report.ok_count(),
            flagged: report.flagged_count(),
            skipped: report.skipped.len(),
            missing: report.missing.len(),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    #[serde(flatten)]
    report: &'a AuditReport,
}

#[derive(Debug, Serialize)]
struct DemoListEntry<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_command: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_mode: Option<&'a str>,
}

impl<'a> From<&'a Demo> for DemoListEntry<'a> {
    fn from(demo: &'a Demo) -> Self {
        Self {
            id: &demo.id,
            title: demo.title.as_deref(),
            steps: demo.step_count(),
            last_command: demo.last_command(),
            last_mode: demo.last_mode(),
        }
    }
}

fn rule(f: &mut fmt::Formatter<'_>, ch: char, width: usize) -> fmt::Result {
    writeln!(f, "{}", ch.to_string().repeat(width))
}

fn write_detail(f: &mut fmt::Formatter<'_>, ending: &DemoEnding) -> fmt::Result {
    writeln!(f, "Demo: {}", ending.id)?;
    writeln!(f, "  Last mode: {}", ending.last_mode)?;
    writeln!(f, "  Last command: {}", ending.last_command)?;
    writeln!(f)
}

fn write_unmatched(f: &mut fmt::Formatter<'_>, report: &AuditReport) -> fmt::Result {
    if !report.missing.is_empty() {
        writeln!(f)?;
        writeln!(f, "Demos not found in source:")?;
        for id in &report.missing {
            writeln!(f, "  - {id}")?;
        }
    }
    if !report.skipped.is_empty() {
        writeln!(f)?;
        writeln!(f, "Demos skipped (no commands or modes):")?;
        for id in &report.skipped {
            writeln!(f, "  - {id}")?;
        }
    }
    Ok(())
}

struct PlainReport<'a>(&'a AuditReport);

impl fmt::Display for PlainReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "Total demos analyzed: {}", report.total())?;
        writeln!(f)?;
        writeln!(
            f,
            "Demos that DON'T end in {} mode:",
            report.expected_mode
        )?;
        rule(f, '=', RULE_NARROW)?;
        for ending in report.flagged() {
            write_detail(f, ending)?;
        }

        writeln!(f)?;
        writeln!(f, "Summary of all demos:")?;
        rule(f, '=', RULE_NARROW)?;
        for ending in &report.endings {
            writeln!(
                f,
                "{:30} | Mode: {:10} | {}",
                ending.id,
                ending.last_mode,
                status_label(ending.status)
            )?;
        }

        write_unmatched(f, report)
    }
}

struct TableReport<'a>(&'a AuditReport);

impl fmt::Display for TableReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "Analyzing {} demos...", report.total())?;
        rule(f, '=', RULE_WIDE)?;
        for ending in &report.endings {
            writeln!(
                f,
                "{:30} | Mode: {:10} | Cmd: {:30} | {}",
                ending.id,
                ending.last_mode,
                ending.last_command,
                status_label(ending.status)
            )?;
        }

        writeln!(f)?;
        rule(f, '=', RULE_WIDE)?;
        writeln!(f)?;
        writeln!(f, "Total demos: {}", report.total())?;
        writeln!(
            f,
            "Demos ending in {} mode: {}",
            report.expected_mode,
            report.ok_count()
        )?;
        writeln!(f, "Demos needing ESC: {}", report.flagged_count())?;

        if report.has_findings() {
            writeln!(f)?;
            writeln!(f, "Demos that need to be updated to end with ESC:")?;
            rule(f, '-', RULE_DETAIL)?;
            for ending in report.flagged() {
                writeln!(f, "  - {}", ending.id)?;
                writeln!(f, "    Last command: {}", ending.last_command)?;
                writeln!(f, "    Last mode: {}", ending.last_mode)?;
                writeln!(f)?;
            }
        }

        write_unmatched(f, report)
    }
}

struct DemoList<'a>(&'a [Demo]);

impl fmt::Display for DemoList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} demos", self.0.len())?;
        rule(f, '=', RULE_WIDE)?;
        for demo in self.0 {
            writeln!(
                f,
                "{:30} | {:>3} steps | Mode: {:10} | {}",
                demo.id,
                demo.step_count(),
                demo.last_mode().unwrap_or("-"),
                demo.title.as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }
}
