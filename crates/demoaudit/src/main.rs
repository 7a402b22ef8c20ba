//! `demoaudit` - CLI for auditing demo endings
//!
//! Reads a demo data file, audits the final mode of each demo, and prints a
//! report to stdout.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use demoaudit::cli::{
    AnalyzeCommand, AuditArgs, CheckCommand, Cli, Command, ConfigCommand, ListCommand,
};
use demoaudit::{
    init_logging, render, render_demo_list, scanner, AuditReport, Auditor, Config, OutputFormat,
};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Check(cmd) => handle_check(&config, &cmd),
        Command::Analyze(cmd) => handle_analyze(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_check(config: &Config, cmd: &CheckCommand) -> anyhow::Result<ExitCode> {
    let args = &cmd.audit;
    let source = args.source_path(config);
    let demos = scanner::scan_file(&source)?;

    let report = Auditor::new(args.settings(config))
        .audit(&demos)
        .with_source(&source);

    let format = args.format_or(config.output.format.unwrap_or(OutputFormat::Plain));
    finish(args, &report, format)
}

fn handle_analyze(config: &Config, cmd: &AnalyzeCommand) -> anyhow::Result<ExitCode> {
    let args = &cmd.audit;
    let source = args.source_path(config);
    let demos = scanner::scan_file(&source)?;

    let ids = if cmd.ids.is_empty() {
        &config.audit.demo_ids
    } else {
        &cmd.ids
    };

    let auditor = Auditor::new(args.settings(config));
    let report = if ids.is_empty() {
        auditor.audit(&demos)
    } else {
        auditor.audit_selected(&demos, ids.as_slice())
    };
    let report = report.with_source(&source);

    let format = args.format_or(config.output.format.unwrap_or(OutputFormat::Table));
    finish(args, &report, format)
}

fn finish(
    args: &AuditArgs,
    report: &AuditReport,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    if !report.missing.is_empty() {
        warn!(missing = ?report.missing, "Some requested demos were not found");
    }
    if report.total() == 0 {
        warn!("No demos were audited");
    }
    info!(
        total = report.total(),
        flagged = report.flagged_count(),
        policy = %report.policy,
        "Audit complete"
    );

    println!("{}", render(report, format)?);

    if args.strict && report.has_findings() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<ExitCode> {
    let source = cmd
        .source
        .clone()
        .unwrap_or_else(|| config.source.path.clone());
    let demos = scanner::scan_file(&source)?;

    let format = cmd
        .format
        .or(config.output.format)
        .unwrap_or(OutputFormat::Table);
    println!("{}", render_demo_list(&demos, format)?);
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Source]");
                println!("  Path:               {}", config.source.path.display());
                println!();
                println!("[Audit]");
                println!("  Expected mode:      {}", config.audit.expected_mode);
                println!("  Escape command:     {}", config.audit.escape_command);
                println!("  Policy:             {}", config.audit.policy);
                println!("  Demo ids:           {}", config.audit.demo_ids.len());
                println!();
                println!("[Output]");
                match config.output.format {
                    Some(format) => println!("  Format:             {format:?}"),
                    None => println!("  Format:             (command default)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let explicit = file.is_some();
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            if explicit && !path.is_file() {
                println!("Configuration error: {} not found", path.display());
                return Ok(ExitCode::FAILURE);
            }
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
