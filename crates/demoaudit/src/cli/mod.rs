//! Command-line interface for demoaudit.
//!
//! This module provides the CLI structure for the `demoaudit` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{AnalyzeCommand, AuditArgs, CheckCommand, ConfigCommand, ListCommand, PolicyArg};

/// demoaudit - Find editor demos that do not end in normal mode
///
/// Scans a demo data file, reads each demo's last command and recorded mode,
/// and reports the demos that still need a trailing escape step.
#[derive(Debug, Parser)]
#[command(name = "demoaudit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Audit every demo in the source file
    Check(CheckCommand),

    /// Audit selected demos by id
    Analyze(AnalyzeCommand),

    /// List the demos found in the source file
    List(ListCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use crate::report::OutputFormat;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "demoaudit");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["demoaudit", "check"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["demoaudit", "-v", "check"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["demoaudit", "-vv", "check"]).verbosity(), Verbosity::Trace);
        assert_eq!(parse(&["demoaudit", "-q", "-v", "check"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_parse_check_with_source_and_flags() {
        let cli = parse(&[
            "demoaudit",
            "check",
            "demos.ts",
            "--policy",
            "allow-trailing-escape",
            "--format",
            "json",
            "--strict",
        ]);
        let Command::Check(cmd) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(cmd.audit.source, Some(PathBuf::from("demos.ts")));
        assert_eq!(cmd.audit.policy, Some(PolicyArg::AllowTrailingEscape));
        assert_eq!(cmd.audit.format, Some(OutputFormat::Json));
        assert!(cmd.audit.strict);
    }

    #[test]
    fn test_parse_analyze_ids() {
        let cli = parse(&[
            "demoaudit",
            "analyze",
            "--id",
            "csv-cleanup",
            "-i",
            "text-objects",
            "-m",
            "visual",
        ]);
        let Command::Analyze(cmd) = cli.command else {
            panic!("expected analyze command");
        };
        assert_eq!(cmd.ids, vec!["csv-cleanup", "text-objects"]);
        assert_eq!(cmd.audit.expected_mode.as_deref(), Some("visual"));
        assert!(cmd.audit.source.is_none());
    }

    #[test]
    fn test_parse_list() {
        let cli = parse(&["demoaudit", "list", "--format", "table"]);
        assert!(matches!(cli.command, Command::List(_)));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["demoaudit", "config", "validate", "--file", "x.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["demoaudit", "-c", "/custom/config.toml", "check"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(Cli::try_parse_from(["demoaudit", "check", "--policy", "lenient"]).is_err());
    }
}
