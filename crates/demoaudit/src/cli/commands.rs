//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::audit::{AuditSettings, EndingPolicy};
use crate::config::Config;
use crate::report::OutputFormat;

/// Options shared by the auditing commands.
#[derive(Debug, Clone, Default, Args)]
pub struct AuditArgs {
    /// Demo data file (defaults to the configured source path)
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// How strictly demo endings are judged
    #[arg(short, long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Mode every demo should end in
    #[arg(short = 'm', long, value_name = "MODE")]
    pub expected_mode: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Exit with status 1 when any demo needs updating
    #[arg(long)]
    pub strict: bool,
}

impl AuditArgs {
    /// The source file, falling back to the configured path.
    #[must_use]
    pub fn source_path(&self, config: &Config) -> PathBuf {
        self.source
            .clone()
            .unwrap_or_else(|| config.source.path.clone())
    }

    /// Audit settings with command-line overrides applied.
    #[must_use]
    pub fn settings(&self, config: &Config) -> AuditSettings {
        let mut settings = config.audit_settings();
        if let Some(policy) = self.policy {
            settings.policy = policy.into();
        }
        if let Some(mode) = &self.expected_mode {
            settings.expected_mode.clone_from(mode);
        }
        settings
    }

    /// The output format, or `fallback` when none was given.
    #[must_use]
    pub fn format_or(&self, fallback: OutputFormat) -> OutputFormat {
        self.format.unwrap_or(fallback)
    }
}

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Shared audit options
    #[command(flatten)]
    pub audit: AuditArgs,
}

/// Analyze command arguments.
#[derive(Debug, Args)]
pub struct AnalyzeCommand {
    /// Demo id to audit (repeatable; defaults to the configured ids)
    #[arg(short, long = "id", value_name = "ID")]
    pub ids: Vec<String>,

    /// Shared audit options
    #[command(flatten)]
    pub audit: AuditArgs,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Demo data file (defaults to the configured source path)
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Ending policy argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Flag every demo not ending in the expected mode
    Strict,
    /// Accept demos whose last command is the escape command
    AllowTrailingEscape,
}

impl From<PolicyArg> for EndingPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Strict => Self::Strict,
            PolicyArg::AllowTrailingEscape => Self::AllowTrailingEscape,
        }
    }
}
