//! Configuration management for demoaudit.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::audit::{AuditSettings, EndingPolicy, DEFAULT_ESCAPE_COMMAND, DEFAULT_EXPECTED_MODE};
use crate::error::{Error, Result};
use crate::report::OutputFormat;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "demoaudit";

/// Default demo source, relative to the working directory.
const DEFAULT_SOURCE_PATH: &str = "src/data/vim-demos.ts";

/// Environment variable prefix.
const ENV_PREFIX: &str = "DEMOAUDIT_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `DEMOAUDIT_`, sections split on `__`)
/// 2. TOML config file at `~/.config/demoaudit/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Demo source configuration.
    pub source: SourceConfig,
    /// Audit configuration.
    pub audit: AuditConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Where the demo definitions live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path to the demo data file.
    pub path: PathBuf,
}

/// Audit rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Mode every demo should end in.
    pub expected_mode: String,
    /// Command that returns to the expected mode.
    pub escape_command: String,
    /// Judgement policy.
    pub policy: EndingPolicy,
    /// Demo ids audited by `analyze` when none are given on the command line.
    /// Empty means every demo.
    pub demo_ids: Vec<String>,
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format used when none is given on the command line.
    /// Unset means each command's own default.
    pub format: Option<OutputFormat>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SOURCE_PATH),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            expected_mode: DEFAULT_EXPECTED_MODE.to_string(),
            escape_command: DEFAULT_ESCAPE_COMMAND.to_string(),
            policy: EndingPolicy::default(),
            demo_ids: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A config file that does not exist is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing, or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Self::from_figment(Self::figment(config_file))
    }

    /// Build the layered figment for a config file.
    #[must_use]
    pub fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extract and validate configuration from a figment.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.audit.expected_mode.trim().is_empty() {
            return Err(Error::config_validation("expected_mode must not be empty"));
        }

        if self.audit.escape_command.trim().is_empty() {
            return Err(Error::config_validation("escape_command must not be empty"));
        }

        if self.audit.demo_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(Error::config_validation("demo_ids must not contain empty ids"));
        }

        if self.source.path.as_os_str().is_empty() {
            return Err(Error::config_validation("source path must not be empty"));
        }

        Ok(())
    }

    /// Audit settings derived from this configuration.
    #[must_use]
    pub fn audit_settings(&self) -> AuditSettings {
        AuditSettings {
            expected_mode: self.audit.expected_mode.clone(),
            escape_command: self.audit.escape_command.clone(),
            policy: self.audit.policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.source.path, PathBuf::from("src/data/vim-demos.ts"));
        assert_eq!(config.audit.expected_mode, "normal");
        assert_eq!(config.audit.escape_command, "<Esc>");
        assert_eq!(config.audit.policy, EndingPolicy::Strict);
        assert!(config.audit.demo_ids.is_empty());
        assert_eq!(config.output.format, None);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_expected_mode() {
        let mut config = Config::default();
        config.audit.expected_mode = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("expected_mode"));
    }

    #[test]
    fn test_validate_empty_escape_command() {
        let mut config = Config::default();
        config.audit.escape_command = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("escape_command"));
    }

    #[test]
    fn test_validate_empty_demo_id() {
        let mut config = Config::default();
        config.audit.demo_ids = vec!["csv-cleanup".to_string(), String::new()];

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("demo_ids"));
    }

    #[test]
    fn test_validate_empty_source_path() {
        let mut config = Config::default();
        config.source.path = PathBuf::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_audit_settings() {
        let mut config = Config::default();
        config.audit.policy = EndingPolicy::AllowTrailingEscape;
        config.audit.expected_mode = "visual".to_string();

        let settings = config.audit_settings();
        assert_eq!(settings.policy, EndingPolicy::AllowTrailingEscape);
        assert_eq!(settings.expected_mode, "visual");
        assert_eq!(settings.escape_command, "<Esc>");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("demoaudit"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "demoaudit.toml",
                r#"
                [source]
                path = "data/demos.ts"

                [audit]
                policy = "allow-trailing-escape"
                demo_ids = ["csv-cleanup", "text-objects"]

                [output]
                format = "table"
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("demoaudit.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.source.path, PathBuf::from("data/demos.ts"));
            assert_eq!(config.audit.policy, EndingPolicy::AllowTrailingEscape);
            assert_eq!(config.audit.demo_ids.len(), 2);
            assert_eq!(config.audit.expected_mode, "normal");
            assert_eq!(config.output.format, Some(OutputFormat::Table));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("demoaudit.toml", "[audit]\nexpected_mode = \"insert\"\n")?;
            jail.set_env("DEMOAUDIT_AUDIT__EXPECTED_MODE", "visual");

            let config = Config::load_from(Some(PathBuf::from("demoaudit.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.audit.expected_mode, "visual");
            Ok(())
        });
    }

    #[test]
    fn test_load_invalid_config_fails_validation() {
        Jail::expect_with(|jail| {
            jail.create_file("demoaudit.toml", "[audit]\nescape_command = \"\"\n")?;

            let result = Config::load_from(Some(PathBuf::from("demoaudit.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("expected_mode"));
        assert!(json.contains("\"strict\""));
    }
}
