//! Demo ending audit.
//!
//! Every demo should leave the editor in the expected mode (normally
//! `normal`). The auditor takes the last command and the last recorded
//! after-mode of each demo and decides whether the demo needs a trailing
//! escape step.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::demo::Demo;

/// Default mode every demo should end in.
pub const DEFAULT_EXPECTED_MODE: &str = "normal";

/// Default command that returns the editor to normal mode.
pub const DEFAULT_ESCAPE_COMMAND: &str = "<Esc>";

/// How strictly a demo's final mode is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndingPolicy {
    /// Flag every demo whose last mode is not the expected mode.
    #[default]
    Strict,
    /// Do not flag a demo whose last command is already the escape command,
    /// even if the recorded mode disagrees.
    AllowTrailingEscape,
}

impl std::fmt::Display for EndingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::AllowTrailingEscape => write!(f, "allow-trailing-escape"),
        }
    }
}

/// Verdict for a single demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndingStatus {
    /// The demo ends in the expected mode.
    Normal,
    /// The last recorded mode is wrong but the last command is the escape
    /// command, and the policy accepts that.
    TrailingEscape,
    /// The demo must be updated to end with the escape command.
    NeedsEscape,
}

impl EndingStatus {
    /// Whether the demo should be updated.
    #[must_use]
    pub fn needs_update(self) -> bool {
        matches!(self, Self::NeedsEscape)
    }
}

/// The ending of one audited demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoEnding {
    /// Demo identifier.
    pub id: String,
    /// Demo title, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Command of the final step.
    pub last_command: String,
    /// Last mode recorded in an after-state.
    pub last_mode: String,
    /// Verdict.
    pub status: EndingStatus,
}

impl DemoEnding {
    /// Whether the demo should be updated.
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.status.needs_update()
    }
}

/// Settings for an audit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSettings {
    /// Mode every demo should end in.
    pub expected_mode: String,
    /// Command that returns to the expected mode.
    pub escape_command: String,
    /// Judgement policy.
    pub policy: EndingPolicy,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            expected_mode: DEFAULT_EXPECTED_MODE.to_string(),
            escape_command: DEFAULT_ESCAPE_COMMAND.to_string(),
            policy: EndingPolicy::default(),
        }
    }
}

/// Result of auditing a set of demos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// The file the demos came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Mode every demo should end in.
    pub expected_mode: String,
    /// Policy used.
    pub policy: EndingPolicy,
    /// Audited demos.
    pub endings: Vec<DemoEnding>,
    /// Demos without any command or any recorded after-mode.
    pub skipped: Vec<String>,
    /// Requested demo ids that were not found.
    pub missing: Vec<String>,
}

impl AuditReport {
    /// Attach the source path.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Number of audited demos.
    #[must_use]
    pub fn total(&self) -> usize {
        self.endings.len()
    }

    /// Demos that need updating.
    pub fn flagged(&self) -> impl Iterator<Item = &DemoEnding> {
        self.endings.iter().filter(|e| e.needs_update())
    }

    /// Number of demos that need updating.
    #[must_use]
    pub fn flagged_count(&self) -> usize {
        self.flagged().count()
    }

    /// Number of demos that do not need updating.
    #[must_use]
    pub fn ok_count(&self) -> usize {
        self.total() - self.flagged_count()
    }

    /// Whether any demo needs updating.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        self.flagged().next().is_some()
    }
}

/// Audits demo endings.
#[derive(Debug, Clone, Default)]
pub struct Auditor {
    settings: AuditSettings,
}

impl Auditor {
    /// Create an auditor with the given settings.
    #[must_use]
    pub fn new(settings: AuditSettings) -> Self {
        Self { settings }
    }

    /// The settings in use.
    #[must_use]
    pub fn settings(&self) -> &AuditSettings {
        &self.settings
    }

    /// Judge a single demo.
    ///
    /// Returns `None` when the demo has no commands or no recorded
    /// after-modes, since there is nothing to judge.
    #[must_use]
    pub fn evaluate(&self, demo: &Demo) -> Option<DemoEnding> {
        let last_command = demo.last_command()?;
        let last_mode = demo.last_mode()?;

        let status = if last_mode == self.settings.expected_mode {
            EndingStatus::Normal
        } else if self.settings.policy == EndingPolicy::AllowTrailingEscape
            && last_command == self.settings.escape_command
        {
            EndingStatus::TrailingEscape
        } else {
            EndingStatus::NeedsEscape
        };

        if status.needs_update() {
            debug!(id = %demo.id, last_mode, last_command, "Demo needs escape");
        }

        Some(DemoEnding {
            id: demo.id.clone(),
            title: demo.title.clone(),
            last_command: last_command.to_string(),
            last_mode: last_mode.to_string(),
            status,
        })
    }

    /// Audit every demo, in order.
    #[must_use]
    pub fn audit(&self, demos: &[Demo]) -> AuditReport {
        let mut report = self.empty_report();
        for demo in demos {
            self.push(&mut report, demo);
        }
        report
    }

    /// Audit only the named demos, in the requested order.
    ///
    /// Ids not present in `demos` are recorded as missing. When the source
    /// repeats an id, the first occurrence is used.
    #[must_use]
    pub fn audit_selected<S: AsRef<str>>(&self, demos: &[Demo], ids: &[S]) -> AuditReport {
        let mut by_id: HashMap<&str, &Demo> = HashMap::new();
        for demo in demos {
            by_id.entry(demo.id.as_str()).or_insert(demo);
        }

        let mut report = self.empty_report();
        for id in ids {
            let id = id.as_ref();
            match by_id.get(id) {
                Some(demo) => self.push(&mut report, demo),
                None => {
                    debug!(id, "Requested demo not found");
                    report.missing.push(id.to_string());
                }
            }
        }
        report
    }

    fn empty_report(&self) -> AuditReport {
        AuditReport {
            source: None,
            expected_mode: self.settings.expected_mode.clone(),
            policy: self.settings.policy,
            endings: Vec::new(),
            skipped: Vec::new(),
            missing: Vec::new(),
        }
    }

    fn push(&self, report: &mut AuditReport, demo: &Demo) {
        match self.evaluate(demo) {
            Some(ending) => report.endings.push(ending),
            None => {
                debug!(id = %demo.id, "Skipping demo without commands or modes");
                report.skipped.push(demo.id.clone());
            }
        }
    }
}
