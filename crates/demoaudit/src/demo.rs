//! Demo record types.
//!
//! A demo is a named sequence of editor commands, each annotated with the
//! editor state before and after the command runs. Only the parts needed for
//! auditing are kept: the command text and the recorded modes.

use serde::{Deserialize, Serialize};

/// A single step of a demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoStep {
    /// The command typed in this step (e.g. `ciw`, `<Esc>`).
    pub command: String,

    /// Mode recorded in the step's `before` state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_mode: Option<String>,

    /// Mode recorded in the step's `after` state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_mode: Option<String>,
}

impl DemoStep {
    /// Create a step with only a command.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            before_mode: None,
            after_mode: None,
        }
    }

    /// Set the mode recorded after this step.
    #[must_use]
    pub fn with_after_mode(mut self, mode: impl Into<String>) -> Self {
        self.after_mode = Some(mode.into());
        self
    }

    /// Set the mode recorded before this step.
    #[must_use]
    pub fn with_before_mode(mut self, mode: impl Into<String>) -> Self {
        self.before_mode = Some(mode.into());
        self
    }
}

/// A demo extracted from the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demo {
    /// The demo identifier.
    pub id: String,

    /// Human-readable title, if the demo has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Steps in source order.
    pub steps: Vec<DemoStep>,
}

impl Demo {
    /// Create an empty demo with the given identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            steps: Vec::new(),
        }
    }

    /// Commands of every step, in order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.command.as_str())
    }

    /// Recorded after-modes, in order. Steps without one are skipped.
    pub fn after_modes(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|s| s.after_mode.as_deref())
    }

    /// The command of the final step.
    #[must_use]
    pub fn last_command(&self) -> Option<&str> {
        self.steps.last().map(|s| s.command.as_str())
    }

    /// The last mode recorded in any `after` state.
    #[must_use]
    pub fn last_mode(&self) -> Option<&str> {
        self.after_modes().last()
    }

    /// Number of steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
