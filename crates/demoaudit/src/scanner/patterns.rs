//! Built-in field patterns for demo extraction.
//!
//! Each pattern recognises one key of a demo object literal. Values are
//! single-quoted strings; the first capture group holds the raw (still
//! escaped) contents.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Single-quoted string literal with backslash escapes.
const QUOTED: &str = r"'((?:[^'\\\n]|\\.)*)'";

/// A compiled field pattern.
#[derive(Debug)]
pub struct FieldPattern {
    /// Name of the pattern for identification.
    pub name: &'static str,

    /// Description of what this pattern matches.
    pub description: &'static str,

    regex: Regex,
}

impl FieldPattern {
    /// Create a new field pattern.
    ///
    /// # Panics
    ///
    /// Panics if the regex pattern is invalid.
    #[must_use]
    pub fn new(name: &'static str, description: &'static str, pattern: &str) -> Self {
        Self {
            name,
            description,
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
        }
    }

    /// Check if the content matches this pattern.
    #[must_use]
    pub fn matches(&self, content: &str) -> bool {
        self.regex.is_match(content)
    }

    /// Find the first match.
    #[must_use]
    pub fn find<'a>(&self, content: &'a str) -> Option<regex::Match<'a>> {
        self.regex.find(content)
    }

    /// Captures of the first match.
    #[must_use]
    pub fn captures<'a>(&self, content: &'a str) -> Option<Captures<'a>> {
        self.regex.captures(content)
    }

    /// Captures of every match, in order.
    pub fn captures_iter<'a>(
        &'a self,
        content: &'a str,
    ) -> impl Iterator<Item = Captures<'a>> + 'a {
        self.regex.captures_iter(content)
    }

    /// The unescaped value of the first match, if the pattern captures one.
    #[must_use]
    pub fn first_value(&self, content: &str) -> Option<String> {
        self.captures(content)
            .and_then(|c| c.get(1))
            .map(|m| unescape(m.as_str()))
    }
}

/// The full set of patterns used by the scanner.
#[derive(Debug)]
pub struct DemoPatterns {
    /// Start of a demo object: `{ id: '...'`.
    pub demo_start: FieldPattern,
    /// Demo title.
    pub title: FieldPattern,
    /// Opening of the steps array.
    pub steps_start: FieldPattern,
    /// A step's command.
    pub command: FieldPattern,
    /// Opening of a step's `before` state.
    pub before_block: FieldPattern,
    /// Opening of a step's `after` state.
    pub after_block: FieldPattern,
    /// A state's mode.
    pub mode: FieldPattern,
}

/// Patterns shared by every scan.
pub static PATTERNS: Lazy<DemoPatterns> = Lazy::new(builtin_patterns);

/// Build the built-in pattern set.
#[must_use]
pub fn builtin_patterns() -> DemoPatterns {
    DemoPatterns {
        demo_start: FieldPattern::new(
            "demo_start",
            "Object literal opening with an id key",
            &format!(r"\{{\s*id\s*:\s*{QUOTED}"),
        ),
        title: FieldPattern::new(
            "title",
            "Demo title",
            &format!(r"\btitle\s*:\s*{QUOTED}"),
        ),
        steps_start: FieldPattern::new("steps_start", "Steps array opening", r"\bsteps\s*:\s*\["),
        command: FieldPattern::new(
            "command",
            "Step command",
            &format!(r"\bcommand\s*:\s*{QUOTED}"),
        ),
        before_block: FieldPattern::new(
            "before_block",
            "Editor state before the step",
            r"\bbefore\s*:\s*\{",
        ),
        after_block: FieldPattern::new(
            "after_block",
            "Editor state after the step",
            r"\bafter\s*:\s*\{",
        ),
        mode: FieldPattern::new("mode", "Editor mode", &format!(r"\bmode\s*:\s*{QUOTED}")),
    }
}

/// Resolve backslash escapes in a single-quoted string body.
#[must_use]
pub fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
