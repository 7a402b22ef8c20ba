//! Text scanning for demo definitions.
//!
//! The scanner does not parse TypeScript. It locates demo objects by their
//! `{ id: '...'` opening and slices the text between consecutive openings
//! into sections. Inside a section:
//!
//! - **Title**: the first `title: '...'` before the steps array.
//! - **Steps**: every `command: '...'` inside `steps: [ ... ]` starts a step,
//!   which runs until the next command.
//! - **Modes**: `mode: '...'` inside the step's `before: { ... }` and
//!   `after: { ... }` blocks.
//!
//! Array and object extents are found by bracket matching that skips string
//! literals, so a `}` inside a text line does not cut a block short.
//!
//! # Example
//!
//! ```
//! use demoaudit::scanner;
//!
//! let text = "{ id: 'demo', steps: [ { command: 'i', after: { mode: 'insert' } } ] }";
//! let demos = scanner::scan(text);
//! assert_eq!(demos[0].last_mode(), Some("insert"));
//! ```

mod patterns;

use std::path::Path;

use tracing::{debug, trace};

use crate::demo::{Demo, DemoStep};
use crate::error::{Error, Result};

pub use patterns::{builtin_patterns, unescape, DemoPatterns, FieldPattern, PATTERNS};

/// Extract every demo in the text, in source order.
#[must_use]
pub fn scan(text: &str) -> Vec<Demo> {
    let starts: Vec<(usize, String)> = PATTERNS
        .demo_start
        .captures_iter(text)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let id = unescape(caps.get(1)?.as_str());
            Some((start, id))
        })
        .collect();

    let demos: Vec<Demo> = starts
        .iter()
        .enumerate()
        .map(|(i, (start, id))| {
            let end = starts.get(i + 1).map_or(text.len(), |(next, _)| *next);
            parse_section(id, &text[*start..end])
        })
        .collect();

    debug!(count = demos.len(), "Scanned demo source");
    demos
}

/// Extract a single demo by identifier. The first occurrence wins.
#[must_use]
pub fn find(text: &str, id: &str) -> Option<Demo> {
    scan(text).into_iter().find(|d| d.id == id)
}

/// Read a source file into memory.
///
/// # Errors
///
/// Returns [`Error::SourceRead`] if the file cannot be read.
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::source_read(path, e))
}

/// Read a source file and extract its demos.
///
/// # Errors
///
/// Returns [`Error::SourceRead`] if the file cannot be read.
pub fn scan_file(path: &Path) -> Result<Vec<Demo>> {
    let text = read_source(path)?;
    debug!(path = %path.display(), bytes = text.len(), "Read demo source");
    Ok(scan(&text))
}

fn parse_section(id: &str, section: &str) -> Demo {
    let mut demo = Demo::new(id);

    let Some(steps_open) = PATTERNS.steps_start.find(section) else {
        demo.title = PATTERNS.title.first_value(section);
        debug!(id, "Demo has no steps array");
        return demo;
    };

    demo.title = PATTERNS.title.first_value(&section[..steps_open.start()]);

    // Bracket index is the last byte of the `steps: [` match.
    let open = steps_open.end() - 1;
    let close = matching_close(section, open).unwrap_or(section.len());
    demo.steps = parse_steps(&section[open + 1..close]);

    debug!(id, steps = demo.steps.len(), "Parsed demo");
    demo
}

fn parse_steps(region: &str) -> Vec<DemoStep> {
    let commands: Vec<_> = PATTERNS.command.captures_iter(region).collect();

    commands
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let whole = caps.get(0)?;
            let command = unescape(caps.get(1)?.as_str());
            let end = commands
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(region.len(), |m| m.start());
            let body = &region[whole.end()..end];

            let step = DemoStep {
                before_mode: block_mode(&PATTERNS.before_block, body),
                after_mode: block_mode(&PATTERNS.after_block, body),
                command,
            };
            trace!(
                command = %step.command,
                before = ?step.before_mode,
                after = ?step.after_mode,
                "Parsed step"
            );
            Some(step)
        })
        .collect()
}

/// The mode declared in the first block opened by `opening` within `body`.
fn block_mode(opening: &FieldPattern, body: &str) -> Option<String> {
    let open_match = opening.find(body)?;
    let open = open_match.end() - 1;
    let close = matching_close(body, open).unwrap_or(body.len());
    PATTERNS.mode.first_value(&body[open + 1..close])
}

/// Index of the bracket closing the one at `open`, skipping string literals
/// and `//` or `/* */` comments.
///
/// Returns `None` when the brackets are unbalanced.
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            match b {
                b'\\' => i += 1,
                _ if b == q => quote = None,
                _ => {}
            }
        } else {
            match b {
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    i = text[i..].find('\n').map_or(bytes.len(), |n| i + n);
                    continue;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i = text[i + 2..].find("*/").map_or(bytes.len(), |n| i + 2 + n + 2);
                    continue;
                }
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'[' | b'{' | b'(' => depth += 1,
                b']' | b'}' | b')' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    None
}
