//! `demoaudit` - Find editor demos that do not end in normal mode
//!
//! This library scans demo definition files (sequences of editor commands
//! with before/after state annotations), works out the last command and mode
//! of each demo, and reports the demos that still need a trailing escape.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod audit;
pub mod cli;
pub mod config;
pub mod demo;
pub mod error;
pub mod logging;
pub mod report;
pub mod scanner;

pub use audit::{AuditReport, AuditSettings, Auditor, DemoEnding, EndingPolicy, EndingStatus};
pub use config::Config;
pub use demo::{Demo, DemoStep};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use report::{render, render_demo_list, OutputFormat};
