//! Front-end output: the check report and the console progress surface
//!
//! The console handler is the minimal interactive front end: it renders the
//! coarse percentage as a bar and appends status and process-output lines
//! above it.

use crate::progress::{ProgressEvent, ProgressHandler};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable formatted text
    Human,
}

/// Result of one preflight check
#[derive(Debug, Clone, Serialize)]
pub struct CheckEntry {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

/// Result of `pipewright check`
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub checks: Vec<CheckEntry>,
}

impl CheckReport {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn push(&mut self, name: &str, passed: bool, detail: impl Into<String>) {
        self.checks.push(CheckEntry {
            name: name.to_string(),
            passed,
            detail: detail.into(),
        });
    }

    /// True when every check passed
    pub fn ok(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize check report")
            }
            OutputFormat::Human => {
                let mut out = String::new();
                for check in &self.checks {
                    let icon = if check.passed { "+" } else { "x" };
                    out.push_str(&format!("{} {}: {}\n", icon, check.name, check.detail));
                }
                out.push_str(if self.ok() {
                    "All checks passed\n"
                } else {
                    "Some checks failed\n"
                });
                Ok(out)
            }
        }
    }
}

impl Default for CheckReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress handler that renders a console progress bar.
pub struct ConsoleHandler {
    bar: ProgressBar,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("[{bar:40}] {pos:>3}% {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self { bar }
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressHandler for ConsoleHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { root } => {
                self.bar.println(format!("Starting build in {}", root));
            }
            ProgressEvent::StageStarted { stage } => {
                self.bar.set_message(stage.clone());
            }
            ProgressEvent::StageComplete { percent, .. } => {
                self.bar.set_position(u64::from(*percent));
            }
            ProgressEvent::Detail { message } => {
                self.bar.println(message.clone());
            }
            ProgressEvent::ProcessOutput { line } => {
                self.bar.println(line.clone());
            }
            ProgressEvent::Completed { .. } => {
                self.bar.set_position(100);
                self.bar.finish_with_message("done");
            }
            ProgressEvent::Failed { error } => {
                self.bar.abandon_with_message(format!("failed: {}", error));
            }
        }
    }
}
