//! Progress reporting
//!
//! The executor talks to a [`ProgressSink`]; it never prints. Two sinks ship
//! with the crate:
//!
//! - [`TerminalReporter`]: colored status lines and a progress bar (crossterm)
//! - [`RecordingSink`]: keeps every event, for tests and embedding

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};

use crate::types::Deployment;

/// Receiver of execution progress events
pub trait ProgressSink {
    /// Called once, before the first step, with the number of steps
    fn on_plan(&mut self, total: usize);

    fn on_start(&mut self, feature: &str, label: &str);

    fn on_success(&mut self, feature: &str, label: &str);

    fn on_failure(&mut self, feature: &str, label: &str, error: &str);

    /// Called after every successful step
    fn on_progress(&mut self, completed: usize, total: usize);
}

// ============================================================================
// Recording
// ============================================================================

/// One observed sink call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Plan { total: usize },
    Start { feature: String, label: String },
    Success { feature: String, label: String },
    Failure { feature: String, label: String, error: String },
    Progress { completed: usize, total: usize },
}

/// Sink that records events in order
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<ProgressEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Features whose steps started, in order (repeats included)
    pub fn started(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Start { feature, .. } => Some(feature.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Success { .. }))
            .count()
    }

    pub fn failures(&self) -> Vec<&ProgressEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Failure { .. }))
            .collect()
    }

    /// `(completed, total)` pairs reported so far
    pub fn progress(&self) -> Vec<(usize, usize)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Progress { completed, total } => Some((*completed, *total)),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn on_plan(&mut self, total: usize) {
        self.events.push(ProgressEvent::Plan { total });
    }

    fn on_start(&mut self, feature: &str, label: &str) {
        self.events.push(ProgressEvent::Start {
            feature: feature.to_string(),
            label: label.to_string(),
        });
    }

    fn on_success(&mut self, feature: &str, label: &str) {
        self.events.push(ProgressEvent::Success {
            feature: feature.to_string(),
            label: label.to_string(),
        });
    }

    fn on_failure(&mut self, feature: &str, label: &str, error: &str) {
        self.events.push(ProgressEvent::Failure {
            feature: feature.to_string(),
            label: label.to_string(),
            error: error.to_string(),
        });
    }

    fn on_progress(&mut self, completed: usize, total: usize) {
        self.events.push(ProgressEvent::Progress { completed, total });
    }
}

// ============================================================================
// Terminal
// ============================================================================

/// Width of the bar between the brackets
pub const BAR_WIDTH: usize = 30;

/// Render `[####------] 42% (3/7)`.
///
/// `total == 0` renders as complete.
pub fn render_progress_bar(completed: usize, total: usize, width: usize) -> String {
    let completed = completed.min(total);
    let (filled, percent) = if total == 0 {
        (width, 100)
    } else {
        (width * completed / total, completed * 100 / total)
    };
    format!(
        "[{}{}] {}% ({}/{})",
        "#".repeat(filled),
        "-".repeat(width - filled),
        percent,
        completed,
        total
    )
}

/// Closing reminder for the chosen deployment platform
pub fn deployment_reminder(deployment: Deployment) -> Option<String> {
    match deployment {
        Deployment::None => None,
        platform => Some(format!(
            "Remember to set up your project on {} after pushing your code!",
            platform
        )),
    }
}

/// Colored line-per-event reporter
///
/// Status lines are written between commands, never while one runs, so
/// they do not interleave with generator output on the same terminal.
pub struct TerminalReporter<W: Write> {
    out: W,
}

impl TerminalReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, color: Color, text: &str) {
        // Terminal write failures are not worth aborting a run over
        let _ = queue!(
            self.out,
            SetForegroundColor(color),
            Print(text),
            ResetColor,
            Print("\n")
        );
        let _ = self.out.flush();
    }

    /// Print the closing messages after a successful run
    pub fn finish(&mut self, deployment: Deployment) {
        let _ = queue!(
            self.out,
            SetAttribute(Attribute::Bold),
            SetForegroundColor(Color::Green),
            Print("Application setup complete!"),
            ResetColor,
            SetAttribute(Attribute::Reset),
            Print("\n")
        );
        if let Some(reminder) = deployment_reminder(deployment) {
            self.line(Color::Blue, &reminder);
        }
        let _ = self.out.flush();
    }
}

impl<W: Write> ProgressSink for TerminalReporter<W> {
    fn on_plan(&mut self, total: usize) {
        self.line(Color::Cyan, &format!("Setting up your project ({} steps)", total));
    }

    fn on_start(&mut self, _feature: &str, label: &str) {
        self.line(Color::Yellow, &format!("… {}...", label));
    }

    fn on_success(&mut self, _feature: &str, label: &str) {
        self.line(Color::Green, &format!("✔ {} completed successfully.", label));
    }

    fn on_failure(&mut self, _feature: &str, label: &str, error: &str) {
        self.line(Color::Red, &format!("✖ {} failed. Error: {}", label, error));
    }

    fn on_progress(&mut self, completed: usize, total: usize) {
        self.line(
            Color::Cyan,
            &render_progress_bar(completed, total, BAR_WIDTH),
        );
    }
}
