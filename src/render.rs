//! TUI rendering traits for calmirror types.
//!
//! Extension traits that add colored terminal rendering to calmirror-core
//! types using owo_colors. Colors are dropped when stdout is not a terminal
//! or `NO_COLOR` is set.

use calmirror_core::AnonymizedPayload;
use calmirror_core::diff::{DiffKind, MirrorDiff};
use calmirror_core::reconcile::{ReconcileFailure, ReconcileReport};
use owo_colors::{OwoColorize, Stream};

pub fn green(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.green()).to_string()
}

pub fn red(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.red()).to_string()
}

pub fn dimmed(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string()
}

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for DiffKind {
    fn render(&self) -> String {
        colorize_diff(*self, self.symbol())
    }
}

fn colorize_diff(kind: DiffKind, text: &str) -> String {
    match kind {
        DiffKind::Create => green(text),
        DiffKind::Delete => red(text),
    }
}

fn render_payload(kind: DiffKind, payload: &AnonymizedPayload) -> String {
    format!(
        "{} {} {}",
        kind.render(),
        colorize_diff(kind, &payload.title),
        dimmed(&payload.start.to_string())
    )
}

impl Render for ReconcileFailure {
    fn render(&self) -> String {
        red(&format!(
            "✗ Failed to {} {} ({}): {}",
            self.kind.verb(),
            self.payload.title,
            self.payload.start,
            self.message
        ))
    }
}

/// Show counts instead of individual events above this many
const COMPACT_THRESHOLD: usize = 5;

fn render_payload_list(
    kind: DiffKind,
    payloads: &[AnonymizedPayload],
    verbose: bool,
    lines: &mut Vec<String>,
) {
    if payloads.is_empty() {
        return;
    }

    if verbose || payloads.len() <= COMPACT_THRESHOLD {
        for payload in payloads {
            lines.push(format!("   {}", render_payload(kind, payload)));
        }
    } else {
        let label = match kind {
            DiffKind::Create => format!("({} new {})", payloads.len(), pluralize(payloads.len())),
            DiffKind::Delete => {
                format!("({} deleted {})", payloads.len(), pluralize(payloads.len()))
            }
        };
        lines.push(format!("   {} {}", kind.render(), colorize_diff(kind, &label)));
    }
}

fn pluralize(count: usize) -> &'static str {
    if count == 1 { "event" } else { "events" }
}

/// Rendering of a planned diff and of what reconciling it did.
pub trait MirrorRender {
    fn render(&self, verbose: bool) -> String;
}

impl MirrorRender for MirrorDiff {
    fn render(&self, verbose: bool) -> String {
        if self.is_empty() {
            return dimmed("   Already in sync");
        }

        let mut lines = Vec::new();
        render_payload_list(DiffKind::Delete, &self.to_delete, verbose, &mut lines);
        render_payload_list(DiffKind::Create, &self.to_create, verbose, &mut lines);
        lines.join("\n")
    }
}

impl MirrorRender for ReconcileReport {
    fn render(&self, verbose: bool) -> String {
        let mut lines = Vec::new();
        render_payload_list(DiffKind::Delete, &self.deleted, verbose, &mut lines);
        render_payload_list(DiffKind::Create, &self.created, verbose, &mut lines);

        for failure in &self.failures {
            lines.push(format!("   {}", failure.render()));
        }

        if lines.is_empty() {
            return dimmed("   Already in sync");
        }

        lines.join("\n")
    }
}
