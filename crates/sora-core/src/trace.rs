//! Rationale trace attached to every evaluation result
//!
//! Records which table cells were read, which credits were granted, which
//! claims were excluded and why, so the dossier can explain each number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered list of rationale steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RationaleTrace {
    pub steps: Vec<TraceStep>,
}

impl RationaleTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: TraceStep) {
        self.steps.push(step);
    }

    pub fn lookup(&mut self, code: &str, message: impl Into<String>) {
        self.push(TraceStep::new(TraceKind::Lookup, code, message));
    }

    pub fn credit(&mut self, code: &str, message: impl Into<String>) {
        self.push(TraceStep::new(TraceKind::Credit, code, message));
    }

    pub fn excluded(&mut self, code: &str, message: impl Into<String>) {
        self.push(TraceStep::new(TraceKind::Excluded, code, message));
    }

    pub fn clamp(&mut self, code: &str, message: impl Into<String>) {
        self.push(TraceStep::new(TraceKind::Clamp, code, message));
    }

    pub fn note(&mut self, code: &str, message: impl Into<String>) {
        self.push(TraceStep::new(TraceKind::Note, code, message));
    }

    /// Steps of one kind
    pub fn of_kind(&self, kind: TraceKind) -> impl Iterator<Item = &TraceStep> {
        self.steps.iter().filter(move |s| s.kind == kind)
    }

    /// Whether a claim with this code was excluded
    pub fn was_excluded(&self, code: &str) -> bool {
        self.of_kind(TraceKind::Excluded).any(|s| s.code == code)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A single rationale step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub kind: TraceKind,
    /// Table or mitigation identifier the step refers to
    pub code: String,
    pub message: String,
}

impl TraceStep {
    pub fn new(kind: TraceKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Lookup,
    Credit,
    Excluded,
    Clamp,
    Note,
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self.kind {
            TraceKind::Lookup => "LOOKUP",
            TraceKind::Credit => "CREDIT",
            TraceKind::Excluded => "EXCLUDED",
            TraceKind::Clamp => "CLAMP",
            TraceKind::Note => "NOTE",
        };
        write!(f, "{} [{}] {}", tag, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_records_in_order() {
        let mut trace = RationaleTrace::new();
        trace.lookup("iGRC", "column 1m, VLOS sparsely populated -> 2");
        trace.excluded("M1", "controlled ground area");
        trace.clamp("floor", "clamped to 1");

        assert_eq!(trace.steps.len(), 3);
        assert_eq!(trace.steps[0].kind, TraceKind::Lookup);
        assert!(trace.was_excluded("M1"));
        assert!(!trace.was_excluded("M2"));
    }

    #[test]
    fn test_step_display() {
        let step = TraceStep::new(TraceKind::Credit, "M1", "-1 (low)");
        assert_eq!(step.to_string(), "CREDIT [M1] -1 (low)");
    }
}
