use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::browser::error::{CheckError, ErrorKind};

/// The three checks, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Smoke,
    Submission,
    Validation,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::Smoke,
        ScenarioKind::Submission,
        ScenarioKind::Validation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ScenarioKind::Smoke => "page smoke check",
            ScenarioKind::Submission => "successful order submission",
            ScenarioKind::Validation => "form validation",
        }
    }

    /// File-name friendly identifier.
    pub fn slug(self) -> &'static str {
        match self {
            ScenarioKind::Smoke => "smoke",
            ScenarioKind::Submission => "submission",
            ScenarioKind::Validation => "validation",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Verdict of a scenario body that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub passed: bool,
    pub message: String,
}

impl Outcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Result of one scenario run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub kind: ScenarioKind,

    /// Human-readable scenario name
    pub name: String,

    pub passed: bool,

    /// Diagnostic message, present for passes and failures alike
    pub message: String,

    /// Set when the scenario failed on an error rather than an assertion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,

    /// True when the scenario was not attempted
    #[serde(default)]
    pub skipped: bool,

    #[serde(default)]
    pub duration_ms: u128,

    /// Screenshot captured on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

impl ScenarioResult {
    fn new(kind: ScenarioKind, passed: bool, message: String) -> Self {
        Self {
            kind,
            name: kind.title().to_string(),
            passed,
            message,
            error_kind: None,
            skipped: false,
            duration_ms: 0,
            screenshot: None,
        }
    }

    pub fn from_outcome(kind: ScenarioKind, outcome: Outcome) -> Self {
        Self::new(kind, outcome.passed, outcome.message)
    }

    pub fn errored(kind: ScenarioKind, error: &CheckError) -> Self {
        let error_kind = error.kind();
        let mut result = Self::new(kind, false, format!("[{}] {}", error_kind.label(), error));
        result.error_kind = Some(error_kind);
        result
    }

    /// Failed without running, because a prerequisite failed.
    pub fn skipped(kind: ScenarioKind, reason: &str) -> Self {
        let mut result = Self::new(kind, false, format!("not run: {}", reason));
        result.skipped = true;
        result
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_screenshot(mut self, screenshot: Option<PathBuf>) -> Self {
        self.screenshot = screenshot;
        self
    }
}
