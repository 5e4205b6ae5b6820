use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while driving the checkout page.
#[derive(Debug, Error)]
pub enum CheckError {
    /// An element, state, or dialog never appeared within the wait bound
    #[error("timed out after {waited_ms}ms waiting for {what}")]
    Timeout { what: String, waited_ms: u64 },

    /// Unregistered field, missing target document, or bad config
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The driver server rejected a command
    #[error("driver command '{command}' failed: {message}")]
    Driver { command: String, message: String },

    /// Driver server process failed to spawn
    #[error("failed to spawn browser driver '{program}' (is it installed?): {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Broken pipe or early exit of the driver server
    #[error("driver session I/O: {0}")]
    SessionIo(String),

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Coarse failure class reported alongside a failed scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    Configuration,
    Driver,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Driver => "driver",
        }
    }
}

impl CheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::Timeout { .. } => ErrorKind::Timeout,
            CheckError::Configuration(_) | CheckError::Yaml(_) => ErrorKind::Configuration,
            _ => ErrorKind::Driver,
        }
    }

    pub fn driver(command: &str, message: impl Into<String>) -> Self {
        CheckError::Driver {
            command: command.to_string(),
            message: message.into(),
        }
    }
}
