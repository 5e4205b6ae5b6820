use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::scenario::model::{ScenarioKind, ScenarioResult};

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub scenario: ScenarioKind,

    pub event: String,

    pub passed: Option<bool>,
    pub message: Option<String>,

    pub data: Option<Value>,
}

impl TraceEvent {
    pub fn now(scenario: ScenarioKind, event: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            scenario,
            event: event.to_string(),
            passed: None,
            message: None,
            data: None,
        }
    }

    pub fn finished(result: &ScenarioResult) -> Self {
        let mut event = Self::now(result.kind, "finished");
        event.passed = Some(result.passed);
        event.message = Some(result.message.clone());
        event
    }

    /// Attach a payload; one that fails to serialize is logged and left out.
    pub fn with_data(mut self, data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => self.data = Some(value),
            Err(e) => warn!(event = %self.event, error = %e, "failed to serialize trace data"),
        }
        self
    }
}
