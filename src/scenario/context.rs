use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::page::interaction::InteractionConfig;
use crate::page::registry::LocatorRegistry;
use crate::scenario::model::ScenarioKind;
use crate::trace::logger::TraceLogger;

/// Text the confirmation dialog must contain for a submission to count.
pub const SUCCESS_PHRASE: &str = "Order placed";

/// Synthetic, valid customer details typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerData {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl Default for CustomerData {
    fn default() -> Self {
        Self {
            name: "Ivan Ivanov".to_string(),
            phone: "89041234567".to_string(),
            address: "Moscow, Primernaya st. 1, apt. 1".to_string(),
        }
    }
}

/// Inputs shared by every scenario of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// URL of the checkout document, usually `file://...`
    pub target_url: String,

    pub success_phrase: String,

    pub customer: CustomerData,

    /// Where failure screenshots go; `None` disables them
    pub screenshot_dir: Option<PathBuf>,
}

impl RunSettings {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            success_phrase: SUCCESS_PHRASE.to_string(),
            customer: CustomerData::default(),
            screenshot_dir: None,
        }
    }

    pub fn screenshot_path(&self, kind: ScenarioKind) -> Option<PathBuf> {
        self.screenshot_dir
            .as_deref()
            .map(|dir| dir.join(format!("{}-error.png", kind.slug())))
    }
}

/// Everything a scenario body reads; borrowed from the runner.
pub struct ScenarioContext<'a> {
    pub settings: &'a RunSettings,
    pub registry: &'a LocatorRegistry,
    pub interaction: &'a InteractionConfig,
    pub tracer: &'a TraceLogger,
}

impl ScenarioContext<'_> {
    pub fn target_url(&self) -> &str {
        &self.settings.target_url
    }
}
