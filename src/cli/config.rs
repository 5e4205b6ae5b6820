use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::browser::error::CheckError;
use crate::browser::session::DriverConfig;
use crate::page::interaction::InteractionConfig;
use crate::page::registry::LocatorRegistry;
use crate::scenario::context::{CustomerData, RunSettings, SUCCESS_PHRASE};

pub const DEFAULT_CONFIG_FILE: &str = "checkout-acceptance.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "checkout-acceptance",
    version,
    about = "Browser acceptance checks for the checkout form"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: checkout-acceptance.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the smoke, submission and validation scenarios
    Run(RunArgs),

    /// Print the registered field locators
    Locators,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Checkout document: a local HTML file or a URL
    #[arg(long)]
    pub target: Option<String>,

    /// Output format: console, junit, json
    #[arg(long)]
    pub format: Option<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Upper bound for every wait, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Directory for failure screenshots
    #[arg(long)]
    pub screenshot_dir: Option<String>,

    /// Append a JSONL diagnostic trace to this file
    #[arg(long)]
    pub trace: Option<String>,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `checkout-acceptance.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_target")]
    pub target: String,

    #[serde(default)]
    pub driver: DriverConfig,

    #[serde(default)]
    pub wait: WaitConfig,

    #[serde(default)]
    pub click: ClickConfig,

    #[serde(default = "default_success_phrase")]
    pub success_phrase: String,

    #[serde(default)]
    pub customer: CustomerData,

    /// Addressing overrides keyed by field name
    #[serde(default)]
    pub locators: HashMap<String, String>,

    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: Option<String>,

    #[serde(default)]
    pub trace: Option<String>,

    #[serde(default)]
    pub run: RunConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            driver: DriverConfig::default(),
            wait: WaitConfig::default(),
            click: ClickConfig::default(),
            success_phrase: default_success_phrase(),
            customer: CustomerData::default(),
            locators: HashMap::new(),
            screenshot_dir: default_screenshot_dir(),
            trace: None,
            run: RunConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            poll_ms: default_poll_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickConfig {
    #[serde(default = "default_true")]
    pub scroll_before_click: bool,

    #[serde(default = "default_true")]
    pub force_click_fallback: bool,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            scroll_before_click: true,
            force_click_fallback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_console")]
    pub format: String,

    pub output: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            format: default_console(),
            output: None,
        }
    }
}

// Serde default helpers
fn default_target() -> String { "pages/checkout.html".to_string() }
fn default_success_phrase() -> String { SUCCESS_PHRASE.to_string() }
fn default_screenshot_dir() -> Option<String> { Some("screenshots".to_string()) }
fn default_timeout_ms() -> u64 { 10_000 }
fn default_poll_ms() -> u64 { 100 }
fn default_true() -> bool { true }
fn default_console() -> String { "console".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file.
///
/// A missing default file yields defaults; a missing explicit file or a
/// malformed one is an error.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, CheckError> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => Ok(serde_yaml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && path.is_none() => {
            Ok(AppConfig::default())
        }
        Err(e) => Err(CheckError::Configuration(format!(
            "cannot read config '{}': {}",
            config_path, e
        ))),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

impl AppConfig {
    /// CLI values win over file values.
    pub fn apply_run_args(&mut self, args: &RunArgs) {
        if let Some(ref target) = args.target {
            self.target = target.clone();
        }
        if let Some(ref format) = args.format {
            self.run.format = format.clone();
        }
        if args.output.is_some() {
            self.run.output = args.output.clone();
        }
        if let Some(ms) = args.timeout_ms {
            self.wait.timeout_ms = ms;
        }
        if args.headless {
            self.driver.headless = true;
        }
        if args.screenshot_dir.is_some() {
            self.screenshot_dir = args.screenshot_dir.clone();
        }
        if args.trace.is_some() {
            self.trace = args.trace.clone();
        }
    }

    pub fn interaction_config(&self) -> InteractionConfig {
        InteractionConfig {
            timeout: Duration::from_millis(self.wait.timeout_ms),
            poll_interval: Duration::from_millis(self.wait.poll_ms.max(1)),
            scroll_before_click: self.click.scroll_before_click,
            force_click_fallback: self.click.force_click_fallback,
        }
    }

    pub fn registry(&self) -> Result<LocatorRegistry, CheckError> {
        LocatorRegistry::checkout_form().with_overrides(&self.locators)
    }

    pub fn run_settings(&self) -> Result<RunSettings, CheckError> {
        let mut settings = RunSettings::new(resolve_target(&self.target)?);
        settings.success_phrase = self.success_phrase.clone();
        settings.customer = self.customer.clone();
        settings.screenshot_dir = self.screenshot_dir.as_ref().map(PathBuf::from);
        Ok(settings)
    }
}

/// Turn a target into a URL: anything with a scheme passes through, a local
/// path becomes an absolute `file://` URL.
pub fn resolve_target(target: &str) -> Result<String, CheckError> {
    if target.contains("://") {
        return Ok(target.to_string());
    }
    let absolute = Path::new(target).canonicalize().map_err(|e| {
        CheckError::Configuration(format!("target document '{}' not found: {}", target, e))
    })?;
    Ok(format!("file://{}", absolute.display()))
}
