use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::browser::error::CheckError;
use crate::browser::session::BrowserLauncher;
use crate::cli::config::AppConfig;
use crate::report::console::format_console_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::SuiteReport;
use crate::scenario::runner::ScenarioRunner;
use crate::trace::logger::TraceLogger;

pub const SUITE_NAME: &str = "Checkout acceptance";

// ============================================================================
// run subcommand
// ============================================================================

/// Run all scenarios and return whether every one passed.
pub fn cmd_run(config: &AppConfig) -> Result<bool, Box<dyn std::error::Error>> {
    // Reject a bad format before any browser starts
    let format = ReportFormat::parse(&config.run.format)?;
    let registry = config.registry()?;
    let settings = config.run_settings()?;
    let tracer = match config.trace {
        Some(ref path) => TraceLogger::new(Path::new(path)),
        None => TraceLogger::disabled(),
    };

    info!(target_url = %settings.target_url, "running checkout scenarios");

    let launcher = BrowserLauncher::new(config.driver.clone());
    let mut runner = ScenarioRunner::new(launcher, settings)
        .with_registry(registry)
        .with_interaction(config.interaction_config())
        .with_tracer(tracer);

    let start = Instant::now();
    let results = runner.run_all();
    let report =
        SuiteReport::from_results(SUITE_NAME, results).with_duration(start.elapsed().as_millis());

    let output_content = format.render(&report)?;
    match config.run.output {
        Some(ref path) => std::fs::write(path, &output_content)?,
        None => print!("{}", output_content),
    }

    Ok(report.all_passed())
}

/// Output format of the suite report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Console,
    Junit,
    Json,
}

impl ReportFormat {
    pub fn parse(format: &str) -> Result<Self, CheckError> {
        match format {
            "console" => Ok(ReportFormat::Console),
            "junit" => Ok(ReportFormat::Junit),
            "json" => Ok(ReportFormat::Json),
            other => Err(CheckError::Configuration(format!(
                "unknown report format '{}' (expected console, junit or json)",
                other
            ))),
        }
    }

    pub fn render(self, report: &SuiteReport) -> Result<String, CheckError> {
        match self {
            ReportFormat::Console => Ok(format_console_report(report)),
            ReportFormat::Junit => Ok(generate_junit_xml(report)),
            ReportFormat::Json => report.to_json().map_err(|e| CheckError::Json {
                context: "suite report".into(),
                source: e,
            }),
        }
    }
}

/// Render a report in one of the supported formats.
pub fn render_report(report: &SuiteReport, format: &str) -> Result<String, CheckError> {
    ReportFormat::parse(format)?.render(report)
}

// ============================================================================
// locators subcommand
// ============================================================================

/// Format the effective locator table, overrides applied.
pub fn cmd_locators(config: &AppConfig) -> Result<String, CheckError> {
    let registry = config.registry()?;
    let mut out = String::new();
    for locator in registry.iter() {
        out.push_str(&format!(
            "{:<20} {:<22} {}\n",
            locator.field.name(),
            locator.field.describe(),
            locator.css()
        ));
    }
    Ok(out)
}
