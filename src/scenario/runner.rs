use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::browser::driver::{Driver, SessionFactory};
use crate::page::interaction::InteractionConfig;
use crate::page::registry::LocatorRegistry;
use crate::scenario::context::{RunSettings, ScenarioContext};
use crate::scenario::model::{ScenarioKind, ScenarioResult};
use crate::scenario::scope::with_session;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// Runs the scenarios one after another, each on its own session.
pub struct ScenarioRunner<F: SessionFactory> {
    factory: F,
    settings: RunSettings,
    registry: LocatorRegistry,
    interaction: InteractionConfig,
    tracer: TraceLogger,
}

impl<F: SessionFactory> ScenarioRunner<F> {
    pub fn new(factory: F, settings: RunSettings) -> Self {
        Self {
            factory,
            settings,
            registry: LocatorRegistry::checkout_form(),
            interaction: InteractionConfig::default(),
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_registry(mut self, registry: LocatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionConfig) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Run smoke, then submission and validation.
    ///
    /// When smoke fails the other two are reported failed without a session
    /// ever being created for them.
    pub fn run_all(&mut self) -> Vec<ScenarioResult> {
        let smoke = self.run(ScenarioKind::Smoke);
        let smoke_passed = smoke.passed;
        let mut results = vec![smoke];

        for kind in [ScenarioKind::Submission, ScenarioKind::Validation] {
            let result = if smoke_passed {
                self.run(kind)
            } else {
                warn!(scenario = %kind, "skipped: smoke check failed");
                let skipped = ScenarioResult::skipped(kind, "smoke check failed");
                self.tracer.log(&TraceEvent::finished(&skipped));
                skipped
            };
            results.push(result);
        }

        results
    }

    /// Run one scenario with guaranteed session teardown.
    pub fn run(&mut self, kind: ScenarioKind) -> ScenarioResult {
        info!(scenario = %kind, "starting");
        self.tracer.log(&TraceEvent::now(kind, "started"));
        let started = Instant::now();

        let ctx = ScenarioContext {
            settings: &self.settings,
            registry: &self.registry,
            interaction: &self.interaction,
            tracer: &self.tracer,
        };
        let screenshot_path = self.settings.screenshot_path(kind);

        let run = with_session(&mut self.factory, |driver| {
            let outcome = kind.execute(driver, &ctx);
            let failed = !matches!(outcome, Ok(ref o) if o.passed);
            let shot = match (&screenshot_path, failed) {
                (Some(path), true) => capture(driver, path),
                _ => None,
            };
            (outcome, shot)
        });

        let result = match run {
            Ok((Ok(outcome), shot)) => ScenarioResult::from_outcome(kind, outcome).with_screenshot(shot),
            Ok((Err(e), shot)) => ScenarioResult::errored(kind, &e).with_screenshot(shot),
            Err(e) => ScenarioResult::errored(kind, &e),
        }
        .with_duration(started.elapsed().as_millis());

        if result.passed {
            info!(scenario = %kind, message = %result.message, "passed");
        } else {
            warn!(scenario = %kind, message = %result.message, "failed");
        }
        self.tracer.log(&TraceEvent::finished(&result));
        result
    }
}

/// Best-effort failure screenshot.
fn capture<D: Driver>(driver: &mut D, path: &Path) -> Option<PathBuf> {
    if let Some(dir) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!(dir = %dir.display(), error = %e, "cannot create screenshot directory");
            return None;
        }
    }
    match driver.screenshot(path) {
        Ok(()) => {
            info!(path = %path.display(), "screenshot saved");
            Some(path.to_path_buf())
        }
        Err(e) => {
            warn!(error = %e, "screenshot failed");
            None
        }
    }
}
