use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::browser::driver::{Driver, ElementState};
use crate::browser::error::CheckError;
use crate::browser::locator::Locator;

/// Wait bound and click behaviour shared by every interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Maximum time any single wait may take
    pub timeout: Duration,

    /// Delay between two probes of the same condition
    pub poll_interval: Duration,

    /// Scroll the target to the viewport centre before a pointer click
    pub scroll_before_click: bool,

    /// Retry a failed native click with a script-dispatched one
    pub force_click_fallback: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
            scroll_before_click: true,
            force_click_fallback: true,
        }
    }
}

/// Which click path actually reached the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickPath {
    Native,
    Forced,
}

impl fmt::Display for ClickPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickPath::Native => f.write_str("native click"),
            ClickPath::Forced => f.write_str("forced click"),
        }
    }
}

/// An element resolved by a wait, with the state observed when it resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementHandle {
    pub locator: Locator,
    pub state: ElementState,
}

// ============================================================================
// Interactor: generic waits and actions over any locator
// ============================================================================

/// Element interaction layer. Every wait is a condition poll with one deadline.
pub struct Interactor<'d, D: Driver> {
    driver: &'d mut D,
    config: InteractionConfig,
}

impl<'d, D: Driver> Interactor<'d, D> {
    pub fn new(driver: &'d mut D, config: InteractionConfig) -> Self {
        Self { driver, config }
    }

    /// Direct access to the driver for one-off queries.
    pub fn driver(&mut self) -> &mut D {
        &mut *self.driver
    }

    /// Wait until an element matching the locator is present.
    pub fn locate(&mut self, locator: &Locator) -> Result<ElementHandle, CheckError> {
        self.wait_for_state(locator, "to be present", |s| s.present)
    }

    /// Wait until the element is present, visible and enabled.
    pub fn locate_clickable(&mut self, locator: &Locator) -> Result<ElementHandle, CheckError> {
        self.wait_for_state(locator, "to be clickable", |s| s.clickable())
    }

    /// Wait until the element is displayed.
    pub fn wait_displayed(&mut self, locator: &Locator) -> Result<ElementHandle, CheckError> {
        self.wait_for_state(locator, "to be displayed", |s| s.displayed())
    }

    /// Immediate probe; an absent element is not displayed.
    pub fn is_displayed(&mut self, locator: &Locator) -> Result<bool, CheckError> {
        Ok(self.driver.state(locator)?.displayed())
    }

    /// Resolve as clickable, optionally scroll, then click.
    pub fn click(&mut self, locator: &Locator) -> Result<ClickPath, CheckError> {
        self.locate_clickable(locator)?;
        if self.config.scroll_before_click {
            self.driver.scroll_into_view(locator)?;
        }
        self.click_with_fallback(locator)
    }

    /// Click an element that only has to be present, e.g. a styled checkbox
    /// whose real input is hidden.
    pub fn press(&mut self, locator: &Locator) -> Result<ClickPath, CheckError> {
        self.locate(locator)?;
        self.click_with_fallback(locator)
    }

    /// Resolve, clear, then type `text` verbatim.
    pub fn set_text(&mut self, locator: &Locator, text: &str) -> Result<(), CheckError> {
        self.locate(locator)?;
        self.driver.clear(locator)?;
        self.driver.type_text(locator, text)?;
        debug!(element = %locator, "typed {} chars", text.chars().count());
        Ok(())
    }

    /// Script-dispatched click on a present element, bypassing the native path.
    pub fn force_click(&mut self, locator: &Locator) -> Result<ClickPath, CheckError> {
        self.locate(locator)?;
        self.driver.force_click(locator)?;
        debug!(element = %locator, "force-clicked");
        Ok(ClickPath::Forced)
    }

    /// Wait for a native dialog and return its text without accepting it.
    pub fn wait_for_dialog(&mut self) -> Result<String, CheckError> {
        self.wait_until("confirmation dialog", |driver| driver.dialog_text())
    }

    fn click_with_fallback(&mut self, locator: &Locator) -> Result<ClickPath, CheckError> {
        match self.driver.click(locator) {
            Ok(()) => {
                debug!(element = %locator, "clicked");
                Ok(ClickPath::Native)
            }
            Err(e) if self.config.force_click_fallback => {
                warn!(element = %locator, error = %e, "native click failed, forcing");
                self.driver.force_click(locator)?;
                Ok(ClickPath::Forced)
            }
            Err(e) => Err(e),
        }
    }

    fn wait_for_state(
        &mut self,
        locator: &Locator,
        condition: &str,
        accept: impl Fn(&ElementState) -> bool,
    ) -> Result<ElementHandle, CheckError> {
        let what = format!("{} {}", locator, condition);
        let state = self.wait_until(&what, |driver| {
            let state = driver.state(locator)?;
            Ok(accept(&state).then_some(state))
        })?;
        Ok(ElementHandle {
            locator: locator.clone(),
            state,
        })
    }

    /// Poll `probe` until it yields a value or the deadline passes.
    fn wait_until<T>(
        &mut self,
        what: &str,
        mut probe: impl FnMut(&mut D) -> Result<Option<T>, CheckError>,
    ) -> Result<T, CheckError> {
        let started = Instant::now();
        let deadline = started + self.config.timeout;
        loop {
            if let Some(value) = probe(&mut *self.driver)? {
                return Ok(value);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(CheckError::Timeout {
                    what: what.to_string(),
                    waited_ms: now.duration_since(started).as_millis() as u64,
                });
            }
            thread::sleep(self.config.poll_interval.min(deadline - now));
        }
    }
}
