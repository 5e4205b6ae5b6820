use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::browser::error::CheckError;
use crate::browser::locator::Locator;

/// Observable state of a single element at the moment it was probed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    pub present: bool,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub selected: bool,
}

impl ElementState {
    pub fn absent() -> Self {
        Self::default()
    }

    /// Visible and enabled.
    pub fn clickable(&self) -> bool {
        self.present && self.visible && self.enabled
    }

    pub fn displayed(&self) -> bool {
        self.present && self.visible
    }
}

// ============================================================================
// Driver trait: the browser capability every layer above is built on
// ============================================================================

/// Browser-automation capability injected into the page object.
///
/// Implementations answer immediately; waiting is the interaction layer's job.
/// Probing an element that does not exist returns `ElementState::absent()`
/// rather than an error.
pub trait Driver {
    fn navigate(&mut self, url: &str) -> Result<(), CheckError>;

    fn title(&mut self) -> Result<String, CheckError>;

    /// Number of elements matching the locator.
    fn count(&mut self, locator: &Locator) -> Result<usize, CheckError>;

    fn state(&mut self, locator: &Locator) -> Result<ElementState, CheckError>;

    /// Current `value` property of an input.
    fn value(&mut self, locator: &Locator) -> Result<String, CheckError>;

    fn text(&mut self, locator: &Locator) -> Result<String, CheckError>;

    fn clear(&mut self, locator: &Locator) -> Result<(), CheckError>;

    fn type_text(&mut self, locator: &Locator, text: &str) -> Result<(), CheckError>;

    /// Native pointer click.
    fn click(&mut self, locator: &Locator) -> Result<(), CheckError>;

    /// Script-dispatched click that ignores overlays and visibility.
    fn force_click(&mut self, locator: &Locator) -> Result<(), CheckError>;

    fn scroll_into_view(&mut self, locator: &Locator) -> Result<(), CheckError>;

    /// Text of the open native dialog, if any.
    fn dialog_text(&mut self) -> Result<Option<String>, CheckError>;

    fn accept_dialog(&mut self) -> Result<(), CheckError>;

    fn screenshot(&mut self, path: &Path) -> Result<(), CheckError>;

    fn quit(&mut self) -> Result<(), CheckError>;
}

/// Creates one fresh, exclusively owned session per scenario.
pub trait SessionFactory {
    type Session: Driver;

    fn create(&mut self) -> Result<Self::Session, CheckError>;
}
