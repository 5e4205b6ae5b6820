use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use checkout_acceptance::browser::driver::{Driver, ElementState, SessionFactory};
use checkout_acceptance::browser::error::CheckError;
use checkout_acceptance::browser::locator::Locator;

/// One scripted element, keyed by CSS selector.
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub visible: bool,
    pub enabled: bool,
    pub selected: bool,
    pub checkbox: bool,
    pub value: String,
    pub text: String,
    /// Number of state polls before the element shows up
    pub appears_after: u32,
    /// Native clicks fail, as if something overlays the element
    pub obscured: bool,
    /// Native clicks succeed but trigger nothing; forced clicks still work
    pub inert: bool,
}

impl FakeElement {
    pub fn input() -> Self {
        Self {
            visible: true,
            enabled: true,
            selected: false,
            checkbox: false,
            value: String::new(),
            text: String::new(),
            appears_after: 0,
            obscured: false,
            inert: false,
        }
    }

    pub fn checkbox() -> Self {
        Self {
            checkbox: true,
            ..Self::input()
        }
    }

    pub fn hidden_error(text: &str) -> Self {
        Self {
            visible: false,
            text: text.to_string(),
            ..Self::input()
        }
    }
}

/// What a session observed, shared across every session of a factory.
#[derive(Debug, Default)]
pub struct Stats {
    pub created: usize,
    pub quits: usize,
    pub navigations: Vec<String>,
    pub native_clicks: Vec<String>,
    pub forced_clicks: Vec<String>,
    pub scrolls: usize,
    pub typed: Vec<(String, String)>,
    pub dialogs_accepted: usize,
    pub screenshots: Vec<PathBuf>,
}

/// In-memory checkout page implementing `Driver`.
///
/// Clicking `#checkout-btn` runs the page's own validation: empty inputs and
/// an unchecked agreement raise their error indicators, a clean form raises
/// the confirmation dialog.
#[derive(Debug, Clone)]
pub struct FakePage {
    pub elements: HashMap<String, FakeElement>,
    pub class_counts: HashMap<String, usize>,
    pub title: String,
    /// Dialog text raised by a clean submission; `None` means no dialog ever
    pub success_dialog: Option<String>,
    /// Indicators flagged on every submission regardless of input
    pub always_flagged: Vec<String>,
    /// Commands that fail with a driver error
    pub failing: Vec<&'static str>,
    pub dialog: Option<String>,
    /// Dialog polls answered with "no dialog" before an open dialog shows
    pub dialog_delay: u32,
    pub stats: Rc<RefCell<Stats>>,
    polls: HashMap<String, u32>,
    dialog_polls: u32,
}

impl FakePage {
    /// A well-formed checkout document with an empty cart.
    pub fn checkout() -> Self {
        let mut elements = HashMap::new();
        for id in ["full-name", "phone", "address"] {
            elements.insert(format!("#{}", id), FakeElement::input());
        }
        elements.insert("#agreement-checkbox".into(), FakeElement::checkbox());
        elements.insert("#checkout-btn".into(), FakeElement::input());
        for id in ["full-name-error", "phone-error", "address-error", "agreement-error"] {
            elements.insert(format!("#{}", id), FakeElement::hidden_error("required"));
        }

        let mut class_counts = HashMap::new();
        class_counts.insert(".empty-cart".to_string(), 1);

        Self {
            elements,
            class_counts,
            title: "Checkout".into(),
            success_dialog: Some("Order placed! Thank you.".into()),
            always_flagged: Vec::new(),
            failing: Vec::new(),
            dialog: None,
            dialog_delay: 0,
            stats: Rc::new(RefCell::new(Stats::default())),
            polls: HashMap::new(),
            dialog_polls: 0,
        }
    }

    pub fn without(mut self, css: &str) -> Self {
        self.elements.remove(css);
        self
    }

    pub fn with_element(mut self, css: &str, element: FakeElement) -> Self {
        self.elements.insert(css.to_string(), element);
        self
    }

    pub fn with_cart(mut self, items: usize, empty_marker: bool) -> Self {
        self.class_counts.insert(".cart-item".into(), items);
        self.class_counts
            .insert(".empty-cart".into(), if empty_marker { 1 } else { 0 });
        self
    }

    pub fn with_success_dialog(mut self, text: Option<&str>) -> Self {
        self.success_dialog = text.map(str::to_string);
        self
    }

    pub fn with_dialog_delay(mut self, polls: u32) -> Self {
        self.dialog_delay = polls;
        self
    }

    pub fn always_flagging(mut self, css: &str) -> Self {
        self.always_flagged.push(css.to_string());
        self
    }

    pub fn failing_on(mut self, command: &'static str) -> Self {
        self.failing.push(command);
        self
    }

    pub fn element(&self, css: &str) -> &FakeElement {
        &self.elements[css]
    }

    fn check(&self, command: &'static str) -> Result<(), CheckError> {
        if self.failing.contains(&command) {
            return Err(CheckError::driver(command, "scripted failure"));
        }
        Ok(())
    }

    fn element_mut(&mut self, locator: &Locator) -> Result<&mut FakeElement, CheckError> {
        let css = locator.css();
        self.elements
            .get_mut(&css)
            .ok_or_else(|| CheckError::driver("element", format!("no element {}", css)))
    }

    fn value_of(&self, css: &str) -> String {
        self.elements
            .get(css)
            .map(|e| e.value.trim().to_string())
            .unwrap_or_default()
    }

    fn activate(&mut self, css: &str) {
        if css == "#checkout-btn" {
            self.submit();
        } else if let Some(element) = self.elements.get_mut(css) {
            if element.checkbox {
                element.selected = !element.selected;
            }
        }
    }

    fn submit(&mut self) {
        let checks = [
            ("#full-name-error", !self.value_of("#full-name").is_empty()),
            ("#phone-error", !self.value_of("#phone").is_empty()),
            ("#address-error", !self.value_of("#address").is_empty()),
            (
                "#agreement-error",
                self.elements
                    .get("#agreement-checkbox")
                    .is_some_and(|e| e.selected),
            ),
        ];

        let mut clean = true;
        for (indicator, ok) in checks {
            let flagged = !ok || self.always_flagged.iter().any(|f| f == indicator);
            clean &= !flagged;
            if let Some(element) = self.elements.get_mut(indicator) {
                element.visible = flagged;
            }
        }

        if clean {
            self.dialog = self.success_dialog.clone();
            self.dialog_polls = 0;
        }
    }
}

impl Driver for FakePage {
    fn navigate(&mut self, url: &str) -> Result<(), CheckError> {
        self.check("navigate")?;
        self.stats.borrow_mut().navigations.push(url.to_string());
        Ok(())
    }

    fn title(&mut self) -> Result<String, CheckError> {
        self.check("title")?;
        Ok(self.title.clone())
    }

    fn count(&mut self, locator: &Locator) -> Result<usize, CheckError> {
        self.check("count")?;
        let css = locator.css();
        if let Some(n) = self.class_counts.get(&css) {
            return Ok(*n);
        }
        Ok(usize::from(self.elements.contains_key(&css)))
    }

    fn state(&mut self, locator: &Locator) -> Result<ElementState, CheckError> {
        self.check("state")?;
        let css = locator.css();
        let polls = self.polls.entry(css.clone()).or_insert(0);
        *polls += 1;
        let polls = *polls;

        Ok(match self.elements.get(&css) {
            Some(e) if polls > e.appears_after => ElementState {
                present: true,
                visible: e.visible,
                enabled: e.enabled,
                selected: e.selected,
            },
            _ => ElementState::absent(),
        })
    }

    fn value(&mut self, locator: &Locator) -> Result<String, CheckError> {
        self.check("value")?;
        Ok(self.element_mut(locator)?.value.clone())
    }

    fn text(&mut self, locator: &Locator) -> Result<String, CheckError> {
        self.check("text")?;
        Ok(self.element_mut(locator)?.text.clone())
    }

    fn clear(&mut self, locator: &Locator) -> Result<(), CheckError> {
        self.check("clear")?;
        self.element_mut(locator)?.value.clear();
        Ok(())
    }

    fn type_text(&mut self, locator: &Locator, text: &str) -> Result<(), CheckError> {
        self.check("type")?;
        self.element_mut(locator)?.value.push_str(text);
        self.stats
            .borrow_mut()
            .typed
            .push((locator.css(), text.to_string()));
        Ok(())
    }

    fn click(&mut self, locator: &Locator) -> Result<(), CheckError> {
        self.check("click")?;
        let element = self.element_mut(locator)?;
        if element.obscured {
            return Err(CheckError::driver("click", "element is obscured"));
        }
        let inert = element.inert;
        let css = locator.css();
        self.stats.borrow_mut().native_clicks.push(css.clone());
        if !inert {
            self.activate(&css);
        }
        Ok(())
    }

    fn force_click(&mut self, locator: &Locator) -> Result<(), CheckError> {
        self.check("force_click")?;
        self.element_mut(locator)?;
        let css = locator.css();
        self.stats.borrow_mut().forced_clicks.push(css.clone());
        self.activate(&css);
        Ok(())
    }

    fn scroll_into_view(&mut self, locator: &Locator) -> Result<(), CheckError> {
        self.check("scroll_into_view")?;
        self.element_mut(locator)?;
        self.stats.borrow_mut().scrolls += 1;
        Ok(())
    }

    fn dialog_text(&mut self) -> Result<Option<String>, CheckError> {
        self.check("dialog")?;
        if self.dialog.is_some() && self.dialog_polls < self.dialog_delay {
            self.dialog_polls += 1;
            return Ok(None);
        }
        Ok(self.dialog.clone())
    }

    fn accept_dialog(&mut self) -> Result<(), CheckError> {
        self.check("accept_dialog")?;
        if self.dialog.take().is_none() {
            return Err(CheckError::driver("accept_dialog", "no dialog is open"));
        }
        self.stats.borrow_mut().dialogs_accepted += 1;
        Ok(())
    }

    fn screenshot(&mut self, path: &Path) -> Result<(), CheckError> {
        self.check("screenshot")?;
        self.stats.borrow_mut().screenshots.push(path.to_path_buf());
        Ok(())
    }

    fn quit(&mut self) -> Result<(), CheckError> {
        self.stats.borrow_mut().quits += 1;
        Ok(())
    }
}

/// Hands out copies of a template page, all sharing one `Stats`.
pub struct FakeFactory {
    pub template: FakePage,
    pub fail_create: bool,
}

impl FakeFactory {
    pub fn new(template: FakePage) -> Self {
        Self {
            template,
            fail_create: false,
        }
    }

    pub fn stats(&self) -> Rc<RefCell<Stats>> {
        Rc::clone(&self.template.stats)
    }
}

impl SessionFactory for FakeFactory {
    type Session = FakePage;

    fn create(&mut self) -> Result<FakePage, CheckError> {
        if self.fail_create {
            return Err(CheckError::SessionIo("driver server did not start".into()));
        }
        self.template.stats.borrow_mut().created += 1;
        Ok(self.template.clone())
    }
}
