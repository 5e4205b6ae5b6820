use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::browser::driver::{Driver, ElementState};
use crate::browser::error::CheckError;
use crate::browser::locator::{Field, Locator};
use crate::page::interaction::{ClickPath, ElementHandle, InteractionConfig, Interactor};
use crate::page::registry::LocatorRegistry;

/// Live values of the form, read on demand and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub agreement: bool,
}

impl FormSnapshot {
    /// Text value of an input field; `None` for non-text fields.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::FullName => Some(&self.name),
            Field::Phone => Some(&self.phone),
            Field::Address => Some(&self.address),
            _ => None,
        }
    }
}

/// What the cart section shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    pub items: usize,
    pub empty_marker: bool,
}

impl CartState {
    /// Exactly one of "has items" and "explicitly empty".
    pub fn is_consistent(&self) -> bool {
        (self.items > 0) != self.empty_marker
    }

    pub fn describe(&self) -> String {
        match (self.items, self.empty_marker) {
            (0, true) => "cart is empty".to_string(),
            (n, false) if n > 0 => format!("{} item(s) in cart", n),
            (n, marker) => format!(
                "cart state undetermined ({} item(s), empty marker {})",
                n,
                if marker { "shown" } else { "missing" }
            ),
        }
    }
}

/// Form and cart state captured for troubleshooting a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDiagnostics {
    pub snapshot: FormSnapshot,
    pub cart: CartState,
    pub checkout_enabled: bool,
    pub checkout_displayed: bool,
}

// ============================================================================
// CheckoutPage: domain actions over the interaction layer
// ============================================================================

/// Page object for the checkout form.
///
/// Observes the page's validation; never implements any.
pub struct CheckoutPage<'a, D: Driver> {
    ui: Interactor<'a, D>,
    registry: &'a LocatorRegistry,
}

impl<'a, D: Driver> CheckoutPage<'a, D> {
    pub fn new(driver: &'a mut D, registry: &'a LocatorRegistry, config: InteractionConfig) -> Self {
        Self {
            ui: Interactor::new(driver, config),
            registry,
        }
    }

    fn locator(&self, field: Field) -> Result<&'a Locator, CheckError> {
        self.registry.locator(field)
    }

    pub fn open(&mut self, url: &str) -> Result<(), CheckError> {
        debug!(url, "opening checkout page");
        self.ui.driver().navigate(url)
    }

    pub fn title(&mut self) -> Result<String, CheckError> {
        self.ui.driver().title()
    }

    pub fn fill_name(&mut self, name: &str) -> Result<(), CheckError> {
        let locator = self.locator(Field::FullName)?;
        self.ui.set_text(locator, name)
    }

    pub fn fill_phone(&mut self, phone: &str) -> Result<(), CheckError> {
        let locator = self.locator(Field::Phone)?;
        self.ui.set_text(locator, phone)
    }

    pub fn fill_address(&mut self, address: &str) -> Result<(), CheckError> {
        let locator = self.locator(Field::Address)?;
        self.ui.set_text(locator, address)
    }

    /// Select the agreement checkbox unless it already is. Never unchecks.
    ///
    /// Returns `Some(path)` when a click was needed, `None` when it was a no-op.
    pub fn accept_agreement(&mut self) -> Result<Option<ClickPath>, CheckError> {
        let locator = self.locator(Field::Agreement)?;
        let handle = self.ui.locate(locator)?;
        if handle.state.selected {
            debug!("agreement already accepted");
            return Ok(None);
        }
        self.ui.press(locator).map(Some)
    }

    pub fn submit(&mut self) -> Result<ClickPath, CheckError> {
        let locator = self.locator(Field::Checkout)?;
        self.ui.click(locator)
    }

    /// Submit through a script-dispatched click, for a button whose native
    /// click lands but starts nothing.
    pub fn force_submit(&mut self) -> Result<ClickPath, CheckError> {
        let locator = self.locator(Field::Checkout)?;
        self.ui.force_click(locator)
    }

    pub fn read_snapshot(&mut self) -> Result<FormSnapshot, CheckError> {
        let name = self.locator(Field::FullName)?;
        let phone = self.locator(Field::Phone)?;
        let address = self.locator(Field::Address)?;
        let agreement = self.locator(Field::Agreement)?;

        Ok(FormSnapshot {
            name: self.read_value(name)?,
            phone: self.read_value(phone)?,
            address: self.read_value(address)?,
            agreement: self.ui.locate(agreement)?.state.selected,
        })
    }

    fn read_value(&mut self, locator: &Locator) -> Result<String, CheckError> {
        self.ui.locate(locator)?;
        self.ui.driver().value(locator)
    }

    /// Wait for a required element to be present.
    pub fn locate(&mut self, field: Field) -> Result<ElementHandle, CheckError> {
        let locator = self.locator(field)?;
        self.ui.locate(locator)
    }

    /// Current state without waiting.
    pub fn probe(&mut self, field: Field) -> Result<ElementState, CheckError> {
        let locator = self.locator(field)?;
        self.ui.driver().state(locator)
    }

    pub fn cart_state(&mut self) -> Result<CartState, CheckError> {
        let items = self.locator(Field::CartItem)?;
        let empty = self.locator(Field::EmptyCart)?;
        Ok(CartState {
            items: self.ui.driver().count(items)?,
            empty_marker: self.ui.driver().count(empty)? > 0,
        })
    }

    pub fn diagnose(&mut self) -> Result<FormDiagnostics, CheckError> {
        let snapshot = self.read_snapshot()?;
        let cart = self.cart_state()?;
        let checkout = self.locator(Field::Checkout)?;
        let state = self.ui.driver().state(checkout)?;
        Ok(FormDiagnostics {
            snapshot,
            cart,
            checkout_enabled: state.enabled,
            checkout_displayed: state.displayed(),
        })
    }

    /// Whether a validation indicator is currently displayed.
    pub fn error_visible(&mut self, indicator: Field) -> Result<bool, CheckError> {
        let locator = self.locator(indicator)?;
        self.ui.is_displayed(locator)
    }

    /// Wait for an element to become displayed.
    pub fn wait_displayed(&mut self, field: Field) -> Result<ElementHandle, CheckError> {
        let locator = self.locator(field)?;
        self.ui.wait_displayed(locator)
    }

    /// Every validation indicator currently displayed, in field order.
    pub fn displayed_errors(&mut self) -> Result<Vec<Field>, CheckError> {
        let mut shown = Vec::new();
        for indicator in Field::ERROR_INDICATORS {
            if self.error_visible(indicator)? {
                let locator = self.locator(indicator)?;
                let text = self.ui.driver().text(locator)?;
                debug!(indicator = %indicator, text = %text, "validation error shown");
                shown.push(indicator);
            }
        }
        Ok(shown)
    }

    /// Wait for the confirmation dialog, accept it, and return its text.
    pub fn confirm_dialog(&mut self) -> Result<String, CheckError> {
        let text = self.ui.wait_for_dialog()?;
        self.ui.driver().accept_dialog()?;
        debug!(text = %text, "dialog accepted");
        Ok(text)
    }
}
