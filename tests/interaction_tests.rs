mod common;

use std::time::{Duration, Instant};

use checkout_acceptance::browser::error::{CheckError, ErrorKind};
use checkout_acceptance::browser::locator::Field;
use checkout_acceptance::page::interaction::{ClickPath, InteractionConfig, Interactor};
use checkout_acceptance::page::registry::LocatorRegistry;

use crate::common::fake_page::{FakeElement, FakePage};
use crate::common::utils::fast_interaction;

fn registry() -> LocatorRegistry {
    LocatorRegistry::checkout_form()
}

// ============================================================================
// Waits
// ============================================================================

#[test]
fn locate_resolves_present_element() {
    let registry = registry();
    let mut page = FakePage::checkout();
    let mut ui = Interactor::new(&mut page, fast_interaction());

    let handle = ui.locate(registry.locator(Field::Phone).unwrap()).unwrap();
    assert!(handle.state.present);
    assert_eq!(handle.locator.field, Field::Phone);
}

#[test]
fn locate_polls_until_element_appears() {
    let registry = registry();
    let late = FakeElement {
        appears_after: 3,
        ..FakeElement::input()
    };
    let mut page = FakePage::checkout().with_element("#phone", late);
    let mut ui = Interactor::new(&mut page, fast_interaction());

    let handle = ui.locate(registry.locator(Field::Phone).unwrap()).unwrap();
    assert!(handle.state.present);
}

#[test]
fn locate_times_out_within_bound() {
    let registry = registry();
    let mut page = FakePage::checkout().without("#phone");
    let config = fast_interaction();
    let bound = config.timeout;
    let mut ui = Interactor::new(&mut page, config);

    let started = Instant::now();
    let err = ui.locate(registry.locator(Field::Phone).unwrap()).unwrap_err();
    let elapsed = started.elapsed();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    match err {
        CheckError::Timeout { what, waited_ms } => {
            assert!(what.contains("#phone"), "what: {}", what);
            assert!(waited_ms >= bound.as_millis() as u64);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    // One deadline for the whole wait, plus scheduling slack
    assert!(elapsed < bound + Duration::from_millis(200));
}

#[test]
fn wait_displayed_rejects_hidden_element() {
    let registry = registry();
    let mut page = FakePage::checkout();
    let mut ui = Interactor::new(&mut page, fast_interaction());

    let err = ui
        .wait_displayed(registry.locator(Field::FullNameError).unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[test]
fn is_displayed_treats_absent_as_hidden() {
    let registry = registry();
    let mut page = FakePage::checkout().without("#address-error");
    let mut ui = Interactor::new(&mut page, fast_interaction());

    assert!(!ui.is_displayed(registry.locator(Field::AddressError).unwrap()).unwrap());
    assert!(ui.is_displayed(registry.locator(Field::Address).unwrap()).unwrap());
}

#[test]
fn driver_error_during_wait_propagates_immediately() {
    let registry = registry();
    let mut page = FakePage::checkout().failing_on("state");
    let mut ui = Interactor::new(&mut page, InteractionConfig::default());

    let started = Instant::now();
    let err = ui.locate(registry.locator(Field::Phone).unwrap()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Driver);
    assert!(started.elapsed() < Duration::from_secs(1));
}

// ============================================================================
// Clicks
// ============================================================================

#[test]
fn click_scrolls_then_clicks_natively() {
    let registry = registry();
    let mut page = FakePage::checkout();
    let stats = page.stats.clone();
    let mut ui = Interactor::new(&mut page, fast_interaction());

    let path = ui.click(registry.locator(Field::Checkout).unwrap()).unwrap();

    assert_eq!(path, ClickPath::Native);
    let stats = stats.borrow();
    assert_eq!(stats.scrolls, 1);
    assert_eq!(stats.native_clicks, vec!["#checkout-btn".to_string()]);
    assert!(stats.forced_clicks.is_empty());
}

#[test]
fn click_without_scroll_when_disabled() {
    let registry = registry();
    let mut page = FakePage::checkout();
    let stats = page.stats.clone();
    let config = InteractionConfig {
        scroll_before_click: false,
        ..fast_interaction()
    };
    let mut ui = Interactor::new(&mut page, config);

    ui.click(registry.locator(Field::Checkout).unwrap()).unwrap();
    assert_eq!(stats.borrow().scrolls, 0);
}

#[test]
fn obscured_click_falls_back_to_forced() {
    let registry = registry();
    let covered = FakeElement {
        obscured: true,
        ..FakeElement::input()
    };
    let mut page = FakePage::checkout().with_element("#checkout-btn", covered);
    let stats = page.stats.clone();
    let mut ui = Interactor::new(&mut page, fast_interaction());

    let path = ui.click(registry.locator(Field::Checkout).unwrap()).unwrap();

    assert_eq!(path, ClickPath::Forced);
    assert_eq!(stats.borrow().forced_clicks, vec!["#checkout-btn".to_string()]);
}

#[test]
fn obscured_click_fails_without_fallback() {
    let registry = registry();
    let covered = FakeElement {
        obscured: true,
        ..FakeElement::input()
    };
    let mut page = FakePage::checkout().with_element("#checkout-btn", covered);
    let stats = page.stats.clone();
    let config = InteractionConfig {
        force_click_fallback: false,
        ..fast_interaction()
    };
    let mut ui = Interactor::new(&mut page, config);

    let err = ui.click(registry.locator(Field::Checkout).unwrap()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Driver);
    assert!(stats.borrow().forced_clicks.is_empty());
}

#[test]
fn click_waits_for_enabled_button() {
    let registry = registry();
    let disabled = FakeElement {
        enabled: false,
        ..FakeElement::input()
    };
    let mut page = FakePage::checkout().with_element("#checkout-btn", disabled);
    let stats = page.stats.clone();
    let mut ui = Interactor::new(&mut page, fast_interaction());

    let err = ui.click(registry.locator(Field::Checkout).unwrap()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(stats.borrow().native_clicks.is_empty());
}

#[test]
fn press_reaches_hidden_checkbox() {
    let registry = registry();
    let styled = FakeElement {
        visible: false,
        ..FakeElement::checkbox()
    };
    let mut page = FakePage::checkout().with_element("#agreement-checkbox", styled);
    let mut ui = Interactor::new(&mut page, fast_interaction());

    let path = ui.press(registry.locator(Field::Agreement).unwrap()).unwrap();
    assert_eq!(path, ClickPath::Native);
    drop(ui);
    assert!(page.element("#agreement-checkbox").selected);
}

// ============================================================================
// Text entry
// ============================================================================

#[test]
fn set_text_replaces_previous_value() {
    let registry = registry();
    let prefilled = FakeElement {
        value: "stale".into(),
        ..FakeElement::input()
    };
    let mut page = FakePage::checkout().with_element("#full-name", prefilled);
    let mut ui = Interactor::new(&mut page, fast_interaction());

    ui.set_text(registry.locator(Field::FullName).unwrap(), "Ivan Ivanov")
        .unwrap();
    drop(ui);

    assert_eq!(page.element("#full-name").value, "Ivan Ivanov");
}

#[test]
fn set_text_types_verbatim() {
    let registry = registry();
    let mut page = FakePage::checkout();
    let stats = page.stats.clone();
    let mut ui = Interactor::new(&mut page, fast_interaction());

    ui.set_text(registry.locator(Field::Address).unwrap(), "  Moscow, apt. 1 ")
        .unwrap();

    assert_eq!(
        stats.borrow().typed,
        vec![("#address".to_string(), "  Moscow, apt. 1 ".to_string())]
    );
}

#[test]
fn set_text_on_missing_element_times_out() {
    let registry = registry();
    let mut page = FakePage::checkout().without("#address");
    let stats = page.stats.clone();
    let mut ui = Interactor::new(&mut page, fast_interaction());

    let err = ui
        .set_text(registry.locator(Field::Address).unwrap(), "x")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(stats.borrow().typed.is_empty());
}

// ============================================================================
// Dialogs
// ============================================================================

#[test]
fn wait_for_dialog_returns_text_without_accepting() {
    let mut page = FakePage::checkout();
    page.dialog = Some("Order placed!".into());
    let stats = page.stats.clone();
    let mut ui = Interactor::new(&mut page, fast_interaction());

    assert_eq!(ui.wait_for_dialog().unwrap(), "Order placed!");
    assert_eq!(stats.borrow().dialogs_accepted, 0);
}

#[test]
fn wait_for_dialog_times_out() {
    let mut page = FakePage::checkout();
    let mut ui = Interactor::new(&mut page, fast_interaction());

    let err = ui.wait_for_dialog().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.to_string().contains("confirmation dialog"));
}

#[test]
fn wait_for_dialog_picks_up_late_dialog() {
    let mut page = FakePage::checkout().with_dialog_delay(3);
    page.dialog = Some("Order placed!".into());
    let config = fast_interaction();
    let mut ui = Interactor::new(&mut page, config.clone());

    let start = Instant::now();
    assert_eq!(ui.wait_for_dialog().unwrap(), "Order placed!");
    assert!(start.elapsed() < config.timeout);
}

#[test]
fn force_click_skips_native_path() {
    let mut page = FakePage::checkout();
    let stats = page.stats.clone();
    let mut ui = Interactor::new(&mut page, fast_interaction());

    let path = ui.force_click(registry().locator(Field::Agreement).unwrap()).unwrap();

    assert_eq!(path, ClickPath::Forced);
    assert!(stats.borrow().native_clicks.is_empty());
    assert_eq!(stats.borrow().forced_clicks, vec!["#agreement-checkbox".to_string()]);
}
