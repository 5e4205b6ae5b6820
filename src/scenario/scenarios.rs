use tracing::{debug, info, warn};

use crate::browser::driver::Driver;
use crate::browser::error::CheckError;
use crate::browser::locator::Field;
use crate::page::checkout::CheckoutPage;
use crate::page::interaction::ClickPath;
use crate::scenario::context::ScenarioContext;
use crate::scenario::model::{Outcome, ScenarioKind};
use crate::trace::trace::TraceEvent;

impl ScenarioKind {
    /// Run this scenario's body on an already-acquired session.
    pub fn execute<D: Driver>(
        self,
        driver: &mut D,
        ctx: &ScenarioContext<'_>,
    ) -> Result<Outcome, CheckError> {
        match self {
            ScenarioKind::Smoke => smoke(driver, ctx),
            ScenarioKind::Submission => submission(driver, ctx),
            ScenarioKind::Validation => validation(driver, ctx),
        }
    }
}

fn open_page<'a, D: Driver>(driver: &'a mut D, ctx: &ScenarioContext<'a>) -> CheckoutPage<'a, D> {
    CheckoutPage::new(driver, ctx.registry, ctx.interaction.clone())
}

// ============================================================================
// Smoke: every required element displayed, cart state unambiguous
// ============================================================================

pub fn smoke<D: Driver>(driver: &mut D, ctx: &ScenarioContext<'_>) -> Result<Outcome, CheckError> {
    let mut page = open_page(driver, ctx);
    page.open(ctx.target_url())?;
    let title = page.title()?;
    info!(%title, "page loaded");

    let mut missing = Vec::new();
    let mut hidden = Vec::new();
    // Once one wait has run out the page is settled; probe the rest directly.
    let mut settled = false;

    for field in Field::REQUIRED {
        let state = if settled {
            page.probe(field)?
        } else {
            match page.locate(field) {
                Ok(handle) => handle.state,
                Err(CheckError::Timeout { .. }) => {
                    settled = true;
                    page.probe(field)?
                }
                Err(e) => return Err(e),
            }
        };

        if !state.present {
            debug!(field = %field, "required element missing");
            missing.push(field);
            continue;
        }
        if state.displayed() {
            continue;
        }
        if settled {
            hidden.push(field);
            continue;
        }
        match page.wait_displayed(field) {
            Ok(_) => {}
            Err(CheckError::Timeout { .. }) => {
                settled = true;
                hidden.push(field);
            }
            Err(e) => return Err(e),
        }
    }

    let cart = page.cart_state()?;
    info!(items = cart.items, empty_marker = cart.empty_marker, "cart inspected");

    let mut problems = Vec::new();
    if !missing.is_empty() {
        problems.push(format!("missing elements: {}", join_fields(&missing)));
    }
    if !hidden.is_empty() {
        problems.push(format!("elements not displayed: {}", join_fields(&hidden)));
    }
    if !cart.is_consistent() {
        problems.push(cart.describe());
    }

    if problems.is_empty() {
        Ok(Outcome::pass(format!(
            "all {} elements displayed; {}",
            Field::REQUIRED.len(),
            cart.describe()
        )))
    } else {
        Ok(Outcome::fail(problems.join("; ")))
    }
}

// ============================================================================
// Submission: valid data is accepted with a confirmation dialog
// ============================================================================

pub fn submission<D: Driver>(
    driver: &mut D,
    ctx: &ScenarioContext<'_>,
) -> Result<Outcome, CheckError> {
    let customer = &ctx.settings.customer;
    let mut page = open_page(driver, ctx);
    page.open(ctx.target_url())?;

    let before = page.diagnose()?;
    debug!(?before, "form before filling");
    ctx.tracer
        .log(&TraceEvent::now(ScenarioKind::Submission, "diagnostics_before").with_data(&before));

    page.fill_name(&customer.name)?;
    page.fill_phone(&customer.phone)?;
    page.fill_address(&customer.address)?;
    page.accept_agreement()?;

    let after = page.diagnose()?;
    debug!(?after, "form after filling");
    ctx.tracer
        .log(&TraceEvent::now(ScenarioKind::Submission, "diagnostics_after").with_data(&after));

    let path = page.submit()?;
    info!(%path, "order submitted");

    let (text, path) = match page.confirm_dialog() {
        Ok(text) => (text, path),
        Err(CheckError::Timeout { .. })
            if path == ClickPath::Native && ctx.interaction.force_click_fallback =>
        {
            warn!("no dialog after native click, forcing submit");
            let forced = page.force_submit()?;
            (page.confirm_dialog()?, forced)
        }
        Err(e) => return Err(e),
    };
    let phrase = ctx.settings.success_phrase.as_str();
    if text.contains(phrase) {
        Ok(Outcome::pass(format!("confirmation '{}' after {}", text, path)))
    } else {
        Ok(Outcome::fail(format!(
            "dialog text '{}' does not contain '{}'",
            text, phrase
        )))
    }
}

// ============================================================================
// Validation: a missing name is flagged, and only the name
// ============================================================================

pub fn validation<D: Driver>(
    driver: &mut D,
    ctx: &ScenarioContext<'_>,
) -> Result<Outcome, CheckError> {
    let customer = &ctx.settings.customer;
    let mut page = open_page(driver, ctx);
    page.open(ctx.target_url())?;

    page.fill_phone(&customer.phone)?;
    page.fill_address(&customer.address)?;
    page.accept_agreement()?;
    page.submit()?;

    match page.wait_displayed(Field::FullNameError) {
        Ok(_) => {}
        Err(CheckError::Timeout { .. }) => {
            return Ok(Outcome::fail("name error indicator was never displayed"));
        }
        Err(e) => return Err(e),
    }

    let unexpected: Vec<Field> = page
        .displayed_errors()?
        .into_iter()
        .filter(|f| *f != Field::FullNameError)
        .collect();

    if unexpected.is_empty() {
        Ok(Outcome::pass("only the name field was flagged"))
    } else {
        Ok(Outcome::fail(format!(
            "unexpected validation errors: {}",
            join_fields(&unexpected)
        )))
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}
