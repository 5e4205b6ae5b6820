use std::time::Duration;

use checkout_acceptance::page::interaction::InteractionConfig;
use checkout_acceptance::scenario::context::RunSettings;

pub const TARGET: &str = "file:///srv/checkout.html";

/// The bundled demo document as a `file://` URL.
pub fn page(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    let path = base.join("pages").join(name);

    format!("file://{}", path.display())
}

/// Short waits so timeouts resolve quickly against the fake page.
pub fn fast_interaction() -> InteractionConfig {
    InteractionConfig {
        timeout: Duration::from_millis(40),
        poll_interval: Duration::from_millis(5),
        ..InteractionConfig::default()
    }
}

pub fn settings() -> RunSettings {
    RunSettings::new(TARGET)
}
