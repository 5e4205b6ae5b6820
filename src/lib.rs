//! Browser acceptance checks for a single checkout form.
//!
//! Layers, bottom up: a [`Driver`](browser::driver::Driver) capability, the
//! locator registry and interaction layer in [`page`], the checkout page
//! object, and the scenario runner that sequences three independent checks
//! (smoke, successful submission, validation) on fresh browser sessions.

pub mod browser;
pub mod cli;
pub mod page;
pub mod report;
pub mod scenario;
pub mod trace;
