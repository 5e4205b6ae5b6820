pub mod driver;
pub mod error;
pub mod locator;
pub mod session;
