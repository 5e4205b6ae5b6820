pub mod checkout;
pub mod interaction;
pub mod registry;
