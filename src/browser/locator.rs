use std::fmt;

use serde::{Deserialize, Serialize};

/// How the driver addresses an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Id,
    ClassName,
    Css,
}

/// Every named element of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    FullName,
    Phone,
    Address,
    Agreement,
    Checkout,
    FullNameError,
    PhoneError,
    AddressError,
    AgreementError,
    CartItem,
    EmptyCart,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::FullName,
        Field::Phone,
        Field::Address,
        Field::Agreement,
        Field::Checkout,
        Field::FullNameError,
        Field::PhoneError,
        Field::AddressError,
        Field::AgreementError,
        Field::CartItem,
        Field::EmptyCart,
    ];

    /// Inputs and buttons the smoke check expects to see.
    pub const REQUIRED: [Field; 5] = [
        Field::FullName,
        Field::Phone,
        Field::Address,
        Field::Checkout,
        Field::Agreement,
    ];

    /// Validation indicators, one per input.
    pub const ERROR_INDICATORS: [Field; 4] = [
        Field::FullNameError,
        Field::PhoneError,
        Field::AddressError,
        Field::AgreementError,
    ];

    /// Registered name, identical to the element identifier on the page.
    pub fn name(self) -> &'static str {
        match self {
            Field::FullName => "full-name",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::Agreement => "agreement-checkbox",
            Field::Checkout => "checkout-btn",
            Field::FullNameError => "full-name-error",
            Field::PhoneError => "phone-error",
            Field::AddressError => "address-error",
            Field::AgreementError => "agreement-error",
            Field::CartItem => "cart-item",
            Field::EmptyCart => "empty-cart",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn default_strategy(self) -> Strategy {
        match self {
            Field::CartItem | Field::EmptyCart => Strategy::ClassName,
            _ => Strategy::Id,
        }
    }

    /// Human-readable description used in reports.
    pub fn describe(self) -> &'static str {
        match self {
            Field::FullName => "name field",
            Field::Phone => "phone field",
            Field::Address => "address field",
            Field::Agreement => "agreement checkbox",
            Field::Checkout => "checkout button",
            Field::FullNameError => "name error",
            Field::PhoneError => "phone error",
            Field::AddressError => "address error",
            Field::AgreementError => "agreement error",
            Field::CartItem => "cart item",
            Field::EmptyCart => "empty cart marker",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Addresses exactly one element for a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locator {
    #[serde(skip)]
    pub field: Field,
    #[serde(rename = "by")]
    pub strategy: Strategy,
    pub value: String,
}

impl Locator {
    pub fn new(field: Field, strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            field,
            strategy,
            value: value.into(),
        }
    }

    /// Equivalent CSS selector, for logs and drivers that only speak CSS.
    pub fn css(&self) -> String {
        match self.strategy {
            Strategy::Id => format!("#{}", self.value),
            Strategy::ClassName => format!(".{}", self.value),
            Strategy::Css => self.value.clone(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.field, self.css())
    }
}
