use std::collections::{BTreeMap, HashMap};

use crate::browser::error::CheckError;
use crate::browser::locator::{Field, Locator};

/// Fixed mapping from field to locator, built once at startup.
#[derive(Debug, Clone)]
pub struct LocatorRegistry {
    locators: BTreeMap<Field, Locator>,
}

impl LocatorRegistry {
    /// Registry for the checkout form: each element addressed by its identifier.
    pub fn checkout_form() -> Self {
        let locators = Field::ALL
            .into_iter()
            .map(|field| {
                let locator = Locator::new(field, field.default_strategy(), field.name());
                (field, locator)
            })
            .collect();
        Self { locators }
    }

    /// Replace addressing values by field name, e.g. `{"full-name": "fio"}`.
    ///
    /// The strategy of the field is kept. Fails on an unregistered name.
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Result<Self, CheckError> {
        for (name, value) in overrides {
            let field = Field::from_name(name).ok_or_else(|| unknown_field(name))?;
            let strategy = self.locator(field)?.strategy;
            self.locators
                .insert(field, Locator::new(field, strategy, value.clone()));
        }
        Ok(self)
    }

    pub fn locator(&self, field: Field) -> Result<&Locator, CheckError> {
        self.locators
            .get(&field)
            .ok_or_else(|| unknown_field(field.name()))
    }

    pub fn by_name(&self, name: &str) -> Result<&Locator, CheckError> {
        let field = Field::from_name(name).ok_or_else(|| unknown_field(name))?;
        self.locator(field)
    }

    /// All entries in field order.
    pub fn iter(&self) -> impl Iterator<Item = &Locator> {
        self.locators.values()
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl Default for LocatorRegistry {
    fn default() -> Self {
        Self::checkout_form()
    }
}

fn unknown_field(name: &str) -> CheckError {
    CheckError::Configuration(format!("no locator registered for field '{}'", name))
}
