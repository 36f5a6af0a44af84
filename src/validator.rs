//! Validation rules for Rechenbrett spreadsheet documents.

use std::sync::Arc;

use crate::ast::Person;
use crate::validation::{
    CheckResult, Locator, RegistryError, ValidationAcceptor, ValidationChecks, ValidationRegistry,
};

/// Message reported for person names starting with a lower-case letter.
pub const PERSON_NAME_NOT_CAPITALIZED: &str = "Person name should start with a capital.";

/// The language's own checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetValidator;

impl SpreadsheetValidator {
    /// Owner name the checks are registered under.
    pub const OWNER: &'static str = "SpreadsheetValidator";

    /// Creates the validator.
    pub fn new() -> Self {
        Self
    }

    /// Warns when a person's name does not start with an upper-case letter.
    ///
    /// Names whose first character has no upper-case form (digits,
    /// underscores) pass. A missing or empty name is not checked.
    pub fn check_person_starts_with_capital(
        &self,
        person: &Person,
        accept: &mut ValidationAcceptor,
    ) -> CheckResult {
        let Some(first) = person.name_str().and_then(|name| name.chars().next()) else {
            return Ok(());
        };
        if !first.to_uppercase().eq([first]) {
            accept.warning(
                PERSON_NAME_NOT_CAPITALIZED,
                Locator::property(person, "name"),
            );
        }
        Ok(())
    }
}

/// Registers the validator's checks with `registry`.
pub fn register_validation_checks(
    registry: &mut ValidationRegistry,
    validator: &Arc<SpreadsheetValidator>,
) -> Result<(), RegistryError> {
    let capital = Arc::clone(validator);
    let checks = ValidationChecks::new().check::<Person, _>(
        "check_person_starts_with_capital",
        move |person, accept| capital.check_person_starts_with_capital(person, accept),
    );
    registry.register(checks, SpreadsheetValidator::OWNER)
}
