//! Kind-dispatched semantic validation.
//!
//! Validation is organised around four pieces:
//!
//! - [`ValidationChecks`]: a contributor's mapping from node kind to named
//!   check functions.
//! - [`ValidationRegistry`]: merges check sets from every contributor into
//!   one ordered list per node kind. Built once at start-up.
//! - [`ValidationRunner`]: walks a document in pre-order and invokes each
//!   node's checks with a shared [`ValidationAcceptor`].
//! - [`ValidationAcceptor`]: records what the checks report.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rechenbrett_spreadsheet::ast::{Model, Person};
//! use rechenbrett_spreadsheet::validation::{
//!     Locator, ValidationChecks, ValidationRegistry, ValidationRunner,
//! };
//!
//! let checks = ValidationChecks::new().check::<Person, _>("no_bobs", |person, accept| {
//!     if person.name_str() == Some("Bob") {
//!         accept.warning("No Bobs, please.", Locator::property(person, "name"));
//!     }
//!     Ok(())
//! });
//!
//! let mut registry = ValidationRegistry::new();
//! registry.register(checks, "house_rules").expect("valid check set");
//! let runner = ValidationRunner::new(Arc::new(registry));
//!
//! let mut model = Model::new(0..10);
//! model.persons.push(Person::new("Bob", 7..10, 0..10));
//! let outcome = runner.validate(&model);
//! assert_eq!(outcome.diagnostics.len(), 1);
//! assert_eq!(outcome.diagnostics[0].range, 7..10);
//! ```

pub mod acceptor;
pub mod check;
pub mod registry;
pub mod runner;

pub use acceptor::{DiagnosticTarget, Locator, ValidationAcceptor, ValidationDiagnostic};
pub use check::{CheckError, CheckFn, CheckResult, NamedCheck, ValidationChecks};
pub use registry::{RegisteredCheck, RegistryError, ValidationRegistry};
pub use runner::{CheckFault, PassReport, ValidationOutcome, ValidationRunner};
