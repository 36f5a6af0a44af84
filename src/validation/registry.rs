//! Node kind to check dispatch table.

use std::collections::HashMap;

use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

use crate::ast::NodeKind;
use crate::validation::check::{CheckFn, KindKey, ValidationChecks};

/// Errors raised while wiring checks into a registry.
///
/// These are programming errors in service set-up and are meant to abort
/// start-up.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RegistryError {
    #[error("unknown node kind `{kind}` in checks registered by `{owner}`")]
    #[diagnostic(
        code(registry::unknown_kind),
        help("known node kinds are Model, Person and Greeting")
    )]
    UnknownKind { kind: SmolStr, owner: SmolStr },

    #[error("node kind `{kind}` is listed by `{owner}` with no checks")]
    #[diagnostic(code(registry::empty_check_set))]
    EmptyCheckSet { kind: NodeKind, owner: SmolStr },

    #[error("a check for node kind `{kind}` registered by `{owner}` has an empty name")]
    #[diagnostic(code(registry::unnamed_check))]
    UnnamedCheck { kind: NodeKind, owner: SmolStr },
}

/// A check bound to a kind, with the contributor that registered it.
#[derive(Clone)]
pub struct RegisteredCheck {
    /// Kind of node the check runs on.
    pub kind: NodeKind,
    /// Name the check was registered under.
    pub name: SmolStr,
    /// Contributor that registered the check.
    pub owner: SmolStr,
    pub(crate) func: CheckFn,
}

impl std::fmt::Debug for RegisteredCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCheck")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("owner", &self.owner)
            .finish()
    }
}

/// Maps each node kind to its checks, in registration order.
///
/// Built once while the language services are created, then shared
/// read-only (usually behind an `Arc`) by every validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationRegistry {
    entries: HashMap<NodeKind, Vec<RegisteredCheck>>,
}

impl ValidationRegistry {
    /// Creates a registry with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `checks` to the per-kind lists.
    ///
    /// Nothing is replaced: registering a kind that already has checks adds
    /// to them, and both old and new checks run. The whole set is rejected,
    /// leaving the registry unchanged, if any entry names an unknown kind,
    /// lists no checks, or contains an unnamed check.
    pub fn register(
        &mut self,
        checks: ValidationChecks,
        owner: impl Into<SmolStr>,
    ) -> Result<(), RegistryError> {
        let owner = owner.into();
        let mut staged = Vec::with_capacity(checks.len());

        for (key, named_checks) in checks.entries {
            let kind = match key {
                KindKey::Kind(kind) => kind,
                KindKey::Name(name) => {
                    name.parse::<NodeKind>()
                        .map_err(|_| RegistryError::UnknownKind {
                            kind: name.clone(),
                            owner: owner.clone(),
                        })?
                }
            };
            if named_checks.is_empty() {
                return Err(RegistryError::EmptyCheckSet {
                    kind,
                    owner: owner.clone(),
                });
            }
            for check in named_checks {
                if check.name.trim().is_empty() {
                    return Err(RegistryError::UnnamedCheck {
                        kind,
                        owner: owner.clone(),
                    });
                }
                staged.push(RegisteredCheck {
                    kind,
                    name: check.name,
                    owner: owner.clone(),
                    func: check.func,
                });
            }
        }

        tracing::debug!(owner = %owner, checks = staged.len(), "registering validation checks");
        for check in staged {
            self.entries.entry(check.kind).or_default().push(check);
        }
        Ok(())
    }

    /// Returns the checks for `kind`, in registration order.
    pub fn checks_for(&self, kind: NodeKind) -> &[RegisteredCheck] {
        self.entries.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if at least one check is registered for `kind`.
    pub fn has_checks(&self, kind: NodeKind) -> bool {
        !self.checks_for(kind).is_empty()
    }

    /// Kinds with at least one check, in grammar order.
    pub fn kinds(&self) -> Vec<NodeKind> {
        NodeKind::ALL
            .into_iter()
            .filter(|kind| self.has_checks(*kind))
            .collect()
    }

    /// Total number of registered checks.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns true if no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
