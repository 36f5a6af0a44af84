//! Check functions and the check-set mapping contributors register.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;

use crate::ast::{AstType, NodeKind, NodeRef};
use crate::validation::acceptor::ValidationAcceptor;

/// A failure inside a check, as opposed to a finding about the document.
///
/// Returned errors are recorded as faults of the validation pass; they are
/// never shown to the user as document diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// A property the check depends on was absent.
    #[error("missing property `{property}` on {kind}")]
    MissingProperty {
        kind: NodeKind,
        property: &'static str,
    },
    /// Any other failure.
    #[error("{0}")]
    Failed(String),
}

/// What a check returns. Findings go to the acceptor, not the result.
pub type CheckResult = Result<(), CheckError>;

/// Type-erased check body.
pub type CheckFn = Arc<dyn Fn(NodeRef<'_>, &mut ValidationAcceptor) -> CheckResult + Send + Sync>;

/// A named check function, not yet bound to a kind.
#[derive(Clone)]
pub struct NamedCheck {
    pub(crate) name: SmolStr,
    pub(crate) func: CheckFn,
}

impl NamedCheck {
    /// Wraps an untyped check; it receives every node of the kind it is
    /// registered for.
    pub fn new<F>(name: impl Into<SmolStr>, check: F) -> Self
    where
        F: Fn(NodeRef<'_>, &mut ValidationAcceptor) -> CheckResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(check),
        }
    }

    /// Wraps a check over a concrete node type.
    pub fn typed<T, F>(name: impl Into<SmolStr>, check: F) -> Self
    where
        T: AstType + 'static,
        F: Fn(&T, &mut ValidationAcceptor) -> CheckResult + Send + Sync + 'static,
    {
        Self::new(name, move |node, accept| match node.cast::<T>() {
            Some(typed) => check(typed, accept),
            None => Ok(()),
        })
    }

    /// The name the check is registered and reported under.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for NamedCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedCheck").field("name", &self.name).finish()
    }
}

/// Kind key of a check-set entry: a typed kind, or a kind name that is
/// resolved when the set is registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KindKey {
    Kind(NodeKind),
    Name(SmolStr),
}

/// A mapping from node kind to the checks one contributor provides for it.
///
/// Entries keep insertion order. The same kind may appear more than once.
#[derive(Debug, Clone, Default)]
pub struct ValidationChecks {
    pub(crate) entries: Vec<(KindKey, Vec<NamedCheck>)>,
}

impl ValidationChecks {
    /// Creates an empty check set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a typed check for `T`'s kind.
    pub fn check<T, F>(mut self, name: impl Into<SmolStr>, check: F) -> Self
    where
        T: AstType + 'static,
        F: Fn(&T, &mut ValidationAcceptor) -> CheckResult + Send + Sync + 'static,
    {
        self.entries
            .push((KindKey::Kind(T::KIND), vec![NamedCheck::typed::<T, F>(name, check)]));
        self
    }

    /// Adds checks for a kind.
    pub fn on(mut self, kind: NodeKind, checks: impl IntoIterator<Item = NamedCheck>) -> Self {
        self.entries
            .push((KindKey::Kind(kind), checks.into_iter().collect()));
        self
    }

    /// Adds checks for a kind given by its grammar rule name.
    ///
    /// The name is resolved by [`ValidationRegistry::register`], which fails
    /// if it is not a known kind.
    ///
    /// [`ValidationRegistry::register`]: crate::validation::ValidationRegistry::register
    pub fn on_named(
        mut self,
        kind: impl Into<SmolStr>,
        checks: impl IntoIterator<Item = NamedCheck>,
    ) -> Self {
        self.entries
            .push((KindKey::Name(kind.into()), checks.into_iter().collect()));
        self
    }

    /// Number of checks across all entries.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, checks)| checks.len()).sum()
    }

    /// Returns true if no entry holds a check.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
