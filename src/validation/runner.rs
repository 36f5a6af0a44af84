//! The validation pass: walk the AST, dispatch each node to its checks.

use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use smol_str::SmolStr;

use crate::ast::visit::{Visit, VisitResult, walk_node};
use crate::ast::{NodeKind, NodeRef, Span};
use crate::diag::DiagSeverity;
use crate::validation::acceptor::{ValidationAcceptor, ValidationDiagnostic};
use crate::validation::registry::{RegisteredCheck, ValidationRegistry};

/// A check that failed instead of completing.
///
/// Faults describe problems in the checks themselves. They are logged and
/// returned alongside the diagnostics, never mixed into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFault {
    /// Contributor that registered the check.
    pub owner: SmolStr,
    /// Name of the failed check.
    pub check: SmolStr,
    /// Kind of the node it ran on.
    pub kind: NodeKind,
    /// Span of that node.
    pub node_span: Span,
    /// The returned error, or the panic message.
    pub message: String,
}

impl fmt::Display for CheckFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "check `{}::{}` failed on {} at {:?}: {}",
            self.owner, self.check, self.kind, self.node_span, self.message
        )
    }
}

/// Bookkeeping for one pass over a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Checks that returned an error or panicked.
    pub faults: Vec<CheckFault>,
    /// Nodes the walk reached.
    pub nodes_visited: usize,
    /// Check invocations, including failed ones.
    pub checks_run: usize,
}

/// Everything a validation pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Findings, in traversal order.
    pub diagnostics: Vec<ValidationDiagnostic>,
    /// Checks that returned an error or panicked.
    pub faults: Vec<CheckFault>,
    /// Nodes the walk reached.
    pub nodes_visited: usize,
    /// Check invocations, including failed ones.
    pub checks_run: usize,
}

impl ValidationOutcome {
    /// Returns true if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagSeverity::Error)
    }

    /// Returns true if there are neither diagnostics nor faults.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.faults.is_empty()
    }
}

/// Runs the registered checks over documents.
///
/// The runner holds no per-document state, so one runner can serve any
/// number of passes, including concurrent ones on different threads.
#[derive(Debug, Clone)]
pub struct ValidationRunner {
    registry: Arc<ValidationRegistry>,
}

impl ValidationRunner {
    /// Creates a runner over a shared registry.
    pub fn new(registry: Arc<ValidationRegistry>) -> Self {
        Self { registry }
    }

    /// The registry checks are looked up in.
    pub fn registry(&self) -> &ValidationRegistry {
        &self.registry
    }

    /// Validates the tree rooted at `root` with a fresh acceptor.
    pub fn validate<'a>(&self, root: impl Into<NodeRef<'a>>) -> ValidationOutcome {
        let mut acceptor = ValidationAcceptor::new();
        let report = self.validate_into(root, &mut acceptor);
        ValidationOutcome {
            diagnostics: acceptor.into_diagnostics(),
            faults: report.faults,
            nodes_visited: report.nodes_visited,
            checks_run: report.checks_run,
        }
    }

    /// Validates the tree rooted at `root`, reporting into `acceptor`.
    ///
    /// Every node is visited once, parents before children. For each node
    /// all checks registered for its kind run in registration order; a
    /// finding or a failing check never stops the pass.
    pub fn validate_into<'a>(
        &self,
        root: impl Into<NodeRef<'a>>,
        acceptor: &mut ValidationAcceptor,
    ) -> PassReport {
        let mut dispatcher = Dispatcher {
            registry: &self.registry,
            acceptor: &mut *acceptor,
            report: PassReport::default(),
        };
        let _ = dispatcher.visit_node(root.into());
        let report = dispatcher.report;

        tracing::debug!(
            nodes = report.nodes_visited,
            checks = report.checks_run,
            faults = report.faults.len(),
            diagnostics = acceptor.len(),
            "validation pass complete"
        );
        report
    }
}

struct Dispatcher<'r, 'acc> {
    registry: &'r ValidationRegistry,
    acceptor: &'acc mut ValidationAcceptor,
    report: PassReport,
}

impl Dispatcher<'_, '_> {
    fn run_check(&mut self, check: &RegisteredCheck, node: NodeRef<'_>) {
        tracing::trace!(owner = %check.owner, check = %check.name, kind = %check.kind, "running check");
        self.report.checks_run += 1;

        let acceptor = &mut *self.acceptor;
        let result = panic::catch_unwind(AssertUnwindSafe(|| (check.func)(node, acceptor)));
        let message = match result {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err.to_string(),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };

        tracing::warn!(
            owner = %check.owner,
            check = %check.name,
            kind = %check.kind,
            error = %message,
            "validation check failed"
        );
        self.report.faults.push(CheckFault {
            owner: check.owner.clone(),
            check: check.name.clone(),
            kind: check.kind,
            node_span: node.span(),
            message,
        });
    }
}

impl<'ast> Visit<'ast> for Dispatcher<'_, '_> {
    type Break = Infallible;

    fn visit_node(&mut self, node: NodeRef<'ast>) -> VisitResult<Self::Break> {
        self.report.nodes_visited += 1;
        let registry = self.registry;
        for check in registry.checks_for(node.kind()) {
            self.run_check(check, node);
        }
        walk_node(self, node)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Greeting, Model, Person};
    use crate::validation::acceptor::Locator;
    use crate::validation::check::{CheckError, NamedCheck, ValidationChecks};

    fn runner(checks: ValidationChecks) -> ValidationRunner {
        let mut registry = ValidationRegistry::new();
        registry.register(checks, "test").unwrap();
        ValidationRunner::new(Arc::new(registry))
    }

    fn tag(label: &'static str) -> NamedCheck {
        NamedCheck::new(label, move |node, accept| {
            accept.info(label, Locator::node(node));
            Ok(())
        })
    }

    fn document() -> Model {
        Model {
            persons: vec![Person::new("Alice", 7..12, 0..12), Person::new("Bob", 20..23, 13..23)],
            greetings: vec![Greeting::new("Bob", 30..33, 24..34)],
            span: 0..34,
        }
    }

    fn messages(outcome: &ValidationOutcome) -> Vec<&str> {
        outcome.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn empty_registry_yields_empty_outcome() {
        let runner = runner(ValidationChecks::new());
        let outcome = runner.validate(&document());
        assert!(outcome.is_clean());
        assert_eq!(outcome.nodes_visited, 4);
        assert_eq!(outcome.checks_run, 0);
    }

    #[test]
    fn checks_run_per_node_in_registration_order_parent_first() {
        let runner = runner(
            ValidationChecks::new()
                .on(NodeKind::Person, [tag("p1"), tag("p2")])
                .on(NodeKind::Model, [tag("m")])
                .on(NodeKind::Greeting, [tag("g")]),
        );
        let outcome = runner.validate(&document());
        assert_eq!(
            messages(&outcome),
            vec!["m", "p1", "p2", "p1", "p2", "g"]
        );
        assert_eq!(outcome.checks_run, 6);
    }

    #[test]
    fn failing_check_is_isolated() {
        let runner = runner(
            ValidationChecks::new().on(
                NodeKind::Person,
                [
                    NamedCheck::new("fails", |_, _| Err(CheckError::Failed("no luck".into()))),
                    tag("after"),
                ],
            ),
        );
        let outcome = runner.validate(&document());
        assert_eq!(messages(&outcome), vec!["after", "after"]);
        assert_eq!(outcome.faults.len(), 2);
        assert_eq!(outcome.faults[0].check, "fails");
        assert_eq!(outcome.faults[0].owner, "test");
        assert_eq!(outcome.faults[0].node_span, 0..12);
        assert_eq!(outcome.faults[0].message, "no luck");
    }

    #[test]
    fn panicking_check_is_isolated() {
        let runner = runner(
            ValidationChecks::new()
                .on(NodeKind::Greeting, [NamedCheck::new("explodes", |_, _| panic!("kaboom"))])
                .on(NodeKind::Greeting, [tag("still runs")]),
        );
        let outcome = runner.validate(&document());
        assert_eq!(messages(&outcome), vec!["still runs"]);
        assert_eq!(outcome.faults.len(), 1);
        assert_eq!(outcome.faults[0].message, "panicked: kaboom");
        assert_eq!(outcome.faults[0].kind, NodeKind::Greeting);
        assert!(!outcome.has_errors());
    }

    #[test]
    fn findings_before_a_fault_are_kept() {
        let runner = runner(ValidationChecks::new().on(
            NodeKind::Model,
            [NamedCheck::new("half_done", |node, accept| {
                accept.warning("partial", Locator::node(node));
                Err(CheckError::Failed("gave up".into()))
            })],
        ));
        let outcome = runner.validate(&document());
        assert_eq!(messages(&outcome), vec!["partial"]);
        assert_eq!(outcome.faults.len(), 1);
    }

    #[test]
    fn validate_into_shares_the_callers_acceptor() {
        let runner = runner(ValidationChecks::new().on(NodeKind::Person, [tag("p")]));
        let model = document();
        let mut acceptor = ValidationAcceptor::new();
        acceptor.error("pre-existing", Locator::node(&model));
        let report = runner.validate_into(&model, &mut acceptor);
        assert_eq!(acceptor.len(), 3);
        assert_eq!(report.nodes_visited, 4);
        assert!(report.faults.is_empty());
    }

    #[test]
    fn repeated_passes_are_identical() {
        let runner = runner(
            ValidationChecks::new()
                .on(NodeKind::Person, [tag("p")])
                .on(NodeKind::Model, [tag("m")]),
        );
        let model = document();
        assert_eq!(runner.validate(&model), runner.validate(&model));
    }

    #[test]
    fn fault_display() {
        let fault = CheckFault {
            owner: "SpreadsheetValidator".into(),
            check: "check".into(),
            kind: NodeKind::Person,
            node_span: 0..12,
            message: "boom".into(),
        };
        assert_eq!(
            fault.to_string(),
            "check `SpreadsheetValidator::check` failed on Person at 0..12: boom"
        );
    }
}
