//! The recording sink checks report their findings through.

use smol_str::SmolStr;

use crate::ast::{NodeKind, NodeRef, Span};
use crate::diag::{Diag, DiagSeverity};

/// Identifies where a diagnostic points: a node, and optionally one of its
/// properties.
#[derive(Debug, Clone, Copy)]
pub struct Locator<'a> {
    node: NodeRef<'a>,
    property: Option<&'static str>,
    code: Option<&'static str>,
}

impl<'a> Locator<'a> {
    /// Targets the whole node.
    pub fn node(node: impl Into<NodeRef<'a>>) -> Self {
        Self {
            node: node.into(),
            property: None,
            code: None,
        }
    }

    /// Targets one property of the node.
    pub fn property(node: impl Into<NodeRef<'a>>, property: &'static str) -> Self {
        Self {
            node: node.into(),
            property: Some(property),
            code: None,
        }
    }

    /// Attaches a diagnostic code.
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// The range the diagnostic is reported at.
    ///
    /// The property's span if the property is present on the node, otherwise
    /// the node's span.
    pub fn range(&self) -> Span {
        self.property
            .and_then(|property| self.node.property_span(property))
            .unwrap_or_else(|| self.node.span())
    }

    /// Properties the node's kind does not declare are dropped from the
    /// target.
    fn target(&self) -> DiagnosticTarget {
        let kind = self.node.kind();
        DiagnosticTarget {
            kind,
            node_span: self.node.span(),
            property: self
                .property
                .filter(|property| kind.declares(property))
                .map(SmolStr::new_static),
        }
    }
}

/// The node a diagnostic was reported against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagnosticTarget {
    /// Kind of the node the check ran on.
    pub kind: NodeKind,
    /// Full span of that node.
    pub node_span: Span,
    /// The targeted property, if any.
    pub property: Option<SmolStr>,
}

/// A finding produced by a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    /// How serious the finding is.
    pub severity: DiagSeverity,
    /// Human-readable description.
    pub message: String,
    /// The node the finding belongs to.
    pub target: DiagnosticTarget,
    /// Resolved from the locator when the diagnostic was accepted.
    pub range: Span,
    /// Optional machine-readable code.
    pub code: Option<SmolStr>,
}

impl From<&ValidationDiagnostic> for Diag {
    fn from(diagnostic: &ValidationDiagnostic) -> Self {
        let label = match &diagnostic.target.property {
            Some(property) => format!("in `{property}` of this {}", diagnostic.target.kind),
            None => format!("this {}", diagnostic.target.kind),
        };
        let diag = Diag::new(diagnostic.severity, diagnostic.message.clone())
            .with_primary_label(diagnostic.range.clone(), label);
        match &diagnostic.code {
            Some(code) => diag.with_code(code.as_str()),
            None => diag,
        }
    }
}

/// Collects diagnostics for one validation pass.
///
/// Every call appends exactly one diagnostic; nothing is deduplicated.
#[derive(Debug, Default)]
pub struct ValidationAcceptor {
    diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationAcceptor {
    /// Creates an acceptor with no diagnostics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn accept(&mut self, severity: DiagSeverity, message: impl Into<String>, locator: Locator<'_>) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            message: message.into(),
            target: locator.target(),
            range: locator.range(),
            code: locator.code.map(SmolStr::new_static),
        });
    }

    /// Records an error.
    pub fn error(&mut self, message: impl Into<String>, locator: Locator<'_>) {
        self.accept(DiagSeverity::Error, message, locator);
    }

    /// Records a warning.
    pub fn warning(&mut self, message: impl Into<String>, locator: Locator<'_>) {
        self.accept(DiagSeverity::Warning, message, locator);
    }

    /// Records an informational diagnostic.
    pub fn info(&mut self, message: impl Into<String>, locator: Locator<'_>) {
        self.accept(DiagSeverity::Info, message, locator);
    }

    /// Records a hint.
    pub fn hint(&mut self, message: impl Into<String>, locator: Locator<'_>) {
        self.accept(DiagSeverity::Hint, message, locator);
    }

    /// Diagnostics recorded so far, in order of acceptance.
    pub fn diagnostics(&self) -> &[ValidationDiagnostic] {
        &self.diagnostics
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Consumes the acceptor, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<ValidationDiagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Greeting, Person};

    #[test]
    fn property_locator_narrows_the_range() {
        let person = Person::new("alice", 7..12, 0..12);
        assert_eq!(Locator::property(&person, "name").range(), 7..12);
        assert_eq!(Locator::node(&person).range(), 0..12);
    }

    #[test]
    fn absent_or_undeclared_property_falls_back_to_node() {
        let nameless = Person { name: None, span: 0..6 };
        assert_eq!(Locator::property(&nameless, "name").range(), 0..6);

        let greeting = Greeting::new("Bob", 6..9, 0..10);
        assert_eq!(Locator::property(&greeting, "name").range(), 0..10);
    }

    #[test]
    fn undeclared_property_is_dropped_from_the_target() {
        let greeting = Greeting::new("Bob", 6..9, 0..10);
        let mut acceptor = ValidationAcceptor::new();
        acceptor.warning("w", Locator::property(&greeting, "name"));
        acceptor.warning("w", Locator::property(&greeting, "person"));
        assert_eq!(acceptor.diagnostics()[0].target.property, None);
        assert_eq!(acceptor.diagnostics()[1].target.property.as_deref(), Some("person"));
    }

    #[test]
    fn identical_accepts_are_not_deduplicated() {
        let person = Person::new("alice", 7..12, 0..12);
        let mut acceptor = ValidationAcceptor::new();
        acceptor.warning("same", Locator::property(&person, "name"));
        acceptor.warning("same", Locator::property(&person, "name"));
        assert_eq!(acceptor.len(), 2);
        assert_eq!(acceptor.diagnostics()[0], acceptor.diagnostics()[1]);
    }

    #[test]
    fn accept_records_target_and_severity() {
        let person = Person::new("alice", 7..12, 0..12);
        let mut acceptor = ValidationAcceptor::new();
        acceptor.hint("h", Locator::node(&person).with_code("style::hint"));
        acceptor.info("i", Locator::property(&person, "name"));

        let diagnostics = acceptor.into_diagnostics();
        assert_eq!(diagnostics[0].severity, DiagSeverity::Hint);
        assert_eq!(diagnostics[0].code.as_deref(), Some("style::hint"));
        assert_eq!(diagnostics[0].target.property, None);
        assert_eq!(diagnostics[1].severity, DiagSeverity::Info);
        assert_eq!(diagnostics[1].target.kind, NodeKind::Person);
        assert_eq!(diagnostics[1].target.node_span, 0..12);
        assert_eq!(diagnostics[1].target.property.as_deref(), Some("name"));
    }

    #[test]
    fn converts_to_diag() {
        let person = Person::new("alice", 7..12, 0..12);
        let mut acceptor = ValidationAcceptor::new();
        acceptor.error("bad", Locator::property(&person, "name").with_code("E1"));

        let diag = Diag::from(&acceptor.diagnostics()[0]);
        assert_eq!(diag.severity, DiagSeverity::Error);
        assert_eq!(diag.primary_span(), 7..12);
        assert_eq!(diag.labels[0].message, "in `name` of this Person");
        assert_eq!(diag.code.as_deref(), Some("E1"));
    }
}
