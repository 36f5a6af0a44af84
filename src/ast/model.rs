//! AST node types for Rechenbrett spreadsheet documents.

use smol_str::SmolStr;

use crate::ast::{Span, Spanned};

/// Root node of a document.
///
/// Persons and greetings may be interleaved in the source; each list keeps
/// source order. Traversal visits `persons` before `greetings`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Model {
    /// Declared persons, in source order.
    pub persons: Vec<Person>,
    /// Greetings, in source order.
    pub greetings: Vec<Greeting>,
    /// The whole document.
    pub span: Span,
}

/// `person <name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// `None` when the parser recovered from a missing identifier.
    pub name: Option<Spanned<SmolStr>>,
    /// From `person` to the end of the name.
    pub span: Span,
}

/// `Hello <person>!`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    /// Cross-reference to a [`Person`] by name; `None` after recovery.
    pub person: Option<Reference>,
    /// From `Hello` to the closing `!`.
    pub span: Span,
}

/// An unresolved cross-reference: the referenced text and where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The name as written.
    pub text: SmolStr,
    /// Span of the name.
    pub span: Span,
}

impl Model {
    /// Creates an empty document spanning `span`.
    pub fn new(span: Span) -> Self {
        Self {
            persons: Vec::new(),
            greetings: Vec::new(),
            span,
        }
    }

    /// Finds the first person declared with the given name.
    pub fn person_named(&self, name: &str) -> Option<&Person> {
        self.persons.iter().find(|person| person.name_str() == Some(name))
    }
}

impl Person {
    /// Creates a person with a name at `name_span`, declared over `span`.
    pub fn new(name: impl Into<SmolStr>, name_span: Span, span: Span) -> Self {
        Self {
            name: Some(Spanned::new(name.into(), name_span)),
            span,
        }
    }

    /// Returns the declared name, if any.
    pub fn name_str(&self) -> Option<&str> {
        self.name.as_ref().map(|name| name.node.as_str())
    }
}

impl Greeting {
    /// Creates a greeting referencing `target` at `target_span`.
    pub fn new(target: impl Into<SmolStr>, target_span: Span, span: Span) -> Self {
        Self {
            person: Some(Reference {
                text: target.into(),
                span: target_span,
            }),
            span,
        }
    }
}
