//! Language services for Rechenbrett spreadsheet documents.
//!
//! The crate lexes and parses documents into a small AST, resolves
//! cross-references, and runs kind-dispatched validation checks. Findings
//! come back as [`Diag`] values that render through miette or convert to
//! Language Server Protocol diagnostics.
//!
//! # Example
//!
//! ```
//! use rechenbrett_spreadsheet::{ServiceConfig, create_spreadsheet_services};
//!
//! let services = create_spreadsheet_services(ServiceConfig::default()).unwrap();
//! let built = services.build_document("person alice\nHello alice!\n");
//!
//! assert!(built.syntax.is_empty());
//! assert!(built.linking.is_empty());
//! assert_eq!(built.validation.diagnostics.len(), 1);
//! assert_eq!(
//!     built.validation.diagnostics[0].message,
//!     "Person name should start with a capital."
//! );
//! ```

pub mod ast;
pub mod diag;
pub mod lexer;
pub mod linker;
pub mod lsp;
pub mod parser;
pub mod service;
pub mod validation;
pub mod validator;

pub use ast::{Greeting, Model, NodeKind, NodeRef, Person, Span, Spanned};
pub use diag::{Diag, DiagLabel, DiagSeverity, LabelRole, SourceFile};
pub use lexer::token::{Token, TokenKind};
pub use lexer::{LexerResult, tokenize};
pub use parser::{ParseResult, parse};
pub use service::{
    DocumentDiagnostics, DocumentStore, ServiceConfig, SpreadsheetServices,
    create_spreadsheet_services,
};
pub use validation::{
    CheckFault, Locator, ValidationAcceptor, ValidationChecks, ValidationDiagnostic,
    ValidationOutcome, ValidationRegistry, ValidationRunner,
};
pub use validator::{SpreadsheetValidator, register_validation_checks};
