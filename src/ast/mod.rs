//! AST foundation types and node structures.

pub mod model;
pub mod node;
mod span;
pub mod visit;

pub use span::{Span, Spanned, cover};

pub use model::{Greeting, Model, Person, Reference};
pub use node::{AstType, NodeKind, NodeRef, UnknownNodeKind};
pub use visit::{Visit, VisitResult};
