//! Node kinds and the closed, borrowed view over AST nodes.
//!
//! [`NodeRef`] is what validation dispatches on: every node reachable from a
//! [`Model`] can be viewed as a `NodeRef`, which exposes the node's kind, its
//! span, the spans of its named properties, and its children in
//! property-declaration order.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;
use thiserror::Error;

use crate::ast::model::{Greeting, Model, Person};
use crate::ast::span::{Span, cover};

/// Tag identifying which grammar rule produced a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Model,
    Person,
    Greeting,
}

impl NodeKind {
    /// Every node kind of the grammar.
    pub const ALL: [NodeKind; 3] = [NodeKind::Model, NodeKind::Person, NodeKind::Greeting];

    /// Returns the grammar rule name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Model => "Model",
            Self::Person => "Person",
            Self::Greeting => "Greeting",
        }
    }

    /// Returns the properties this kind declares, in declaration order.
    pub fn properties(self) -> &'static [&'static str] {
        match self {
            Self::Model => &["persons", "greetings"],
            Self::Person => &["name"],
            Self::Greeting => &["person"],
        }
    }

    /// Returns true if this kind declares `property`.
    pub fn declares(self, property: &str) -> bool {
        self.properties().contains(&property)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a grammar rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node kind `{0}`")]
pub struct UnknownNodeKind(pub SmolStr);

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownNodeKind(s.into()))
    }
}

/// A borrowed reference to any AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Model(&'a Model),
    Person(&'a Person),
    Greeting(&'a Greeting),
}

impl<'a> NodeRef<'a> {
    /// Returns the node's kind.
    pub fn kind(self) -> NodeKind {
        match self {
            NodeRef::Model(_) => NodeKind::Model,
            NodeRef::Person(_) => NodeKind::Person,
            NodeRef::Greeting(_) => NodeKind::Greeting,
        }
    }

    /// Returns the node's full span.
    pub fn span(self) -> Span {
        match self {
            NodeRef::Model(model) => model.span.clone(),
            NodeRef::Person(person) => person.span.clone(),
            NodeRef::Greeting(greeting) => greeting.span.clone(),
        }
    }

    /// Returns the span of a property's value.
    ///
    /// `None` if the kind does not declare the property or the value is
    /// absent. Sequence-valued properties cover their first to last element.
    pub fn property_span(self, property: &str) -> Option<Span> {
        match (self, property) {
            (NodeRef::Model(model), "persons") => covering(model.persons.iter().map(|p| &p.span)),
            (NodeRef::Model(model), "greetings") => {
                covering(model.greetings.iter().map(|g| &g.span))
            }
            (NodeRef::Person(person), "name") => person.name.as_ref().map(|n| n.span.clone()),
            (NodeRef::Greeting(greeting), "person") => {
                greeting.person.as_ref().map(|r| r.span.clone())
            }
            _ => None,
        }
    }

    /// Returns the direct children, in property-declaration order.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        match self {
            NodeRef::Model(model) => model
                .persons
                .iter()
                .map(NodeRef::Person)
                .chain(model.greetings.iter().map(NodeRef::Greeting))
                .collect(),
            NodeRef::Person(_) | NodeRef::Greeting(_) => Vec::new(),
        }
    }

    /// Downcasts to a concrete node type.
    pub fn cast<T: AstType>(self) -> Option<&'a T> {
        T::cast(self)
    }
}

fn covering<'s>(mut spans: impl Iterator<Item = &'s Span>) -> Option<Span> {
    let first = spans.next()?.clone();
    Some(spans.fold(first, |acc, span| cover(&acc, span)))
}

/// A concrete AST node type with a fixed [`NodeKind`].
pub trait AstType: Sized {
    /// The kind every value of this type has.
    const KIND: NodeKind;

    /// Returns the node if `node` is of this type.
    fn cast(node: NodeRef<'_>) -> Option<&Self>;

    /// Views this node as a [`NodeRef`].
    fn as_node(&self) -> NodeRef<'_>;
}

macro_rules! impl_ast_type {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl AstType for $ty {
                const KIND: NodeKind = NodeKind::$ty;

                fn cast(node: NodeRef<'_>) -> Option<&Self> {
                    match node {
                        NodeRef::$ty(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn as_node(&self) -> NodeRef<'_> {
                    NodeRef::$ty(self)
                }
            }

            impl<'a> From<&'a $ty> for NodeRef<'a> {
                fn from(node: &'a $ty) -> Self {
                    NodeRef::$ty(node)
                }
            }
        )+
    };
}

impl_ast_type!(Model, Person, Greeting);
