//! Immutable AST visitor infrastructure.
//!
//! Traversal is pre-order: a node is visited before its children, and
//! children are visited in property-declaration order.

use std::ops::ControlFlow;

use crate::ast::model::{Greeting, Model, Person};
use crate::ast::node::NodeRef;

/// Shared type alias for visitor traversal methods.
pub type VisitResult<B> = ControlFlow<B>;

macro_rules! try_visit {
    ($expr:expr) => {
        match $expr {
            ControlFlow::Continue(()) => {}
            ControlFlow::Break(b) => return ControlFlow::Break(b),
        }
    };
}

/// Read-only traversal over a document.
///
/// Override `visit_node` to see every node, or the per-kind methods to see
/// one kind; call the matching `walk_*` function to keep descending.
pub trait Visit<'ast> {
    /// Early-exit payload produced when traversal stops.
    type Break;

    /// Entry point for every node; override to observe nodes of any kind.
    fn visit_node(&mut self, node: NodeRef<'ast>) -> VisitResult<Self::Break> {
        walk_node(self, node)
    }

    fn visit_model(&mut self, model: &'ast Model) -> VisitResult<Self::Break> {
        walk_model(self, model)
    }

    fn visit_person(&mut self, _person: &'ast Person) -> VisitResult<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_greeting(&mut self, _greeting: &'ast Greeting) -> VisitResult<Self::Break> {
        ControlFlow::Continue(())
    }
}

/// Dispatches `node` to the visitor method for its kind.
pub fn walk_node<'ast, V: Visit<'ast> + ?Sized>(
    visitor: &mut V,
    node: NodeRef<'ast>,
) -> VisitResult<V::Break> {
    match node {
        NodeRef::Model(model) => visitor.visit_model(model),
        NodeRef::Person(person) => visitor.visit_person(person),
        NodeRef::Greeting(greeting) => visitor.visit_greeting(greeting),
    }
}

/// Visits the children of `model`: every person, then every greeting.
pub fn walk_model<'ast, V: Visit<'ast> + ?Sized>(
    visitor: &mut V,
    model: &'ast Model,
) -> VisitResult<V::Break> {
    for person in &model.persons {
        try_visit!(visitor.visit_node(NodeRef::Person(person)));
    }
    for greeting in &model.greetings {
        try_visit!(visitor.visit_node(NodeRef::Greeting(greeting)));
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use super::*;
    use crate::ast::NodeKind;

    fn document() -> Model {
        Model {
            persons: vec![Person::new("Alice", 7..12, 0..12), Person::new("Bob", 20..23, 13..23)],
            greetings: vec![Greeting::new("Bob", 30..33, 24..34)],
            span: 0..34,
        }
    }

    /// Records the kind of every visited node.
    struct Kinds(Vec<NodeKind>);

    impl<'ast> Visit<'ast> for Kinds {
        type Break = std::convert::Infallible;

        fn visit_node(&mut self, node: NodeRef<'ast>) -> VisitResult<Self::Break> {
            self.0.push(node.kind());
            walk_node(self, node)
        }
    }

    fn kinds(root: NodeRef<'_>) -> Vec<NodeKind> {
        let mut visitor = Kinds(Vec::new());
        let _ = visitor.visit_node(root);
        visitor.0
    }

    #[test]
    fn parent_is_visited_before_children() {
        let model = document();
        let kinds = kinds(NodeRef::from(&model));
        assert_eq!(
            kinds,
            vec![NodeKind::Model, NodeKind::Person, NodeKind::Person, NodeKind::Greeting]
        );
    }

    #[test]
    fn break_stops_the_walk() {
        struct FirstPerson<'ast>(Option<&'ast Person>);

        impl<'ast> Visit<'ast> for FirstPerson<'ast> {
            type Break = &'ast Person;

            fn visit_person(&mut self, person: &'ast Person) -> VisitResult<Self::Break> {
                ControlFlow::Break(person)
            }
        }

        let model = document();
        let mut visitor = FirstPerson(None);
        match visitor.visit_model(&model) {
            ControlFlow::Break(person) => visitor.0 = Some(person),
            ControlFlow::Continue(()) => {}
        }
        assert_eq!(visitor.0.and_then(Person::name_str), Some("Alice"));
    }

    #[test]
    fn leaf_has_no_children() {
        let person = Person::new("Alice", 7..12, 0..12);
        assert_eq!(kinds(NodeRef::from(&person)), vec![NodeKind::Person]);
    }
}
