//! Source spans and spanned values.

use std::ops::Range;

/// A byte range in document text.
pub type Span = Range<usize>;

/// A value paired with the span it was parsed from.
///
/// Scalar properties of AST nodes (a person's `name`, for instance) keep their
/// own span so diagnostics can point at the property instead of the whole node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    /// The wrapped value.
    pub node: T,
    /// Where the value appears in the document.
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Creates a new spanned value.
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Returns the smallest span covering both `a` and `b`.
pub fn cover(a: &Span, b: &Span) -> Span {
    a.start.min(b.start)..a.end.max(b.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanned_keeps_value_and_span() {
        let spanned = Spanned::new("alice", 7..12);
        assert_eq!(spanned.node, "alice");
        assert_eq!(spanned.span, 7..12);
    }

    #[test]
    fn cover_joins_disjoint_spans() {
        assert_eq!(cover(&(4..6), &(10..14)), 4..14);
        assert_eq!(cover(&(10..14), &(4..6)), 4..14);
        assert_eq!(cover(&(3..9), &(4..5)), 3..9);
    }
}
