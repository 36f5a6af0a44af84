//! Token types for Rechenbrett spreadsheet documents.

use crate::ast::Span;
use logos::Logos;
use smol_str::SmolStr;
use std::fmt;

/// The kind of a lexical token.
///
/// Whitespace and both comment styles are hidden and never produce tokens.
/// `Int` and `Str` exist in the terminal set but no rule accepts them.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum TokenKind {
    #[token("person")]
    Person,
    #[token("Hello")]
    Hello,
    #[token("!")]
    Bang,
    #[regex(r"[_a-zA-Z][\w_]*")]
    Ident,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r#""(\\.|[^"\\])*"|'(\\.|[^'\\])*'"#)]
    Str,
}

impl TokenKind {
    /// Returns how the grammar refers to this token in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Person => "'person'",
            TokenKind::Hello => "'Hello'",
            TokenKind::Bang => "'!'",
            TokenKind::Ident => "ID",
            TokenKind::Int => "INT",
            TokenKind::Str => "STRING",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token with its source text and span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// Byte range in the source.
    pub span: Span,
    /// The matched source text.
    pub text: SmolStr,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, span: Span, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}
