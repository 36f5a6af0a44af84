//! Lexical analysis for Rechenbrett spreadsheet documents.
//!
//! Tokenization is driven by the [`logos`]-derived [`TokenKind`]. The lexer
//! keeps going after an unrecognized character so that every problem in the
//! document is reported at once.

pub mod token;

use logos::Logos;

use crate::ast::Span;
use crate::diag::Diag;
use token::{Token, TokenKind};

/// Result of lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// Recognized tokens, in source order.
    pub tokens: Vec<Token>,
    /// One error per run of unrecognized characters.
    pub diagnostics: Vec<Diag>,
}

/// Tokenizes `source`.
pub fn tokenize(source: &str) -> LexerResult {
    let mut tokens = Vec::new();
    let mut diagnostics: Vec<Diag> = Vec::new();
    for (result, span) in TokenKind::lexer(source).spanned() {
        match result {
            Ok(kind) => {
                let text = &source[span.clone()];
                tokens.push(Token::new(kind, span, text));
            }
            Err(()) => {
                // Adjacent bad characters are reported as one run.
                if let Some(last) = diagnostics.last_mut() {
                    if let Some(label) = last.labels.first_mut() {
                        if label.span.end == span.start {
                            label.span.end = span.end;
                            last.message = unexpected_message(source, &label.span);
                            continue;
                        }
                    }
                }
                diagnostics.push(
                    Diag::error(unexpected_message(source, &span))
                        .with_primary_label(span, "not part of any token")
                        .with_code("syntax::unexpected_character"),
                );
            }
        }
    }

    LexerResult {
        tokens,
        diagnostics,
    }
}

fn unexpected_message(source: &str, span: &Span) -> String {
    let text = source.get(span.clone()).unwrap_or_default();
    format!("unexpected character(s) `{text}`")
}
