//! Parser for Rechenbrett spreadsheet documents.
//!
//! The parser consumes the token stream produced by the lexer and always
//! builds a [`Model`], even for broken input: a missing identifier leaves the
//! corresponding property absent, and unexpected tokens are skipped up to the
//! next `person` or `Hello` keyword.

use crate::ast::{Greeting, Model, Person, Reference, Span, Spanned};
use crate::diag::Diag;
use crate::lexer::token::{Token, TokenKind};
use crate::lexer::tokenize;

/// Result of parsing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    /// The document AST, possibly partial.
    pub ast: Model,
    /// Lexer and parser diagnostics, ordered by position.
    pub diagnostics: Vec<Diag>,
}

impl ParseResult {
    /// Returns true if lexing or parsing reported an error.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Lexes and parses `source`.
pub fn parse(source: &str) -> ParseResult {
    let lexed = tokenize(source);
    let mut parser = Parser::new(lexed.tokens, source.len());
    let ast = parser.parse_model();

    let mut diagnostics = lexed.diagnostics;
    diagnostics.extend(parser.diagnostics);
    diagnostics.sort_by_key(|diag| diag.primary_span().start);

    ParseResult { ast, diagnostics }
}

/// Recursive-descent parser over a token vector.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    source_len: usize,
    diagnostics: Vec<Diag>,
}

impl Parser {
    /// Creates a parser over `tokens` lexed from a source of `source_len`
    /// bytes.
    pub fn new(tokens: Vec<Token>, source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            source_len,
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics reported so far.
    pub fn diagnostics(&self) -> &[Diag] {
        &self.diagnostics
    }

    /// `Model: (persons+=Person | greetings+=Greeting)*`
    pub fn parse_model(&mut self) -> Model {
        let mut model = Model::new(0..self.source_len);
        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::Person => {
                    let person = self.parse_person();
                    model.persons.push(person);
                }
                TokenKind::Hello => {
                    let greeting = self.parse_greeting();
                    model.greetings.push(greeting);
                }
                _ => {
                    self.report_unexpected("one of 'person', 'Hello'");
                    self.recover();
                }
            }
        }
        model
    }

    /// `Person: 'person' name=ID`
    fn parse_person(&mut self) -> Person {
        let keyword = self.bump().span.clone();
        let name = self
            .expect_ident()
            .map(|(text, span)| Spanned::new(text, span));
        let end = name.as_ref().map_or(keyword.end, |name| name.span.end);
        Person {
            name,
            span: keyword.start..end,
        }
    }

    /// `Greeting: 'Hello' person=[Person:ID] '!'`
    fn parse_greeting(&mut self) -> Greeting {
        let keyword = self.bump().span.clone();
        let person = self
            .expect_ident()
            .map(|(text, span)| Reference { text, span });
        let mut end = person.as_ref().map_or(keyword.end, |r| r.span.end);

        if self.peek_kind() == Some(TokenKind::Bang) {
            end = self.bump().span.end;
        } else {
            self.report_unexpected("token of type '!'");
        }

        Greeting {
            person,
            span: keyword.start..end,
        }
    }

    fn expect_ident(&mut self) -> Option<(smol_str::SmolStr, Span)> {
        if self.peek_kind() == Some(TokenKind::Ident) {
            let token = self.bump();
            Some((token.text.clone(), token.span.clone()))
        } else {
            self.report_unexpected("token of type 'ID'");
            None
        }
    }

    /// Skips the offending token and everything up to the next rule keyword.
    fn recover(&mut self) {
        let start = self.pos;
        self.pos += 1;
        while let Some(kind) = self.peek_kind() {
            if matches!(kind, TokenKind::Person | TokenKind::Hello) {
                break;
            }
            self.pos += 1;
        }

        let skipped = self.pos - start;
        if let Some(diag) = self.diagnostics.pop() {
            self.diagnostics.push(diag.with_note(format!(
                "skipped {skipped} token(s) up to the next 'person' or 'Hello'"
            )));
        }
    }

    fn report_unexpected(&mut self, expected: &str) {
        let (found, span) = match self.tokens.get(self.pos) {
            Some(token) => (format!("`{}`", token.text), token.span.clone()),
            None => ("end of input".to_string(), self.source_len..self.source_len),
        };
        self.diagnostics.push(
            Diag::error(format!("Expecting {expected} but found {found}."))
                .with_primary_label(span, "unexpected here")
                .with_code("syntax::unexpected_token"),
        );
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|token| token.kind)
    }

    /// Advances past the current token. Callers check `peek_kind` first.
    fn bump(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len().saturating_sub(1));
        self.pos += 1;
        &self.tokens[index]
    }
}
