//! Conversion of diagnostics into Language Server Protocol values.
//!
//! Spans are byte offsets; LSP positions are zero-based lines and UTF-16
//! code-unit columns. [`LineIndex`] does the translation.

use lsp_types::{DiagnosticSeverity, NumberOrString, Position, Range};

use crate::ast::Span;
use crate::diag::{Diag, DiagSeverity};

/// `source` field of every diagnostic this crate publishes.
pub const DIAGNOSTIC_SOURCE: &str = "rechenbrett-spreadsheet";

/// Line start offsets of a document, for offset to position conversion.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Indexes the line starts of `text`.
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(at, _)| at + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Converts a byte offset to a position.
    ///
    /// Offsets past the end clamp to the end; offsets inside a multi-byte
    /// character snap to its start.
    pub fn position(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let character = self.text[self.line_starts[line]..offset]
            .encode_utf16()
            .count();
        Position::new(line as u32, character as u32)
    }

    /// Converts a byte span to a range.
    pub fn range(&self, span: &Span) -> Range {
        Range::new(self.position(span.start), self.position(span.end))
    }
}

/// Maps a diagnostic severity to its LSP counterpart.
pub fn to_lsp_severity(severity: DiagSeverity) -> DiagnosticSeverity {
    match severity {
        DiagSeverity::Error => DiagnosticSeverity::ERROR,
        DiagSeverity::Warning => DiagnosticSeverity::WARNING,
        DiagSeverity::Info => DiagnosticSeverity::INFORMATION,
        DiagSeverity::Hint => DiagnosticSeverity::HINT,
    }
}

/// Converts a diagnostic, reporting it at its primary label.
pub fn to_lsp_diagnostic(diag: &Diag, index: &LineIndex<'_>) -> lsp_types::Diagnostic {
    lsp_types::Diagnostic::new(
        index.range(&diag.primary_span()),
        Some(to_lsp_severity(diag.severity)),
        diag.code.clone().map(NumberOrString::String),
        Some(DIAGNOSTIC_SOURCE.to_string()),
        diag.message.clone(),
        None,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_on_first_and_later_lines() {
        let index = LineIndex::new("person Alice\nHello Alice!\n");
        assert_eq!(index.position(0), Position::new(0, 0));
        assert_eq!(index.position(7), Position::new(0, 7));
        assert_eq!(index.position(12), Position::new(0, 12));
        assert_eq!(index.position(13), Position::new(1, 0));
        assert_eq!(index.position(19), Position::new(1, 6));
        assert_eq!(index.position(26), Position::new(2, 0));
    }

    #[test]
    fn columns_count_utf16_code_units() {
        // 'ö' is two bytes and one UTF-16 unit; '𝔸' is four bytes and two units.
        let index = LineIndex::new("person Jörg𝔸 x");
        assert_eq!(index.position(10), Position::new(0, 9));
        assert_eq!(index.position(9), Position::new(0, 8));
        assert_eq!(index.position(12), Position::new(0, 11));
        assert_eq!(index.position(16), Position::new(0, 13));
    }

    #[test]
    fn offsets_are_clamped_and_snapped() {
        let index = LineIndex::new("Jö");
        assert_eq!(index.position(100), Position::new(0, 2));
        assert_eq!(index.position(2), Position::new(0, 1));
    }

    #[test]
    fn converts_severity_code_and_range() {
        let text = "person Alice\nperson bob";
        let index = LineIndex::new(text);
        let diag = Diag::warning("Person name should start with a capital.")
            .with_primary_label(20..23, "in `name`")
            .with_code("style::capital");

        let converted = to_lsp_diagnostic(&diag, &index);
        assert_eq!(
            converted.range,
            Range::new(Position::new(1, 7), Position::new(1, 10))
        );
        assert_eq!(converted.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(
            converted.code,
            Some(NumberOrString::String("style::capital".into()))
        );
        assert_eq!(converted.source.as_deref(), Some(DIAGNOSTIC_SOURCE));
        assert_eq!(converted.message, "Person name should start with a capital.");
    }

    #[test]
    fn severity_mapping() {
        assert_eq!(to_lsp_severity(DiagSeverity::Error), DiagnosticSeverity::ERROR);
        assert_eq!(to_lsp_severity(DiagSeverity::Info), DiagnosticSeverity::INFORMATION);
        assert_eq!(to_lsp_severity(DiagSeverity::Hint), DiagnosticSeverity::HINT);
    }
}
