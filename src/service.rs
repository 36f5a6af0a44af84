//! Language service wiring.
//!
//! [`SpreadsheetServices`] owns the validation registry (built once, then
//! shared read-only), the runner, and the document version store. A host
//! language server hands it document text and publishes what comes back;
//! transport is the host's concern.

use std::sync::Arc;

use dashmap::DashMap;
use smol_str::SmolStr;

use crate::ast::Model;
use crate::diag::{Diag, DiagSeverity};
use crate::linker;
use crate::lsp::{LineIndex, to_lsp_diagnostic};
use crate::parser::parse;
use crate::validation::{
    RegistryError, ValidationChecks, ValidationOutcome, ValidationRegistry, ValidationRunner,
};
use crate::validator::{SpreadsheetValidator, register_validation_checks};

/// Configuration for document builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Run validation checks even when lexing or parsing reported errors.
    pub validate_on_syntax_errors: bool,

    /// Resolve greeting references and report unresolved ones.
    pub link_references: bool,

    /// Cap on diagnostics published per document.
    pub max_diagnostics: Option<usize>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            validate_on_syntax_errors: true,
            link_references: true,
            max_diagnostics: None,
        }
    }
}

impl ServiceConfig {
    /// Sets whether documents with syntax errors are still validated.
    pub fn with_validate_on_syntax_errors(mut self, enabled: bool) -> Self {
        self.validate_on_syntax_errors = enabled;
        self
    }

    /// Sets whether greeting references are resolved.
    pub fn with_link_references(mut self, enabled: bool) -> Self {
        self.link_references = enabled;
        self
    }

    /// Caps the number of diagnostics published per document.
    pub fn with_max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = Some(max);
        self
    }
}

/// Latest known version of each open document.
///
/// A validation pass started for an older version than the one recorded
/// here is stale and its result must not be published.
#[derive(Debug, Default)]
pub struct DocumentStore {
    versions: DashMap<String, i32>,
}

impl DocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `version` for `uri`. Returns false if a newer version was
    /// already recorded, which is then kept.
    pub fn update(&self, uri: impl Into<String>, version: i32) -> bool {
        let mut entry = self.versions.entry(uri.into()).or_insert(version);
        if *entry > version {
            return false;
        }
        *entry = version;
        true
    }

    /// Returns false if a newer version than `version` has been recorded.
    pub fn is_current(&self, uri: &str, version: i32) -> bool {
        self.latest(uri).is_none_or(|latest| latest <= version)
    }

    /// Returns the newest version recorded for `uri`.
    pub fn latest(&self, uri: &str) -> Option<i32> {
        self.versions.get(uri).map(|entry| *entry)
    }

    /// Forgets `uri`. Any version is accepted again afterwards.
    pub fn close(&self, uri: &str) {
        self.versions.remove(uri);
    }

    /// Number of documents with a recorded version.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns true if no document has a recorded version.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Everything one document build produced, by phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDiagnostics {
    /// The parsed document, possibly partial.
    pub model: Model,
    /// Lexer and parser errors.
    pub syntax: Vec<Diag>,
    /// Unresolved references.
    pub linking: Vec<Diag>,
    /// Check findings and check faults.
    pub validation: ValidationOutcome,
}

impl DocumentDiagnostics {
    /// All user-facing diagnostics: syntax, then linking, then validation.
    pub fn all(&self) -> Vec<Diag> {
        self.syntax
            .iter()
            .chain(&self.linking)
            .cloned()
            .chain(self.validation.diagnostics.iter().map(Diag::from))
            .collect()
    }

    /// Returns true if any phase reported an error-severity diagnostic.
    pub fn has_errors(&self) -> bool {
        self.all()
            .iter()
            .any(|diag| diag.severity == DiagSeverity::Error)
    }

    /// Converts [`all`](Self::all) diagnostics for publishing, keeping at most `max`.
    pub fn to_lsp(&self, text: &str, max: Option<usize>) -> Vec<lsp_types::Diagnostic> {
        let index = LineIndex::new(text);
        self.all()
            .iter()
            .take(max.unwrap_or(usize::MAX))
            .map(|diag| to_lsp_diagnostic(diag, &index))
            .collect()
    }
}

/// Assembles language services with extra check contributors.
#[derive(Debug, Default)]
pub struct SpreadsheetServicesBuilder {
    config: ServiceConfig,
    contributions: Vec<(SmolStr, ValidationChecks)>,
}

impl SpreadsheetServicesBuilder {
    /// Starts with the default configuration and no contributors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a check set, registered after the built-in checks.
    pub fn contribute(mut self, owner: impl Into<SmolStr>, checks: ValidationChecks) -> Self {
        self.contributions.push((owner.into(), checks));
        self
    }

    /// Builds the registry and freezes it.
    ///
    /// Fails on the first contribution the registry rejects.
    pub fn build(self) -> Result<SpreadsheetServices, RegistryError> {
        let validator = Arc::new(SpreadsheetValidator::new());
        let mut registry = ValidationRegistry::new();
        register_validation_checks(&mut registry, &validator)?;
        for (owner, checks) in self.contributions {
            registry.register(checks, owner)?;
        }
        tracing::info!(
            checks = registry.len(),
            kinds = ?registry.kinds(),
            "spreadsheet language services ready"
        );

        Ok(SpreadsheetServices {
            config: self.config,
            validator,
            runner: ValidationRunner::new(Arc::new(registry)),
            documents: DocumentStore::new(),
        })
    }
}

/// Creates the language services with the built-in checks only.
pub fn create_spreadsheet_services(
    config: ServiceConfig,
) -> Result<SpreadsheetServices, RegistryError> {
    SpreadsheetServicesBuilder::new().config(config).build()
}

/// Language services for Rechenbrett spreadsheet documents.
#[derive(Debug)]
pub struct SpreadsheetServices {
    config: ServiceConfig,
    validator: Arc<SpreadsheetValidator>,
    runner: ValidationRunner,
    documents: DocumentStore,
}

impl SpreadsheetServices {
    /// Starts assembling services with extra contributors.
    pub fn builder() -> SpreadsheetServicesBuilder {
        SpreadsheetServicesBuilder::new()
    }

    /// The configuration documents are built with.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The built-in validator whose checks are registered first.
    pub fn validator(&self) -> &SpreadsheetValidator {
        &self.validator
    }

    /// The frozen registry shared by every pass.
    pub fn registry(&self) -> &ValidationRegistry {
        self.runner.registry()
    }

    /// The runner used by [`build_document`](Self::build_document).
    pub fn runner(&self) -> &ValidationRunner {
        &self.runner
    }

    /// Latest recorded version per document.
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Parses, links, and validates `text`.
    pub fn build_document(&self, text: &str) -> DocumentDiagnostics {
        let parsed = parse(text);
        let model = parsed.ast;

        let linking = if self.config.link_references {
            linker::link(&model)
        } else {
            Vec::new()
        };

        let validation = if parsed.diagnostics.is_empty() || self.config.validate_on_syntax_errors {
            self.runner.validate(&model)
        } else {
            tracing::debug!(
                syntax_errors = parsed.diagnostics.len(),
                "skipping validation of document with syntax errors"
            );
            ValidationOutcome::default()
        };

        DocumentDiagnostics {
            model,
            syntax: parsed.diagnostics,
            linking,
            validation,
        }
    }

    /// Records `version` of `uri`, builds `text`, and returns the diagnostics
    /// to publish.
    ///
    /// Returns `None` if a newer version was recorded before the build
    /// started or while it ran.
    pub fn diagnostics_for(
        &self,
        uri: &str,
        version: i32,
        text: &str,
    ) -> Option<Vec<lsp_types::Diagnostic>> {
        if !self.documents.update(uri, version) {
            tracing::debug!(uri, version, "skipping build of superseded version");
            return None;
        }
        let built = self.build_document(text);
        if !self.documents.is_current(uri, version) {
            tracing::debug!(uri, version, "discarding diagnostics for superseded version");
            return None;
        }
        Some(built.to_lsp(text, self.config.max_diagnostics))
    }
}
