//! Cross-reference resolution.
//!
//! A greeting names the person it greets; the name must match a person
//! declared in the same document. Resolution runs as its own phase before
//! validation so that checks stay node-local.

use crate::ast::{Model, Person, Reference, Spanned};
use smol_str::SmolStr;
use crate::diag::Diag;

/// Resolves a reference against the persons of `model`.
pub fn resolve<'a>(model: &'a Model, reference: &Reference) -> Option<&'a Person> {
    model.person_named(&reference.text)
}

/// Links every reference in `model` and reports the ones that do not resolve.
pub fn link(model: &Model) -> Vec<Diag> {
    let mut diagnostics = Vec::new();
    for greeting in &model.greetings {
        // A missing reference was already reported by the parser.
        let Some(reference) = &greeting.person else {
            continue;
        };
        if resolve(model, reference).is_none() {
            diagnostics.push(unresolved_reference(model, reference));
        }
    }
    tracing::trace!(
        greetings = model.greetings.len(),
        unresolved = diagnostics.len(),
        "linked document"
    );
    diagnostics
}

fn unresolved_reference(model: &Model, reference: &Reference) -> Diag {
    let diag = Diag::error(format!(
        "Could not resolve reference to Person named '{}'.",
        reference.text
    ))
    .with_primary_label(reference.span.clone(), "unresolved reference")
    .with_code("linking::unresolved_reference");

    match name_differing_in_case(model, &reference.text) {
        Some(name) => diag
            .with_secondary_label(name.span.clone(), format!("`{}` is declared here", name.node))
            .with_help("person names are case-sensitive"),
        None => diag.with_help(format!("declare it with `person {}`", reference.text)),
    }
}

/// First declared name equal to `text` up to ASCII case.
fn name_differing_in_case<'a>(model: &'a Model, text: &str) -> Option<&'a Spanned<SmolStr>> {
    model
        .persons
        .iter()
        .filter_map(|person| person.name.as_ref())
        .find(|name| name.node.eq_ignore_ascii_case(text))
}
