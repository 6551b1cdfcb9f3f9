//! Runs one rewrite described by a document and renders the result.

use std::path::Path;

use anyhow::{Context, Result, bail};
use cpprw_rewrite::{
    DiagnosticCollector, RewriteDiagnostic, ScopeQualifyingSubstitution, Substitution,
    SubstitutionEnvironment, rewrite_name_with, rewrite_type_with,
};
use cpprw_types::{LookupContext, TypeFormatter, TypeInterner};
use serde::Serialize;
use tracing::{debug, info};

use crate::args::{CliArgs, OutputFormat};
use crate::document::{Document, Lowering, parse_document};

/// Outcome of one rewrite, rendered in C++ syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    pub input: String,
    pub output: String,
    pub diagnostics: Vec<ReportedDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedDiagnostic {
    pub code: u32,
    pub category: &'static str,
    pub message: String,
}

impl From<RewriteDiagnostic> for ReportedDiagnostic {
    fn from(diagnostic: RewriteDiagnostic) -> Self {
        ReportedDiagnostic {
            code: diagnostic.code,
            category: diagnostic.category.as_str(),
            message: diagnostic.message_text,
        }
    }
}

pub fn run(args: &CliArgs) -> Result<RewriteReport> {
    let document = load_document(&args.input)?;
    rewrite_document(&document, args.qualify)
}

pub fn load_document(path: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_document(&text).with_context(|| format!("invalid document {}", path.display()))
}

/// Lower `document` into a fresh interner, rewrite its subject and format
/// both sides. With `qualify`, names are additionally spelled as seen from the
/// document's scope; bindings always take precedence.
pub fn rewrite_document(document: &Document, qualify: bool) -> Result<RewriteReport> {
    let interner = TypeInterner::new();
    let lowering = Lowering::new(&interner);

    let bindings = lowering.lower_bindings(&document.bindings)?;
    let (table, scope) = lowering.lower_declarations(&document.declarations, &document.scope)?;
    let qualifier = ScopeQualifyingSubstitution::new();

    let mut providers: Vec<&dyn Substitution> = Vec::with_capacity(2);
    if qualify {
        providers.push(&qualifier);
    }
    providers.push(&bindings);
    debug!(
        bindings = bindings.len(),
        declarations = table.symbol_count(),
        qualify,
        "lowered document"
    );

    let mut env = SubstitutionEnvironment::with_scope(scope, LookupContext::new(table.clone()));
    let mut sink = DiagnosticCollector::new();
    let formatter = TypeFormatter::new(&interner).with_resolver(table.as_ref());

    let (input, output) = match (&document.ty, &document.name) {
        (Some(ty), None) => {
            let ty = lowering.lower_type(ty)?;
            let rewritten = with_providers(&mut env, &providers, |env| {
                rewrite_type_with(&interner, ty, env, &mut sink)
            });
            (formatter.format(ty), formatter.format(rewritten))
        }
        (None, Some(name)) => {
            let name = lowering.lower_name(name)?;
            let rewritten = with_providers(&mut env, &providers, |env| {
                rewrite_name_with(&interner, name, env, &mut sink)
            });
            (formatter.format_name(name), formatter.format_name(rewritten))
        }
        (Some(_), Some(_)) => bail!("document must contain either `type` or `name`, not both"),
        (None, None) => bail!("document must contain a `type` or a `name`"),
    };

    info!(%input, %output, diagnostics = sink.len(), "rewrote");
    Ok(RewriteReport {
        input,
        output,
        diagnostics: sink.take().into_iter().map(ReportedDiagnostic::from).collect(),
    })
}

/// Enter `providers` in order, so the last one is queried first, and run `f`
/// under them.
fn with_providers<'a, R>(
    env: &mut SubstitutionEnvironment<'a>,
    providers: &[&'a dyn Substitution],
    f: impl FnOnce(&SubstitutionEnvironment<'a>) -> R,
) -> R {
    match providers.split_first() {
        Some((first, rest)) => {
            let mut scope = env.enter(*first);
            with_providers(&mut scope, rest, f)
        }
        None => f(env),
    }
}

pub fn render(report: &RewriteReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.output.clone()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("failed to serialize report")
        }
    }
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
