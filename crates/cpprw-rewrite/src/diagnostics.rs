//! Diagnostics raised while rewriting.
//!
//! Rewriting never fails, but it can pass a type through without rewriting
//! it. Those cases are reported to a [`DiagnosticSink`] supplied by the
//! caller, so tests can assert on them and embedders can route them to their
//! own reporting.

use cpprw_common::diagnostics::{
    DiagnosticCategory, diagnostic_codes, format_message, get_message,
};
use cpprw_types::TypeId;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteDiagnostic {
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The type that was passed through unchanged.
    pub type_id: TypeId,
    /// Shape label of that type (`class`, `namespace`, ...).
    pub shape: &'static str,
    pub message_text: String,
}

impl RewriteDiagnostic {
    pub fn unsupported_shape(type_id: TypeId, shape: &'static str) -> Self {
        let code = diagnostic_codes::REWRITE_NOT_SUPPORTED_FOR_SHAPE;
        let (category, message_text) = match get_message(code) {
            Some(message) => (message.category, format_message(message.message, &[shape])),
            None => (DiagnosticCategory::Warning, format!("unsupported {shape} type")),
        };
        RewriteDiagnostic {
            code,
            category,
            type_id,
            shape,
            message_text,
        }
    }
}

/// Receiver for rewrite diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: RewriteDiagnostic);
}

/// Collects every diagnostic for later inspection.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<RewriteDiagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        DiagnosticCollector {
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[RewriteDiagnostic] {
        &self.diagnostics
    }

    pub fn take(&mut self) -> Vec<RewriteDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&mut self, diagnostic: RewriteDiagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing`. Used by the plain entry points.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: RewriteDiagnostic) {
        warn!(
            code = diagnostic.code,
            shape = diagnostic.shape,
            type_id = diagnostic.type_id.0,
            "{}",
            diagnostic.message_text
        );
    }
}
