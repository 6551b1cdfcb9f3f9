//! Diagnostic categories, codes and message templates.
//!
//! The rewriting engine reports a small, fixed set of conditions. Messages are
//! stored as templates with `{0}`-style placeholders and rendered lazily by
//! [`format_message`].

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl DiagnosticCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    /// A declaration-like type (class, namespace, enum, Objective-C construct)
    /// was passed through without structural rewriting.
    pub const REWRITE_NOT_SUPPORTED_FOR_SHAPE: u32 = 9001;
}

pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[DiagnosticMessage {
    code: diagnostic_codes::REWRITE_NOT_SUPPORTED_FOR_SHAPE,
    category: DiagnosticCategory::Warning,
    message: "Rewriting is not supported for {0} types; the type was returned unchanged.",
}];

pub fn get_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_message(code).map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
