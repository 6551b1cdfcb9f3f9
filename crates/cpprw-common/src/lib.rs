//! Common types and utilities for the cpprw rewriting engine.
//!
//! This crate provides foundational types used across all cpprw crates:
//! - Identifier interning (`Atom`, `ShardedInterner`)
//! - Inline capacities and other tunables
//! - Diagnostic categories, codes and message templates

// Identifier interning for canonical atoms
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Centralized limits and thresholds
pub mod limits;

// Diagnostic categories and message templates
pub mod diagnostics;
pub use diagnostics::{DiagnosticCategory, DiagnosticMessage};
