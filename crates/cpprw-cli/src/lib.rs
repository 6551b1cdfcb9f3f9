//! Command-line front end for the rewriting engine.
//!
//! Reads a JSON document describing a type or name, the bindings to apply and
//! optionally a declaration tree, runs one rewrite and renders the result.
pub mod args;
pub mod document;
pub mod driver;
pub mod tracing_config;
