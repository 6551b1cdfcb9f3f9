//! Tracing setup for the `cpprw` binary.
//!
//! Output format is chosen by `CPPRW_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented spans and events via `tracing-tree`
//! - `json`: one JSON object per event
//!
//! ```bash
//! CPPRW_LOG=trace CPPRW_LOG_FORMAT=tree cpprw input.json
//! CPPRW_LOG="cpprw_rewrite=trace,cpprw_types=debug" cpprw --qualify input.json
//! ```
//!
//! Nothing is installed unless `CPPRW_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("CPPRW_LOG_FORMAT").unwrap_or_default())
    }
}

/// `CPPRW_LOG` wins over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("CPPRW_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber. All output goes to stderr so stdout only
/// carries the rewrite result.
pub fn init_tracing() {
    let has_cpprw_log = std::env::var("CPPRW_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_cpprw_log && !has_rust_log {
        return;
    }

    let filter = build_filter();

    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
