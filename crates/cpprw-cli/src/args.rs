use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the cpprw binary.
#[derive(Parser, Debug)]
#[command(
    name = "cpprw",
    version,
    about = "Rewrite C++ types and names under template bindings and scope qualification"
)]
pub struct CliArgs {
    /// JSON document holding the type or name to rewrite.
    pub input: PathBuf,

    /// Spell names fully qualified as seen from the document's scope.
    #[arg(long)]
    pub qualify: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The rewritten type or name in C++ syntax.
    #[default]
    Text,
    /// A JSON object with input, output and diagnostics.
    Json,
}
