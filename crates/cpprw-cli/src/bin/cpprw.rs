use anyhow::Result;
use clap::Parser;

use cpprw_cli::args::{CliArgs, OutputFormat};
use cpprw_cli::driver;
use cpprw_cli::tracing_config::init_tracing;

#[allow(clippy::print_stderr)]
fn main() -> Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let report = driver::run(&args)?;

    if args.format == OutputFormat::Text {
        for diagnostic in &report.diagnostics {
            eprintln!(
                "{} CPPRW{}: {}",
                diagnostic.category, diagnostic.code, diagnostic.message
            );
        }
    }
    println!("{}", driver::render(&report, args.format)?);
    Ok(())
}
