//! sitecfg CLI - Site configuration checker.
//!
//! Provides commands for:
//! - `check`: Validate the configuration and cross-reference it with content
//! - `render`: Render the navigation of one page as HTML or JSON
//! - `convert`: Rewrite the configuration in another format

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ConvertArgs, RenderArgs};
use output::Output;

/// sitecfg - Static site configuration checker.
#[derive(Parser)]
#[command(name = "sitecfg", version, about)]
struct Cli {
    /// Enable verbose output (show load and scan logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and check links against the content tree.
    Check(CheckArgs),
    /// Render navigation for a page.
    Render(RenderArgs),
    /// Convert the configuration file to another format.
    Convert(ConvertArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Render(args) => args.execute(),
        Commands::Convert(args) => args.execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
