//! PromptForge CLI - LLM prompts for Java files with related-file context.
//!
//! Usage:
//!   promptforge related <file> [--json]     # Related files
//!   promptforge copy <file>                 # File + related files
//!   promptforge explain <file>              # Explain-code prompt
//!   promptforge ask <file> <question>       # Question prompt
//!   promptforge change <file> <request>     # Make-change prompt
//!   promptforge tests <file>                # Unit-test prompt
//!   promptforge stats                       # Index statistics
//!
//! Prompts go to stdout; logs go to stderr (`RUST_LOG`, default `warn`).

use anyhow::Result;
use clap::Parser;
use promptforge::cli::{Cli, Session};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let session = Session::open(&cli.root, cli.config.as_deref())?;
    let output = session.execute(&cli.command)?;
    println!("{}", output.trim_end());
    Ok(())
}
