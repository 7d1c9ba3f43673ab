//! # deployctl CLI
//!
//! This is the binary entry point for the `deployctl` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the deployment pipeline for the parsed arguments.
//! - Translating failures into exit codes: any usage error, fatal manifest
//!   error or failed project exits with status 1.
//!
//! The pipeline itself lives in the `deployctl` library crate; the binary is a
//! thin wrapper around it.

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version go to stdout and exit 0.
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    cli.execute()
}
