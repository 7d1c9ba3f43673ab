//! # fix-line-endings
//!
//! Converts CRLF line endings to LF in place and marks the file executable.
//! Used to repair `build.sh` scripts checked out on Windows.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

/// Convert a script's CRLF line endings to LF and make it executable
#[derive(Parser, Debug)]
#[command(name = "fix-line-endings")]
#[command(version, about, long_about = None)]
struct Args {
    /// File to convert in place
    #[arg(value_name = "PATH")]
    path: PathBuf,
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format_timestamp(None)
        .format_target(false)
        .init();

    if !args.path.is_file() {
        bail!("File not found: {}", args.path.display());
    }
    deployctl::build::fix_line_endings(&args.path)?;
    Ok(())
}
