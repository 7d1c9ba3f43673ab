//! # External Commands
//!
//! Every collaborator of the pipeline (build script, dotnet, docker, yq,
//! git) is driven through its command line. This module provides the seam
//! between the pipeline and those processes:
//!
//! - **`ExternalCommand`**: a program, its arguments and an optional working
//!   directory, built up before anything is executed so it can be logged or
//!   inspected in tests.
//! - **`CommandOutput`**: the result of a finished process. A non-zero exit is
//!   not an error at this level; callers decide whether it is fatal.
//! - **`CommandRunner`**: the trait used to execute commands. `SystemRunner`
//!   spawns real processes; tests substitute a recording implementation.
//!
//! Execution is blocking and has no timeout.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;

use crate::error::{Error, Result};

/// A command line to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Directory to run in. `None` inherits the process working directory.
    pub current_dir: Option<PathBuf>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Standard output on success, standard error on failure.
    pub output: String,
}

impl CommandOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// Trait for running external commands - allows mocking in tests
pub trait CommandRunner: Send + Sync {
    /// Runs `command` to completion.
    ///
    /// Returns `Err` only if the process could not be started.
    fn run(&self, command: &ExternalCommand) -> Result<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ExternalCommand) -> Result<CommandOutput> {
        info!("Running command: {}", command);

        let mut process = Command::new(&command.program);
        process.args(&command.args);
        if let Some(dir) = &command.current_dir {
            process.current_dir(dir);
        }

        let output = process.output().map_err(|e| Error::CommandSpawn {
            command: command.to_string(),
            message: e.to_string(),
        })?;

        if output.status.success() {
            Ok(CommandOutput::success(String::from_utf8_lossy(&output.stdout)))
        } else {
            Ok(CommandOutput::failure(String::from_utf8_lossy(&output.stderr)))
        }
    }
}
