//! Test doubles shared by the unit tests.

use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::build::{BuildArtifact, BuildRequest, Builder};
use crate::command::{CommandOutput, CommandRunner, ExternalCommand};
use crate::error::Result;

type Responder = Box<dyn Fn(&ExternalCommand) -> Result<CommandOutput> + Send + Sync>;

/// A `CommandRunner` that records every command and answers through a
/// closure instead of spawning processes.
pub struct RecordingRunner {
    calls: Mutex<Vec<ExternalCommand>>,
    responder: Responder,
}

impl RecordingRunner {
    /// Every command succeeds with empty output.
    pub fn succeeding() -> Self {
        Self::with(|_| Ok(CommandOutput::success("")))
    }

    pub fn with<F>(responder: F) -> Self
    where
        F: Fn(&ExternalCommand) -> Result<CommandOutput> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    pub fn calls(&self) -> Vec<ExternalCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded commands rendered as command lines.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &ExternalCommand) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(command.clone());
        (self.responder)(command)
    }
}

/// One recorded `Builder::build` invocation.
#[derive(Debug, Clone)]
pub struct BuildCall {
    pub image_tag: String,
    pub version: String,
    pub mode: String,
    /// Working directory at the time of the call.
    pub dir: PathBuf,
}

/// A `Builder` that records its invocations and fails for chosen projects.
#[derive(Default)]
pub struct CountingBuilder {
    calls: Mutex<Vec<BuildCall>>,
    fail_for: Vec<String>,
}

impl CountingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(apps: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_for: apps.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<BuildCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Image tags built, in call order.
    pub fn built_tags(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.image_tag).collect()
    }
}

impl Builder for CountingBuilder {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn build(&self, request: &BuildRequest<'_>) -> Result<BuildArtifact> {
        self.calls.lock().unwrap().push(BuildCall {
            image_tag: request.image_tag.to_string(),
            version: request.version.to_string(),
            mode: request.mode.to_string(),
            dir: env::current_dir()?,
        });

        if self.fail_for.iter().any(|a| a == request.image_tag) {
            return Err(request.failure("simulated build failure"));
        }
        Ok(BuildArtifact {
            image: None,
            output: String::new(),
        })
    }
}
