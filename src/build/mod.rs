//! # Build Dispatcher
//!
//! Decides whether a project needs building and runs the build.
//!
//! Two implementations of the [`Builder`] trait exist:
//!
//! - [`ScriptBuilder`] runs the project's own `build.sh` through an ordered
//!   list of launchers (direct exec, `bash`, `wsl bash`, ...).
//! - [`DirectBuilder`] publishes a .NET project with `dotnet publish` and
//!   builds, tags and pushes its container image itself.
//!
//! Which one runs is chosen from [`BuildStrategy`] in the run settings; with
//! `auto` the script builder falls back to the direct builder once every
//! launcher has failed.
//!
//! Builders operate on the process working directory. Callers enter the
//! project directory through [`build_in`], which restores the previous
//! directory however the build ends.

mod direct;
mod script;

pub use direct::{dockerfile, find_project_file, DirectBuilder};
pub use script::{fix_line_endings, launcher_command, ScriptBuilder};

use std::path::Path;

use crate::command::CommandRunner;
use crate::error::{Error, Result};
use crate::path::WorkingDirGuard;
use crate::settings::{BuildMode, BuildStrategy, Settings};

/// Parameters handed to a builder for one project.
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    /// Application identifier, used as the image tag.
    pub image_tag: &'a str,
    pub version: &'a str,
    pub mode: &'a BuildMode,
}

impl BuildRequest<'_> {
    /// Builds an `Error::Build` for this request.
    pub fn failure(&self, message: impl Into<String>) -> Error {
        Error::Build {
            image_tag: self.image_tag.to_string(),
            message: message.into(),
        }
    }
}

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    /// Image pushed to the registry, when the builder pushed one itself.
    pub image: Option<String>,
    /// Captured output of the last step.
    pub output: String,
}

/// A way of building a project in the current working directory.
pub trait Builder {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    fn build(&self, request: &BuildRequest<'_>) -> Result<BuildArtifact>;
}

/// Whether a project must be built.
///
/// Gated mode skips projects whose version is unchanged; every other mode
/// builds unconditionally.
pub fn should_build(mode: &BuildMode, stored_version: &str, resolved_version: &str) -> bool {
    !(mode.is_gated() && stored_version == resolved_version)
}

/// Creates the builder selected by the run settings.
pub fn builder_for<'a>(settings: &Settings, runner: &'a dyn CommandRunner) -> Box<dyn Builder + 'a> {
    let direct = || DirectBuilder::new(runner, &settings.registry, &settings.tools);
    match settings.strategy {
        BuildStrategy::Script => Box::new(ScriptBuilder::new(runner, settings.launchers.clone())),
        BuildStrategy::Direct => Box::new(direct()),
        BuildStrategy::Auto => Box::new(
            ScriptBuilder::new(runner, settings.launchers.clone()).with_fallback(direct()),
        ),
    }
}

/// Runs `builder` with `dir` as the working directory.
pub fn build_in(dir: &Path, builder: &dyn Builder, request: &BuildRequest<'_>) -> Result<BuildArtifact> {
    let _guard = WorkingDirGuard::enter(dir).map_err(|e| {
        request.failure(format!("cannot enter {}: {}", dir.display(), e))
    })?;
    builder.build(request)
}
