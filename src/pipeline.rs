//! # Pipeline Orchestration
//!
//! Drives one run from manifest to rollout:
//!
//! 1. Load the manifest for the repository and environment (fatal on error).
//! 2. Restrict it to the requested projects, if any.
//! 3. For each selected project, in manifest order:
//!    - locate the project directory, probing fallbacks;
//!    - resolve the version declared by the project;
//!    - decide whether to build, and build;
//!    - in gated mode, patch the deployment YAML, mark the manifest record
//!      ready, persist the manifest and commit.
//! 4. Summarize the per-project outcomes.
//!
//! A project that fails is recorded and the loop moves on. Only manifest
//! I/O aborts the run.

use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::build::{build_in, should_build, BuildRequest, Builder};
use crate::command::CommandRunner;
use crate::deployment;
use crate::error::Result;
use crate::git;
use crate::manifest::{Manifest, ProjectRecord};
use crate::path::resolve_project_dir;
use crate::settings::Settings;
use crate::version;

/// What happened to one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectStatus {
    Built,
    /// Gated mode and the version did not change.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOutcome {
    pub app: String,
    pub status: ProjectStatus,
}

/// Outcomes of every processed project, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: Vec<ProjectOutcome>,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o.status, ProjectStatus::Failed(_)))
    }

    /// Identifiers of the projects that were built.
    pub fn built(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.status == ProjectStatus::Built)
            .map(|o| o.app.as_str())
            .collect()
    }

    /// Failed projects with their reasons.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                ProjectStatus::Failed(reason) => Some((o.app.as_str(), reason.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }
}

/// One configured run over a working directory.
pub struct Pipeline<'a> {
    root: PathBuf,
    settings: &'a Settings,
    runner: &'a dyn CommandRunner,
    builder: &'a dyn Builder,
}

impl<'a> Pipeline<'a> {
    /// `root` is the directory all relative paths are resolved against.
    pub fn new(
        root: impl Into<PathBuf>,
        settings: &'a Settings,
        runner: &'a dyn CommandRunner,
        builder: &'a dyn Builder,
    ) -> Self {
        Self {
            root: root.into(),
            settings,
            runner,
            builder,
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        Manifest::path_for(&self.root, &self.settings.repo, &self.settings.env)
    }

    /// Executes the run. `Err` means a fatal manifest error.
    pub fn run(&self) -> Result<RunSummary> {
        let manifest_path = self.manifest_path();
        let mut manifest = Manifest::load(&manifest_path)?;
        info!("Successfully loaded config with {} items", manifest.len());
        if manifest.is_empty() {
            warn!("Configuration {} lists no projects", manifest_path.display());
        }

        let selected = manifest.filter(&self.settings.projects);
        if !self.settings.projects.is_empty() {
            info!("Filtered to {} projects to build", selected.len());
        }

        let mut summary = RunSummary::default();
        for (index, record) in selected.iter().enumerate() {
            info!("{}", "#".repeat(80));
            info!("Building item {}: {}", index + 1, record.app);

            let status = self.process(record, &mut manifest, &manifest_path)?;
            summary.outcomes.push(ProjectOutcome {
                app: record.app.clone(),
                status,
            });
        }

        Ok(summary)
    }

    fn process(
        &self,
        record: &ProjectRecord,
        manifest: &mut Manifest,
        manifest_path: &Path,
    ) -> Result<ProjectStatus> {
        let settings = self.settings;
        let image_tag = record.app.as_str();
        let stored_version = record.stored_version();

        let project_dir =
            match resolve_project_dir(&self.root, &settings.repo, image_tag, &record.path) {
                Ok(dir) => dir,
                Err(e) => {
                    error!("Could not find the project directory: {}", e);
                    return Ok(ProjectStatus::Failed(e.to_string()));
                }
            };

        let version = match version::resolve(&project_dir, &settings.env) {
            Some(v) => {
                info!("Found application version: {}", v);
                v
            }
            None => {
                warn!(
                    "{} is missing deployment version config, using {}",
                    image_tag, stored_version
                );
                stored_version.to_string()
            }
        };

        if !should_build(&settings.mode, stored_version, &version) {
            info!("Version {} unchanged - skipping build for {}", version, image_tag);
            return Ok(ProjectStatus::Skipped);
        }
        info!(
            "Version changed from {} to {} - building {} ({} builder)",
            stored_version,
            version,
            image_tag,
            self.builder.name()
        );

        let request = BuildRequest {
            image_tag,
            version: &version,
            mode: &settings.mode,
        };
        match build_in(&project_dir, self.builder, &request) {
            Ok(artifact) => {
                if let Some(image) = &artifact.image {
                    info!("Pushed image {}", image);
                }
            }
            Err(e) => {
                error!("Failed to build {}: {}", image_tag, e);
                return Ok(ProjectStatus::Failed(e.to_string()));
            }
        }

        if !settings.mode.is_gated() {
            info!(
                "{} mode - skipping YAML and config updates for {}",
                settings.mode, image_tag
            );
            return Ok(ProjectStatus::Built);
        }

        if let Err(e) = deployment::update_yaml_files(
            &self.root,
            settings,
            self.runner,
            &record.yaml_files(),
            image_tag,
            &version,
        ) {
            error!("Failed to update YAML files for {}: {}", image_tag, e);
            return Ok(ProjectStatus::Failed(e.to_string()));
        }

        if manifest.mark_ready(image_tag, &version) {
            manifest.save(manifest_path)?;
            info!("Set readytodeploy = 1 for {} version {}", image_tag, version);
        } else {
            warn!(
                "Could not find {} in original configuration, not updating version",
                image_tag
            );
        }

        info!("Committing changes to Git...");
        git::commit_changes(&self.root, settings, manifest, self.runner);

        info!("Successfully processed {}", image_tag);
        Ok(ProjectStatus::Built)
    }
}
