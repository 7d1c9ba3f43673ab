//! Build without a shell: `dotnet publish`, then build, tag and push the
//! container image.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::{BuildArtifact, BuildRequest, Builder};
use crate::command::{CommandRunner, ExternalCommand};
use crate::defaults::RUNTIME_IMAGE;
use crate::error::Result;
use crate::settings::Tools;

/// Dockerfile written next to the published output.
pub fn dockerfile(project_name: &str) -> String {
    format!(
        "FROM {} AS runtime\nWORKDIR /app\nCOPY /app ./\nENTRYPOINT [\"dotnet\", \"{}.dll\"]",
        RUNTIME_IMAGE, project_name
    )
}

/// The first `*.csproj` file in `dir`, in name order.
pub fn find_project_file(dir: &Path) -> Result<Option<PathBuf>> {
    let pattern = format!(
        "{}/*.csproj",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut matches: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    matches.sort();
    Ok(matches.into_iter().next())
}

/// Publishes the project found in the working directory and, outside CI
/// mode, builds and pushes its image.
pub struct DirectBuilder<'a> {
    runner: &'a dyn CommandRunner,
    registry: String,
    dotnet: String,
    docker: String,
}

impl<'a> DirectBuilder<'a> {
    pub fn new(runner: &'a dyn CommandRunner, registry: &str, tools: &Tools) -> Self {
        Self {
            runner,
            registry: registry.to_string(),
            dotnet: tools.dotnet.clone(),
            docker: tools.docker.clone(),
        }
    }

    /// Runs one step; a non-zero exit or spawn failure aborts the build.
    fn step(&self, request: &BuildRequest<'_>, what: &str, cmd: ExternalCommand) -> Result<String> {
        let out = self
            .runner
            .run(&cmd)
            .map_err(|e| request.failure(format!("{} failed: {}", what, e)))?;
        if !out.success {
            return Err(request.failure(format!("{} failed: {}", what, out.output)));
        }
        Ok(out.output)
    }
}

impl Builder for DirectBuilder<'_> {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn build(&self, request: &BuildRequest<'_>) -> Result<BuildArtifact> {
        let cwd = env::current_dir()?;
        let project_path = find_project_file(&cwd)?
            .ok_or_else(|| request.failure("No .csproj file found in the directory"))?;

        let project_file = project_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let project_name = project_path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Project file: {}, Project name: {}", project_file, project_name);

        let release_folder = format!("bin/release/{}", project_name);
        let app_folder = format!("{}/app", release_folder);

        if Path::new(&release_folder).exists() {
            info!("Removing existing release folder: {}", release_folder);
            fs::remove_dir_all(&release_folder)?;
        }
        fs::create_dir_all(&app_folder)?;

        info!("Running dotnet publish...");
        let publish_dir = format!("./{}", app_folder);
        let output = self.step(
            request,
            "Dotnet publish",
            ExternalCommand::new(&self.dotnet).args([
                "publish",
                project_file.as_str(),
                "-c",
                "release",
                "-o",
                publish_dir.as_str(),
            ]),
        )?;

        let has_output = fs::read_dir(&app_folder)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if !has_output {
            return Err(request.failure(format!(
                "Build completed but no output found in {}",
                app_folder
            )));
        }
        info!("Build completed successfully");

        if request.mode.is_publish_only() {
            info!("CI mode - skipping Docker build for {}", request.image_tag);
            return Ok(BuildArtifact {
                image: None,
                output,
            });
        }

        let dockerfile_path = format!("{}/Dockerfile", release_folder);
        fs::write(&dockerfile_path, dockerfile(&project_name))?;
        info!("Created Dockerfile at {}", dockerfile_path);

        let local_tag = format!("{}.{}", request.image_tag.to_lowercase(), request.version);
        let remote_tag = format!("{}:{}", self.registry, local_tag);

        let context = format!("{}/.", release_folder);

        info!("Building Docker image {}...", local_tag);
        self.step(
            request,
            "Docker build",
            ExternalCommand::new(&self.docker).args([
                "build",
                "-f",
                dockerfile_path.as_str(),
                "-t",
                local_tag.as_str(),
                context.as_str(),
            ]),
        )?;
        self.step(
            request,
            "Docker tag",
            ExternalCommand::new(&self.docker).args(["tag", local_tag.as_str(), remote_tag.as_str()]),
        )?;
        let output = self.step(
            request,
            "Docker push",
            ExternalCommand::new(&self.docker).args(["push", remote_tag.as_str()]),
        )?;

        info!("Successfully built and pushed {}", remote_tag);
        Ok(BuildArtifact {
            image: Some(remote_tag),
            output,
        })
    }
}
