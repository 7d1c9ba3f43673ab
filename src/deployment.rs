//! # Deployment YAML Updates
//!
//! After a successful gated build, each deployment YAML file listed for the
//! project is pointed at the new image. Files are looked up in a fixed list
//! of GitOps locations relative to the working directory; the first match
//! wins. The patch itself is delegated to `yq`, which rewrites
//! `.spec.template.spec.containers[0].image` in place.
//!
//! A file found in none of the locations is only a warning. A `yq` failure
//! on a file that was found fails the project.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::command::{CommandRunner, ExternalCommand};
use crate::defaults::IMAGE_FIELD;
use crate::error::{Error, Result};
use crate::path::{first_existing, normalize};
use crate::settings::Settings;

/// Directories searched for deployment YAML, in priority order.
pub fn candidate_dirs(root: &Path, settings: &Settings) -> Vec<PathBuf> {
    let env = settings.env_dir();
    let repo = settings.repo.as_str();
    let gitops = settings.gitops_dir.as_str();
    [
        root.join("..").join(gitops).join(repo),
        root.join("modules").join(repo),
        root.join(gitops).join(repo),
        root.join("..").join(repo),
    ]
    .iter()
    .map(|base| normalize(&base.join(&env).join("base")))
    .collect()
}

/// `<registry>:<image_tag>.<version>`
pub fn image_reference(registry: &str, image_tag: &str, version: &str) -> String {
    format!("{}:{}.{}", registry, image_tag, version)
}

/// The `yq` invocation that sets the container image in `file`.
pub fn patch_command(yq: &str, file: &Path, image: &str) -> ExternalCommand {
    ExternalCommand::new(yq)
        .arg("-i")
        .arg(format!("{} = \"{}\"", IMAGE_FIELD, image))
        .arg(file.to_string_lossy())
}

/// Points every deployment file in `yaml_files` at the freshly built image.
pub fn update_yaml_files(
    root: &Path,
    settings: &Settings,
    runner: &dyn CommandRunner,
    yaml_files: &[String],
    image_tag: &str,
    version: &str,
) -> Result<()> {
    let dirs = candidate_dirs(root, settings);
    let image = image_reference(&settings.registry, image_tag, version);

    for yaml_file in yaml_files {
        let yaml_file = yaml_file.trim();
        let candidates: Vec<PathBuf> = dirs.iter().map(|d| d.join(yaml_file)).collect();

        let Some(yaml_path) = first_existing(&candidates) else {
            warn!("YAML file {} not found in any of these locations:", yaml_file);
            for candidate in &candidates {
                warn!("  {}", candidate.display());
            }
            continue;
        };

        info!("Updating {} with image: {}", yaml_path.display(), image);
        let cmd = patch_command(&settings.tools.yq, yaml_path, &image).current_dir(root);
        let out = runner.run(&cmd).map_err(|e| Error::DeploymentUpdate {
            file: yaml_file.to_string(),
            message: e.to_string(),
        })?;
        if !out.success {
            return Err(Error::DeploymentUpdate {
                file: yaml_file.to_string(),
                message: out.output,
            });
        }
    }

    Ok(())
}
