//! # Version Control
//!
//! Commits the rewritten manifest and deployment YAML and pushes them.
//!
//! Every git invocation is best-effort: a failure is logged as a warning and
//! the next command still runs. Committing therefore never fails a project.

use std::path::Path;

use log::{info, warn};

use crate::command::{CommandRunner, ExternalCommand};
use crate::defaults::MANIFEST_FILE;
use crate::manifest::Manifest;
use crate::settings::Settings;

/// `Update <REPO> <env> deployments: app::version app::version ...`
pub fn commit_message(settings: &Settings, manifest: &Manifest) -> String {
    let entries: Vec<String> = manifest
        .records()
        .iter()
        .map(|r| format!("{}::{}", r.app, r.stored_version()))
        .collect();
    format!(
        "Update {} {} deployments: {}",
        settings.repo.to_uppercase(),
        settings.env,
        entries.join(" ")
    )
}

/// Manifest locations that may need staging, relative to the root.
fn manifest_candidates(settings: &Settings) -> Vec<String> {
    let env = settings.env_dir();
    let repo = &settings.repo;
    vec![
        format!("modules/{}/{}/{}", repo, env, MANIFEST_FILE),
        format!("{}_ci/modules/{}/{}/{}", repo, repo, env, MANIFEST_FILE),
    ]
}

/// Deployment YAML directories that may need staging, relative to the root.
fn yaml_dir_candidates(settings: &Settings) -> Vec<String> {
    let env = settings.env_dir();
    let repo = &settings.repo;
    let gitops = &settings.gitops_dir;
    vec![
        format!("../{}/{}/{}/base/", gitops, repo, env),
        format!("{}/{}/{}/base/", gitops, repo, env),
        format!("../{}/{}/base/", repo, env),
    ]
}

/// The git commands that stage, commit and push the rollout.
///
/// Only locations that exist under `root` are staged; YAML directories are
/// staged with a `*.yaml` pathspec.
pub fn plan_commands(root: &Path, settings: &Settings, manifest: &Manifest) -> Vec<ExternalCommand> {
    let git = |args: Vec<String>| {
        ExternalCommand::new(&settings.tools.git)
            .args(args)
            .current_dir(root)
    };

    let config_paths: Vec<String> = manifest_candidates(settings)
        .into_iter()
        .filter(|p| root.join(p).exists())
        .collect();
    let yaml_paths: Vec<String> = yaml_dir_candidates(settings)
        .into_iter()
        .filter(|d| root.join(d).exists())
        .map(|d| format!("{}*.yaml", d))
        .collect();

    if config_paths.is_empty() {
        warn!("No config file found to commit");
    }
    if yaml_paths.is_empty() {
        warn!("No YAML directory found to commit");
    }

    let mut commands: Vec<ExternalCommand> = config_paths
        .into_iter()
        .chain(yaml_paths)
        .map(|path| git(vec!["add".to_string(), path]))
        .collect();
    commands.push(git(vec![
        "commit".to_string(),
        "-m".to_string(),
        commit_message(settings, manifest),
    ]));
    commands.push(git(vec!["push".to_string()]));
    commands
}

/// Stages, commits and pushes. Failures are downgraded to warnings.
///
/// Always returns `true`.
pub fn commit_changes(
    root: &Path,
    settings: &Settings,
    manifest: &Manifest,
    runner: &dyn CommandRunner,
) -> bool {
    let commands = plan_commands(root, settings, manifest);

    info!("Git operations to perform:");
    for cmd in &commands {
        info!("  {}", cmd);
    }

    for cmd in &commands {
        match runner.run(cmd) {
            Ok(out) if out.success => {}
            Ok(out) => {
                warn!("Git operation failed: {}", out.output);
                warn!("Git command failed: {}", cmd);
            }
            Err(e) => {
                warn!("Git operation failed: {}", e);
                warn!("Git command failed: {}", cmd);
            }
        }
    }
    true
}
