//! # deployctl
//!
//! Builds the projects listed in a deployment manifest and rolls the new
//! images out through GitOps.
//!
//! ## Quick Example
//!
//! ```
//! use deployctl::manifest::Manifest;
//!
//! let manifest = Manifest::parse(r#"[
//!     {"app": "svc-a", "path": "services/a", "yaml": "deployment.yaml", "version": "1.0.0"},
//!     {"app": "svc-b", "path": "services/b", "yaml": "api.yaml|worker.yaml"}
//! ]"#).unwrap();
//!
//! let selected = manifest.filter(&["svc-b".to_string()]);
//! assert_eq!(selected.len(), 1);
//! assert_eq!(selected[0].stored_version(), "1.0.0");
//! assert_eq!(selected[0].yaml_files(), vec!["api.yaml", "worker.yaml"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: the `build.config.json` list of project
//!   records for an environment and repository.
//! - **Settings (`settings`)**: environment, build mode, repository, project
//!   subset and tool locations for one run.
//! - **Builders (`build`)**: the `build.sh` script path and the direct
//!   `dotnet publish` + docker path, behind one `Builder` trait.
//! - **Rollout (`deployment`, `git`)**: patching deployment YAML with `yq`
//!   and committing the result.
//! - **Commands (`command`)**: the `CommandRunner` seam every external tool
//!   goes through.
//!
//! ## Execution Flow
//!
//! `pipeline::Pipeline::run` loads the manifest, filters it, and for each
//! project resolves its directory and version, builds it when needed and,
//! in `CICD` mode, updates the deployment YAML, the manifest and git.

pub mod build;
pub mod command;
pub mod defaults;
pub mod deployment;
pub mod error;
pub mod git;
pub mod manifest;
pub mod output;
pub mod path;
pub mod pipeline;
pub mod settings;
pub mod version;

#[cfg(test)]
mod manifest_proptest;
#[cfg(test)]
mod testutil;
