//! Default values for deployctl.
//!
//! This module provides centralized constants used across the pipeline,
//! ensuring consistency and avoiding duplication.

/// Container registry that images are tagged for and pushed to.
///
/// Can be overridden with `--registry` or `DEPLOYCTL_REGISTRY`.
pub const REGISTRY: &str = "vmapi/vml-s2";

/// Version assumed for a project record that carries no `version` field.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Value written to `readytodeploy` after a successful gated build.
pub const READY: i64 = 1;

/// File name of the manifest inside `modules/<repo>/<env>/`.
pub const MANIFEST_FILE: &str = "build.config.json";

/// Build script expected in every project directory.
pub const BUILD_SCRIPT: &str = "build.sh";

/// Environments that may carry an `appsettings.<Env>.json` override.
pub const ENV_SETTINGS_OVERRIDES: [&str; 2] = ["staging", "dev"];

/// Runtime image used by the generated Dockerfile on the direct build path.
pub const RUNTIME_IMAGE: &str = "mcr.microsoft.com/dotnet/aspnet:8.0";

/// Field patched in every deployment YAML file.
pub const IMAGE_FIELD: &str = ".spec.template.spec.containers[0].image";

/// Launchers tried, in order, to execute the build script.
///
/// `exec` runs the script directly; anything else is an interpreter prefix.
#[cfg(not(windows))]
pub const LAUNCHERS: &[&str] = &["exec"];

/// Launchers tried, in order, to execute the build script.
///
/// `exec` runs the script directly; anything else is an interpreter prefix.
#[cfg(windows)]
pub const LAUNCHERS: &[&str] = &["bash", "sh", "wsl bash"];

/// Build strategy used when none is configured.
#[cfg(not(windows))]
pub const STRATEGY: &str = "script";

/// Build strategy used when none is configured.
#[cfg(windows)]
pub const STRATEGY: &str = "auto";

/// Returns the default GitOps checkout name for a repository.
///
/// Deployment YAML lives in `<repo>_argocd/<repo>/<env>/base` next to (or
/// inside) the CI checkout.
pub fn gitops_dir(repo: &str) -> String {
    format!("{}_argocd", repo)
}
