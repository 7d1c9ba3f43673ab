//! # Version Resolution
//!
//! The version a project should be deployed at is declared by the project
//! itself, in its `appsettings.json`:
//!
//! ```json
//! { "Deployment": { "Version": "14.8.125" } }
//! ```
//!
//! For the `staging` and `dev` environments an `appsettings.<Env>.json`
//! override is preferred when it exists. Resolution never fails: anything
//! that prevents reading the field yields `None`, and the caller falls back
//! to the version stored in the manifest.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde_json::Value;

use crate::defaults::ENV_SETTINGS_OVERRIDES;
use crate::manifest::read_json_file;

/// `dev` -> `Dev`, `STAGING` -> `Staging`.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// The settings file to read for `env`.
pub fn settings_path(project_dir: &Path, env: &str) -> PathBuf {
    let default = project_dir.join("appsettings.json");
    let env_lower = env.to_lowercase();
    if ENV_SETTINGS_OVERRIDES.contains(&env_lower.as_str()) {
        let candidate = project_dir.join(format!("appsettings.{}.json", title_case(&env_lower)));
        if candidate.exists() {
            return candidate;
        }
    }
    default
}

/// Extracts `Deployment.Version` from a decoded settings document.
pub fn deployment_version(settings: &Value) -> Option<String> {
    match settings.get("Deployment")?.get("Version")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads the deployment version declared by the project in `project_dir`.
pub fn resolve(project_dir: &Path, env: &str) -> Option<String> {
    let path = settings_path(project_dir, env);
    info!("Reading version from: {}", path.display());

    match read_json_file::<Value>(&path) {
        Ok(settings) => deployment_version(&settings),
        Err(e) => {
            warn!("Failed to read app config {}: {}", path.display(), e);
            None
        }
    }
}
