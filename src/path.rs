//! Path utilities for deployctl

use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

use log::{info, warn};

use crate::error::{Error, Result};

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. The filesystem is not consulted.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal = matches!(result.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    result.pop();
                } else if !result.has_root() {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

/// Make `path` absolute against `root` and normalize it.
pub fn absolutize(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&root.join(path))
    }
}

/// Strip leading `.` and `..` components from a relative path.
fn strip_leading_relative(path: &Path) -> PathBuf {
    path.components()
        .skip_while(|c| matches!(c, Component::CurDir | Component::ParentDir))
        .collect()
}

/// Alternate locations probed when a configured project path is missing.
pub fn fallback_dirs(root: &Path, repo: &str, configured: &str) -> Vec<PathBuf> {
    let configured = Path::new(configured);
    if configured.is_absolute() {
        return Vec::new();
    }
    let rel = strip_leading_relative(configured);
    vec![
        normalize(&root.join(repo).join(&rel)),
        normalize(&root.join("..").join(repo).join(&rel)),
        normalize(&root.join("modules").join(repo).join(&rel)),
    ]
}

/// Locate a project directory, probing fallback locations when the
/// configured path does not exist.
pub fn resolve_project_dir(root: &Path, repo: &str, app: &str, configured: &str) -> Result<PathBuf> {
    let path = absolutize(root, configured);
    if path.is_dir() {
        return Ok(path);
    }

    warn!("Path {} does not exist", path.display());
    info!("Current working directory: {}", root.display());
    info!("Relative path from config: {}", configured);

    info!("Checking possible paths:");
    for candidate in fallback_dirs(root, repo, configured) {
        let exists = candidate.is_dir();
        info!(
            "  {}: {}",
            candidate.display(),
            if exists { "EXISTS" } else { "NOT FOUND" }
        );
        if exists {
            info!("Found correct path: {}", candidate.display());
            return Ok(candidate);
        }
    }

    Err(Error::ProjectNotFound {
        app: app.to_string(),
        path,
    })
}

/// The first candidate that exists on disk.
pub fn first_existing(candidates: &[PathBuf]) -> Option<&PathBuf> {
    candidates.iter().find(|p| p.exists())
}

/// Changes the process working directory and restores the previous one
/// when dropped.
///
/// ```rust,ignore
/// {
///     let _guard = WorkingDirGuard::enter(&project_dir)?;
///     // relative paths now resolve inside project_dir
/// }
/// // original directory restored here, on every exit path
/// ```
#[derive(Debug)]
pub struct WorkingDirGuard {
    original: PathBuf,
}

impl WorkingDirGuard {
    pub fn enter(dir: &Path) -> io::Result<Self> {
        let original = env::current_dir()?;
        env::set_current_dir(dir)?;
        Ok(Self { original })
    }

    /// The directory that will be restored.
    pub fn original(&self) -> &Path {
        &self.original
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.original) {
            warn!(
                "Failed to restore working directory {}: {}",
                self.original.display(),
                e
            );
        }
    }
}
