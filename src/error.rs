//! # Error Handling
//!
//! This module defines the centralized error type for `deployctl`. It uses
//! `thiserror` to describe every failure the pipeline can observe, together
//! with enough context (paths, commands, project identifiers) to produce a
//! useful log line.
//!
//! Whether an error is fatal is decided by the caller, not by the variant:
//!
//! - Manifest errors (`ManifestNotFound`, `ManifestParse`, `ManifestWrite`)
//!   abort the whole run.
//! - Project errors (`ProjectNotFound`, `Build`, `DeploymentUpdate`) are
//!   recorded against a single project and the loop continues.
//! - Version-control failures never surface as errors at all; they are logged
//!   as warnings by the committer.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for deployctl operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest file does not exist at the expected location.
    #[error("Configuration file not found at {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// The manifest exists but could not be decoded.
    ///
    /// `message` carries the decoder's description, including line and column.
    #[error("Failed to parse manifest {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    /// The manifest could not be written back to disk.
    #[error("Failed to update manifest {}: {message}", path.display())]
    ManifestWrite { path: PathBuf, message: String },

    /// The project directory could not be located, even after probing the
    /// fallback locations.
    #[error("Project directory for {app} not found: {}", path.display())]
    ProjectNotFound { app: String, path: PathBuf },

    /// An external program could not be started at all.
    #[error("Failed to run {command}: {message}")]
    CommandSpawn { command: String, message: String },

    /// A build step failed for a project.
    #[error("Build failed for {image_tag}: {message}")]
    Build { image_tag: String, message: String },

    /// Patching a deployment YAML file failed.
    #[error("Failed to update yaml file {file}: {message}")]
    DeploymentUpdate { file: String, message: String },

    /// A configuration value supplied on the command line or through the
    /// environment is not usable.
    #[error("Invalid setting {name}: {message}")]
    InvalidSetting { name: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_manifest_not_found() {
        let error = Error::ManifestNotFound {
            path: PathBuf::from("modules/vml/dev/build.config.json"),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration file not found"));
        assert!(display.contains("modules/vml/dev/build.config.json"));
    }

    #[test]
    fn test_error_display_manifest_parse() {
        let error = Error::ManifestParse {
            path: PathBuf::from("build.config.json"),
            message: "EOF while parsing a list at line 3 column 0".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to parse manifest"));
        assert!(display.contains("line 3 column 0"));
    }

    #[test]
    fn test_error_display_project_not_found() {
        let error = Error::ProjectNotFound {
            app: "svc-a".to_string(),
            path: PathBuf::from("/work/p/a"),
        };
        let display = format!("{}", error);
        assert!(display.contains("svc-a"));
        assert!(display.contains("/work/p/a"));
    }

    #[test]
    fn test_error_display_command_spawn() {
        let error = Error::CommandSpawn {
            command: "docker push".to_string(),
            message: "No such file or directory".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to run docker push"));
        assert!(display.contains("No such file or directory"));
    }

    #[test]
    fn test_error_display_build() {
        let error = Error::Build {
            image_tag: "svc-a".to_string(),
            message: "Docker push failed: denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Build failed for svc-a"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_error_display_deployment_update() {
        let error = Error::DeploymentUpdate {
            file: "deployment.yaml".to_string(),
            message: "Error: bad expression".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to update yaml file deployment.yaml"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("[unclosed").unwrap_err();
        let error: Error = json_error.into();
        let display = format!("{}", error);
        assert!(display.contains("JSON error"));
    }

    #[test]
    fn test_error_from_glob_error() {
        let glob_error = glob::Pattern::new("[").unwrap_err();
        let error: Error = glob_error.into();
        assert!(format!("{}", error).contains("Glob pattern error"));
    }
}
