//! # Run Settings
//!
//! Process-scope values established once from the command line and the
//! environment: which environment and repository to deploy, the build mode,
//! an optional project subset, and where to find the external tools.
//!
//! `Settings` is immutable once constructed and is passed by reference to
//! every stage of the pipeline.

use std::fmt;
use std::str::FromStr;

use crate::defaults;
use crate::error::{Error, Result};

/// Build mode passed as the second positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
    /// `CI`: always build, never touch manifests or version control.
    Ci,
    /// `CICD`: build only when the version changed, then roll out.
    Cicd,
    /// Any other value. Builds unconditionally, like `CI`.
    Other(String),
}

impl BuildMode {
    /// Parses a mode string. Never fails; unknown values are kept verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "CI" => BuildMode::Ci,
            "CICD" => BuildMode::Cicd,
            other => BuildMode::Other(other.to_string()),
        }
    }

    /// The mode exactly as given on the command line.
    pub fn as_str(&self) -> &str {
        match self {
            BuildMode::Ci => "CI",
            BuildMode::Cicd => "CICD",
            BuildMode::Other(raw) => raw,
        }
    }

    /// Whether builds are skipped for unchanged versions and followed by
    /// manifest, YAML and version-control updates.
    pub fn is_gated(&self) -> bool {
        matches!(self, BuildMode::Cicd)
    }

    /// Whether the direct build path stops after publishing.
    ///
    /// Compared case-insensitively, so `ci` also skips container steps.
    pub fn is_publish_only(&self) -> bool {
        self.as_str().eq_ignore_ascii_case("CI")
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a project gets built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStrategy {
    /// Run the project's `build.sh` through the configured launchers.
    Script,
    /// Publish with dotnet and build/tag/push the container directly.
    Direct,
    /// Try the script launchers, falling back to the direct build.
    Auto,
}

impl FromStr for BuildStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "script" => Ok(BuildStrategy::Script),
            "direct" => Ok(BuildStrategy::Direct),
            "auto" => Ok(BuildStrategy::Auto),
            other => Err(Error::InvalidSetting {
                name: "strategy".to_string(),
                message: format!("unknown build strategy '{}' (expected script, direct or auto)", other),
            }),
        }
    }
}

/// One way of executing the build script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// Execute `./build.sh` directly.
    Exec,
    /// Run `build.sh` through an interpreter, e.g. `["wsl", "bash"]`.
    Interpreter(Vec<String>),
}

impl FromStr for Launcher {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let words: Vec<String> = s.split_whitespace().map(str::to_string).collect();
        match words.as_slice() {
            [] => Err(Error::InvalidSetting {
                name: "launcher".to_string(),
                message: "launcher must not be empty".to_string(),
            }),
            [single] if single == "exec" => Ok(Launcher::Exec),
            _ => Ok(Launcher::Interpreter(words)),
        }
    }
}

impl fmt::Display for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Launcher::Exec => f.write_str("exec"),
            Launcher::Interpreter(words) => f.write_str(&words.join(" ")),
        }
    }
}

/// Executables used for each external collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    pub dotnet: String,
    pub docker: String,
    pub yq: String,
    pub git: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            dotnet: "dotnet".to_string(),
            docker: "docker".to_string(),
            yq: "yq".to_string(),
            git: "git".to_string(),
        }
    }
}

/// Everything a run needs to know, fixed for its whole duration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Deployment environment, e.g. `dev` or `prod`.
    pub env: String,
    pub mode: BuildMode,
    /// Repository name, used in manifest and YAML locations.
    pub repo: String,
    /// Application identifiers to restrict processing to. Empty means all.
    pub projects: Vec<String>,
    pub registry: String,
    /// Name of the GitOps checkout holding deployment YAML.
    pub gitops_dir: String,
    pub strategy: BuildStrategy,
    pub launchers: Vec<Launcher>,
    pub tools: Tools,
}

impl Settings {
    /// Creates settings with every optional value at its default.
    pub fn new(env: impl Into<String>, mode: BuildMode, repo: impl Into<String>) -> Self {
        let repo = repo.into();
        Self {
            env: env.into(),
            mode,
            gitops_dir: defaults::gitops_dir(&repo),
            repo,
            projects: Vec::new(),
            registry: defaults::REGISTRY.to_string(),
            strategy: defaults::STRATEGY
                .parse()
                .unwrap_or(BuildStrategy::Script),
            launchers: default_launchers(),
            tools: Tools::default(),
        }
    }

    /// Lower-cased environment name, as used in every path.
    pub fn env_dir(&self) -> String {
        self.env.to_lowercase()
    }
}

/// Parses the platform's default launcher list.
pub fn default_launchers() -> Vec<Launcher> {
    defaults::LAUNCHERS
        .iter()
        .filter_map(|l| l.parse().ok())
        .collect()
}
