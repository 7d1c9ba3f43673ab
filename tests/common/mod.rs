//! Shared test utilities for E2E tests.
//!
//! This module provides a fixture that lays out a CI checkout the way
//! `deployctl` expects it, plus helpers to run the binaries inside it.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest(manifests::SINGLE);
//!     fixture.command().args(["dev", "CI", "vml"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    #[allow(unused_imports)]
    pub use super::{FAILING_SCRIPT, PASSING_SCRIPT};
    pub use super::TestFixture;
}

/// Common manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// One project whose stored version is 1.0.0.
    pub const SINGLE: &str = r#"[
  {"app": "svc-a", "path": "p/a", "yaml": "d.yaml", "version": "1.0.0"}
]"#;

    /// Two projects sharing one deployment file.
    pub const TWO: &str = r#"[
  {"app": "svc-a", "path": "p/a", "yaml": "d.yaml", "version": "1.0.0"},
  {"app": "svc-b", "path": "p/b", "yaml": "d.yaml", "version": "2.0.0"}
]"#;

    /// Not JSON at all.
    pub const MALFORMED: &str = "{ this is not a manifest";
}

/// Build script that succeeds without doing anything.
#[allow(dead_code)]
pub const PASSING_SCRIPT: &str = "#!/bin/sh\r\nexit 0\r\n";

/// Build script that always fails.
#[allow(dead_code)]
pub const FAILING_SCRIPT: &str = "#!/bin/sh\necho 'compilation failed' >&2\nexit 3\n";

/// A temporary CI checkout for repository `vml`, environment `dev`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `modules/vml/dev/build.config.json` and a `base/d.yaml` next to it.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("modules/vml/dev/build.config.json")
            .write_str(content)
            .expect("Failed to write manifest");
        self.temp_dir
            .child("modules/vml/dev/base/d.yaml")
            .write_str("kind: Deployment\n")
            .expect("Failed to write deployment file");
        self
    }

    /// Create a project directory with an appsettings version and build script.
    pub fn with_project(self, path: &str, version: &str, script: &str) -> Self {
        self.temp_dir
            .child(format!("{}/appsettings.json", path))
            .write_str(&format!(r#"{{"Deployment": {{"Version": "{}"}}}}"#, version))
            .expect("Failed to write appsettings");
        self.temp_dir
            .child(format!("{}/build.sh", path))
            .write_str(script)
            .expect("Failed to write build script");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir.path().join("modules/vml/dev/build.config.json")
    }

    /// Parse the manifest as it is on disk now.
    pub fn manifest_json(&self) -> serde_json::Value {
        let content =
            std::fs::read_to_string(self.manifest_path()).expect("Failed to read manifest");
        serde_json::from_str(&content).expect("Manifest is not valid JSON")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a `deployctl` command running in this fixture's directory.
    ///
    /// yq and git are replaced with `true` so rollout steps succeed without
    /// either tool or a git checkout.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("deployctl");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .env("DEPLOYCTL_YQ", "true")
            .env("DEPLOYCTL_GIT", "true")
            .env("DEPLOYCTL_STRATEGY", "script")
            .env("DEPLOYCTL_LAUNCHERS", "exec");
        cmd
    }

    /// Create a `fix-line-endings` command running in this fixture's directory.
    pub fn fix_line_endings(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fix-line-endings");
        cmd.current_dir(self.path());
        cmd
    }
}
