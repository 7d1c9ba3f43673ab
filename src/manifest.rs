//! # Build Manifest
//!
//! The manifest is the `build.config.json` file listing every deployable
//! project of an environment/repository pair. It lives at
//! `modules/<repo>/<env>/build.config.json` and is a JSON array of records:
//!
//! ```json
//! [
//!   {
//!     "app": "svc-a",
//!     "path": "services/a",
//!     "yaml": "deployment.yaml|worker.yaml",
//!     "version": "1.0.0",
//!     "readytodeploy": 1
//!   }
//! ]
//! ```
//!
//! Loading is strict: a missing file or any decode failure is an error for
//! the whole manifest, never for a single record. A leading UTF-8 byte-order
//! mark is stripped before decoding.
//!
//! A manifest read from disk keeps each record's decoded JSON object next to
//! its typed view. Rewrites go through those objects, so keys keep their
//! original positions and records that were not marked ready are written
//! back exactly as they were decoded.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::defaults;
use crate::error::{Error, Result};

/// Readiness flag of a project record.
///
/// Manifests in the wild carry a boolean, an integer, or something else
/// entirely (`1.0`, `"1"`). The flag is only ever written, so any value is
/// accepted and written back unchanged unless the flag is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Readiness {
    Flag(bool),
    Level(i64),
    Other(Value),
}

impl Readiness {
    /// The value written after a successful build.
    pub fn ready() -> Self {
        Readiness::Level(defaults::READY)
    }
}

/// One deployable project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Application identifier, also used as the image tag.
    pub app: String,
    /// Project directory, relative to the working directory or absolute.
    pub path: String,
    /// Deployment YAML file names separated by `|`.
    pub yaml: String,
    /// Last version built, `None` if never recorded.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_version"
    )]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readytodeploy: Option<Readiness>,
    /// Unknown keys, preserved in their original order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectRecord {
    /// Creates a record with no stored version and no readiness flag.
    pub fn new(app: impl Into<String>, path: impl Into<String>, yaml: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            path: path.into(),
            yaml: yaml.into(),
            version: None,
            readytodeploy: None,
            extra: Map::new(),
        }
    }

    /// The stored version, or the `1.0.0` sentinel when absent.
    pub fn stored_version(&self) -> &str {
        self.version.as_deref().unwrap_or(defaults::DEFAULT_VERSION)
    }

    /// YAML file names, split on `|` and trimmed. Empty segments are dropped.
    pub fn yaml_files(&self) -> Vec<String> {
        self.yaml
            .split('|')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Accepts a version given either as a string or as a bare number.
fn deserialize_version<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected version to be a string or number, found {}",
            other
        ))),
    }
}

/// The ordered list of project records.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    records: Vec<ProjectRecord>,
    /// Decoded JSON object of each record, index-aligned with `records`.
    /// Empty for manifests built in memory.
    sources: Vec<Map<String, Value>>,
}

impl PartialEq for Manifest {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for (index, record) in self.records.iter().enumerate() {
            match self.sources.get(index) {
                Some(source) => seq.serialize_element(source)?,
                None => seq.serialize_element(record)?,
            }
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let sources = Vec::<Map<String, Value>>::deserialize(deserializer)?;
        let records = sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                ProjectRecord::deserialize(Value::Object(source.clone()))
                    .map_err(|e| de::Error::custom(format!("record {}: {}", index + 1, e)))
            })
            .collect::<std::result::Result<Vec<_>, D::Error>>()?;
        Ok(Self { records, sources })
    }
}

impl Manifest {
    pub fn new(records: Vec<ProjectRecord>) -> Self {
        Self {
            records,
            sources: Vec::new(),
        }
    }

    /// Location of the manifest for a repository and environment.
    pub fn path_for(root: &Path, repo: &str, env: &str) -> PathBuf {
        root.join("modules")
            .join(repo)
            .join(env.to_lowercase())
            .join(defaults::MANIFEST_FILE)
    }

    /// Reads and decodes a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }
        read_json_file(path).map_err(|e| Error::ManifestParse {
            path: path.to_path_buf(),
            message: match e {
                Error::Json(json) => json.to_string(),
                other => other.to_string(),
            },
        })
    }

    /// Decodes a manifest from text, tolerating a leading byte-order mark.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(strip_bom(content))?)
    }

    /// Renders the manifest as two-space indented JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rewrites the whole manifest file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write = || -> Result<()> {
            fs::write(path, self.to_json_string()?)?;
            Ok(())
        };
        write().map_err(|e| Error::ManifestWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, app: &str) -> Option<&ProjectRecord> {
        self.records.iter().find(|r| r.app == app)
    }

    /// Records whose identifier is in `projects`, in manifest order.
    ///
    /// An empty `projects` list selects every record.
    pub fn filter(&self, projects: &[String]) -> Vec<ProjectRecord> {
        if projects.is_empty() {
            return self.records.clone();
        }

        let selected: Vec<ProjectRecord> = self
            .records
            .iter()
            .filter(|r| projects.contains(&r.app))
            .cloned()
            .collect();

        if selected.is_empty() {
            warn!(
                "None of the specified projects {:?} found in configuration",
                projects
            );
        }
        selected
    }

    /// Records a successful build: stores `version` and sets the readiness
    /// flag. Returns `false` if no record has identifier `app`.
    ///
    /// Existing `version`/`readytodeploy` keys are replaced in place; missing
    /// ones are appended to the record.
    pub fn mark_ready(&mut self, app: &str, version: &str) -> bool {
        let Some(index) = self.records.iter().position(|r| r.app == app) else {
            return false;
        };

        let record = &mut self.records[index];
        record.version = Some(version.to_string());
        record.readytodeploy = Some(Readiness::ready());

        if let Some(source) = self.sources.get_mut(index) {
            source.insert("version".to_string(), Value::from(version));
            source.insert("readytodeploy".to_string(), Value::from(defaults::READY));
        }
        true
    }
}

/// Removes a leading UTF-8 byte-order mark, if present.
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Reads a JSON file, tolerating a leading byte-order mark.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(strip_bom(&content))?)
}
