//! Project manifest (`package.json`) handling.
//!
//! The manifest is kept as an ordered JSON object rather than a typed struct:
//! templates may contribute arbitrary keys (scripts, workspaces, tooling
//! configuration) and all of them must survive the merge untouched.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::resolver::PackageReference;

/// File name of a package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Version written into every freshly created project.
pub const INITIAL_VERSION: &str = "0.1.0";

/// Manifest keys that are never copied from a template into the project.
pub const MERGE_BLACKLIST: &[&str] = &[
    "name",
    "version",
    "description",
    "keywords",
    "bugs",
    "license",
    "author",
    "contributors",
    "files",
    "browser",
    "bin",
    "man",
    "directories",
    "repository",
    "bundledDependencies",
    "optionalDependencies",
    "engineStrict",
    "os",
    "cpu",
    "preferGlobal",
    "private",
    "publishConfig",
];

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Returns true if `key` is excluded from template merges.
pub fn is_blacklisted(key: &str) -> bool {
    MERGE_BLACKLIST.contains(&key)
}

/// A package manifest as an ordered key/value document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectManifest {
    fields: Map<String, Value>,
}

impl ProjectManifest {
    /// Create the minimal manifest for a new project.
    pub fn new(app_name: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(app_name.to_string()));
        fields.insert(
            "version".to_string(),
            Value::String(INITIAL_VERSION.to_string()),
        );
        fields.insert("private".to_string(), Value::Bool(true));
        Self { fields }
    }

    /// Wrap an existing JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Load a manifest from disk.
    pub fn load(path: &Path) -> TemplateResult<Self> {
        if !path.exists() {
            return Err(TemplateError::ManifestNotFound(path.to_path_buf()));
        }

        debug!("Loading manifest from {:?}", path);
        let content = fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(TemplateError::InvalidManifest {
                path: path.to_path_buf(),
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Load the manifest stored in `dir/package.json`.
    pub fn load_from_dir(dir: &Path) -> TemplateResult<Self> {
        Self::load(&dir.join(MANIFEST_FILE))
    }

    /// Render the manifest: 2-space indentation with a trailing line ending.
    pub fn to_pretty_string(&self) -> TemplateResult<String> {
        let mut rendered = serde_json::to_string_pretty(&self.fields)?;
        rendered.push_str(LINE_ENDING);
        Ok(rendered)
    }

    /// Write the manifest to disk, replacing any existing file.
    pub fn write(&self, path: &Path) -> TemplateResult<()> {
        fs::write(path, self.to_pretty_string()?)?;
        debug!("Wrote manifest to {:?}", path);
        Ok(())
    }

    /// Write the manifest to `dir/package.json`.
    pub fn write_to_dir(&self, dir: &Path) -> TemplateResult<()> {
        self.write(&dir.join(MANIFEST_FILE))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The `name` field, if it is a string.
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// The `version` field, if it is a string.
    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").and_then(Value::as_str)
    }

    /// Merge a template manifest into this one.
    ///
    /// Every template key outside [`MERGE_BLACKLIST`] overwrites the project
    /// value; blacklisted keys keep whatever the project already had.
    pub fn merge_template(&mut self, template: &ProjectManifest) {
        for (key, value) in &template.fields {
            if is_blacklisted(key) {
                debug!("Skipping blacklisted template key '{}'", key);
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Declared `dependencies` as `(name, version)` pairs, in manifest order.
    pub fn dependencies(&self) -> Vec<(String, String)> {
        self.fields
            .get("dependencies")
            .and_then(Value::as_object)
            .map(|deps| {
                deps.iter()
                    .map(|(name, version)| {
                        let version = match version {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (name.clone(), version)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Declared dependencies as installable `name@version` specs.
    pub fn dependency_specs(&self) -> Vec<String> {
        self.dependencies()
            .into_iter()
            .map(|(name, version)| format!("{}@{}", name, version))
            .collect()
    }

    /// Look up one entry of the `dependencies` object.
    pub fn dependency(&self, name: &str) -> Option<&Value> {
        self.fields
            .get("dependencies")
            .and_then(Value::as_object)
            .and_then(|deps| deps.get(name))
    }

    /// Insert or replace one entry of the `dependencies` object.
    pub fn set_dependency(&mut self, name: &str, version: Value) {
        let deps = self
            .fields
            .entry("dependencies")
            .or_insert_with(|| Value::Object(Map::new()));
        if !deps.is_object() {
            *deps = Value::Object(Map::new());
        }
        if let Value::Object(map) = deps {
            map.insert(name.to_string(), version);
        }
    }

    /// The `{name, version}` pair this manifest describes.
    pub fn package_reference(&self) -> Option<PackageReference> {
        self.name().map(|name| PackageReference {
            name: name.to_string(),
            version: self.version().map(String::from),
        })
    }
}

/// Read the package reference from `dir/package.json`.
pub fn read_package_info(dir: &Path) -> TemplateResult<PackageReference> {
    let path = dir.join(MANIFEST_FILE);
    let manifest = ProjectManifest::load(&path)?;
    manifest
        .package_reference()
        .ok_or_else(|| TemplateError::InvalidManifest {
            path,
            message: "missing string field 'name'".to_string(),
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
