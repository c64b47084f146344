//! Package-manager artifacts left in the invocation directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::CoreResult;

/// Files and directories a package manager may generate.
pub const KNOWN_ARTIFACTS: &[&str] = &["package.json", "yarn.lock", "node_modules"];

/// Which known artifacts existed in a directory before installation began.
///
/// Only artifacts absent from the snapshot are ever removed, so a user's own
/// `package.json` or `node_modules` next to the new project is left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSnapshot {
    present: BTreeSet<String>,
}

impl ArtifactSnapshot {
    /// Record the known artifacts currently present in `dir`.
    pub fn capture(dir: &Path) -> Self {
        let present = KNOWN_ARTIFACTS
            .iter()
            .filter(|name| dir.join(name).exists())
            .map(|name| name.to_string())
            .collect();
        Self { present }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.present.contains(name)
    }
}

/// Remove artifacts created in `invocation_dir` since `snapshot` was taken.
///
/// Nothing is removed when the invocation directory is the project root.
pub fn remove_generated_artifacts(
    invocation_dir: &Path,
    root: &Path,
    snapshot: &ArtifactSnapshot,
) -> CoreResult<Vec<PathBuf>> {
    if same_dir(invocation_dir, root) {
        debug!("Invocation directory is the project root, skipping cleanup");
        return Ok(Vec::new());
    }

    let mut removed = Vec::new();
    for name in KNOWN_ARTIFACTS {
        if snapshot.contains(name) {
            continue;
        }

        let path = invocation_dir.join(name);
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else if path.exists() {
            fs::remove_file(&path)?;
        } else {
            continue;
        }

        info!("Removed generated {:?}", path);
        removed.push(path);
    }

    Ok(removed)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
