//! Git operations for the new project.
//!
//! Version control is best effort: a missing `git` binary, an enclosing
//! repository or a failed commit only produce a warning.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};

/// Commit message for the first commit of a new project.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initialize project using Create Webiny Project";

/// Git operations manager.
#[derive(Debug)]
pub struct GitOps {
    repo_path: PathBuf,
}

impl GitOps {
    /// Create a new Git operations manager for a directory.
    pub fn new<P: AsRef<Path>>(repo_path: P) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }

    /// Check if Git is available on the system.
    pub fn is_git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Check if the directory itself holds a repository.
    pub fn is_initialized(&self) -> bool {
        self.repo_path.join(".git").exists()
    }

    /// Check if the directory is inside any Git work tree.
    pub fn is_in_git_repository(&self) -> bool {
        self.quiet_status("git", &["rev-parse", "--is-inside-work-tree"])
    }

    /// Check if the directory is inside a Mercurial repository.
    pub fn is_in_mercurial_repository(&self) -> bool {
        self.quiet_status("hg", &["--cwd", ".", "root"])
    }

    /// Initialize a Git repository.
    pub fn init(&self) -> CoreResult<()> {
        if self.is_initialized() {
            debug!("Repository already initialized");
            return Ok(());
        }

        info!("Initializing Git repository at {}", self.repo_path.display());
        self.git(&["init"])
    }

    /// Add all files to staging.
    pub fn add_all(&self) -> CoreResult<()> {
        self.git(&["add", "-A"])
    }

    /// Commit staged changes.
    pub fn commit(&self, message: &str) -> CoreResult<()> {
        if !self.is_initialized() {
            return Err(CoreError::GitError("Repository not initialized".to_string()));
        }
        self.git(&["commit", "-m", message])
    }

    /// Initialize a repository unless Git is missing or the directory is
    /// already under version control. Returns true if a repository was
    /// created.
    pub fn try_init(&self) -> bool {
        if !Self::is_git_available() {
            warn!("Git repo not initialized: git is not available");
            return false;
        }

        if self.is_in_git_repository() || self.is_in_mercurial_repository() {
            debug!("{} is already under version control", self.repo_path.display());
            return false;
        }

        match self.init() {
            Ok(()) => true,
            Err(e) => {
                warn!("Git repo not initialized: {}", e);
                false
            }
        }
    }

    /// Stage everything and commit. On failure the freshly created `.git`
    /// directory is removed so the project is left without a half-made
    /// repository. Returns true if the commit was created.
    pub fn try_commit(&self, message: &str) -> bool {
        let result = self.add_all().and_then(|()| self.commit(message));
        match result {
            Ok(()) => true,
            Err(e) => {
                debug!("Git commit not created: {}", e);
                if let Err(e) = fs::remove_dir_all(self.repo_path.join(".git")) {
                    debug!("Could not remove .git directory: {}", e);
                }
                false
            }
        }
    }

    fn git(&self, args: &[&str]) -> CoreResult<()> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .map_err(|e| CoreError::GitError(format!("Failed to run git {}: {}", args[0], e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CoreError::GitError(format!(
                "git {} failed: {}",
                args[0],
                stderr.trim()
            )));
        }

        Ok(())
    }

    fn quiet_status(&self, program: &str, args: &[&str]) -> bool {
        Command::new(program)
            .args(args)
            .current_dir(&self.repo_path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}
