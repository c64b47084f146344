//! Package manager subprocess wrapper.
//!
//! The package manager is driven as a child process with inherited stdio so
//! its progress output reaches the user directly. Each call is attempted once;
//! a non-zero exit status is reported with the full command line.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};

/// Default package manager binary.
pub const DEFAULT_PACKAGE_MANAGER: &str = "yarnpkg";

/// Flags for an `add` invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// Pin exact versions in the manifest.
    pub exact: bool,
    /// Install from the local cache only.
    pub offline: bool,
}

impl AddOptions {
    pub fn exact() -> Self {
        Self {
            exact: true,
            offline: false,
        }
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

/// Operations the installer needs from a package manager.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Name of the binary, used in user-facing messages.
    fn command(&self) -> String;

    /// Add `packages` to the project in `cwd`.
    async fn add(&self, cwd: &Path, packages: &[String], options: AddOptions) -> CoreResult<()>;

    /// Remove `package` from the project in `cwd`.
    async fn remove(&self, cwd: &Path, package: &str) -> CoreResult<()>;
}

/// Yarn (classic) driven through its CLI.
#[derive(Debug, Clone)]
pub struct Yarn {
    binary: String,
}

impl Default for Yarn {
    fn default() -> Self {
        Self::new(DEFAULT_PACKAGE_MANAGER)
    }
}

impl Yarn {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments for `add`. `--cwd` is always explicit so the invocation
    /// directory is never touched.
    pub fn add_args(cwd: &Path, packages: &[String], options: AddOptions) -> Vec<String> {
        let mut args = vec!["add".to_string()];
        if options.exact {
            args.push("--exact".to_string());
        }
        if options.offline {
            args.push("--offline".to_string());
        }
        args.extend(packages.iter().cloned());
        args.push("--cwd".to_string());
        args.push(cwd.display().to_string());
        args
    }

    /// Arguments for `remove`.
    pub fn remove_args(cwd: &Path, package: &str) -> Vec<String> {
        vec![
            "remove".to_string(),
            package.to_string(),
            "--cwd".to_string(),
            cwd.display().to_string(),
        ]
    }

    async fn run(&self, args: Vec<String>) -> CoreResult<()> {
        let command_line = format!("{} {}", self.binary, args.join(" "));
        info!("Running {}", command_line);

        let status = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| CoreError::CommandSpawn {
                command: command_line.clone(),
                source,
            })?;

        if !status.success() {
            debug!("{} exited with {}", self.binary, status);
            return Err(CoreError::CommandFailed {
                command: command_line,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl PackageManager for Yarn {
    fn command(&self) -> String {
        self.binary.clone()
    }

    async fn add(&self, cwd: &Path, packages: &[String], options: AddOptions) -> CoreResult<()> {
        self.run(Self::add_args(cwd, packages, options)).await
    }

    async fn remove(&self, cwd: &Path, package: &str) -> CoreResult<()> {
        self.run(Self::remove_args(cwd, package)).await
    }
}
