//! Installer configuration.

use crate::git::INITIAL_COMMIT_MESSAGE;
use crate::online::DEFAULT_REGISTRY_HOST;
use crate::package_manager::DEFAULT_PACKAGE_MANAGER;

/// Options controlling a project installation.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Package manager binary to invoke.
    pub package_manager: String,
    /// Host probed to detect whether the registry is reachable.
    pub registry_host: String,
    /// Force offline (`Some(true)`) or online (`Some(false)`) installs
    /// instead of probing.
    pub offline: Option<bool>,
    /// Whether to try creating a Git repository in the project.
    pub init_git: bool,
    /// Message of the initial commit.
    pub commit_message: String,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            package_manager: DEFAULT_PACKAGE_MANAGER.to_string(),
            registry_host: DEFAULT_REGISTRY_HOST.to_string(),
            offline: None,
            init_git: true,
            commit_message: INITIAL_COMMIT_MESSAGE.to_string(),
        }
    }
}

impl InstallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package_manager(mut self, binary: impl Into<String>) -> Self {
        self.package_manager = binary.into();
        self
    }

    pub fn with_registry_host(mut self, host: impl Into<String>) -> Self {
        self.registry_host = host.into();
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = Some(offline);
        self
    }

    pub fn init_git(mut self, enabled: bool) -> Self {
        self.init_git = enabled;
        self
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = InstallOptions::new();
        assert_eq!(opts.package_manager, "yarnpkg");
        assert_eq!(opts.registry_host, "registry.yarnpkg.com");
        assert!(opts.offline.is_none());
        assert!(opts.init_git);
    }

    #[test]
    fn test_builder() {
        let opts = InstallOptions::new()
            .with_package_manager("yarn")
            .offline(true)
            .init_git(false);

        assert_eq!(opts.package_manager, "yarn");
        assert_eq!(opts.offline, Some(true));
        assert!(!opts.init_git);
    }
}
