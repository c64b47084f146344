//! Project initializer.
//!
//! Runs once the template package sits in the project's `node_modules`:
//! merges its manifest, copies its `template/` tree, sets up Git, installs
//! the template's dependencies and finally uninstalls the template package.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use cwp_templates::{
    apply_gitignore, copy_template_dir, rewrite_readme_commands, ProjectManifest,
};

use crate::artifacts::{remove_generated_artifacts, ArtifactSnapshot};
use crate::error::{CoreError, CoreResult};
use crate::git::GitOps;
use crate::options::InstallOptions;
use crate::package_manager::{AddOptions, PackageManager};

/// Directory inside a template package holding the project files.
pub const TEMPLATE_CONTENT_DIR: &str = "template";

/// What the initializer did.
#[derive(Debug, Clone, Default)]
pub struct InitOutcome {
    pub copied_files: Vec<PathBuf>,
    pub installed_dependencies: Vec<String>,
    pub removed_artifacts: Vec<PathBuf>,
    pub initialized_git: bool,
    pub committed: bool,
}

/// Merges an installed template package into a project.
pub struct Initializer {
    package_manager: Arc<dyn PackageManager>,
    options: InstallOptions,
    offline: bool,
    preexisting: Option<ArtifactSnapshot>,
}

impl Initializer {
    pub fn new(package_manager: Arc<dyn PackageManager>, options: InstallOptions) -> Self {
        Self {
            package_manager,
            options,
            offline: false,
            preexisting: None,
        }
    }

    /// Install template dependencies from the local cache only.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Artifacts that existed in the invocation directory before the
    /// installation began. Defaults to a snapshot taken when
    /// [`Initializer::initialize`] starts.
    pub fn with_preexisting_artifacts(mut self, snapshot: ArtifactSnapshot) -> Self {
        self.preexisting = Some(snapshot);
        self
    }

    /// Initialize `root` from the installed package `template_name`.
    pub async fn initialize(
        &self,
        root: &Path,
        app_name: &str,
        invocation_dir: &Path,
        template_name: &str,
    ) -> CoreResult<InitOutcome> {
        let preexisting = self
            .preexisting
            .clone()
            .unwrap_or_else(|| ArtifactSnapshot::capture(invocation_dir));
        let command = self.package_manager.command();

        let template_dir = root.join("node_modules").join(template_name);
        let content_dir = template_dir.join(TEMPLATE_CONTENT_DIR);
        let template_manifest = ProjectManifest::load_from_dir(&template_dir)?;

        // The template stays declared until it is removed below.
        let mut manifest = ProjectManifest::load_from_dir(root)?;
        let template_entry = manifest.dependency(template_name).cloned();
        manifest.merge_template(&template_manifest);
        if let Some(entry) = template_entry {
            manifest.set_dependency(template_name, entry);
        }
        manifest.write_to_dir(root)?;

        if !content_dir.is_dir() {
            error!("Could not locate supplied template: {}", content_dir.display());
            return Err(CoreError::MalformedTemplate { path: content_dir });
        }
        let copied_files = copy_template_dir(&content_dir, root)?;

        apply_gitignore(root)?;
        rewrite_readme_commands(root)?;

        let initialized_git = self.options.init_git && run_git(root, |git| git.try_init()).await;
        if initialized_git {
            println!();
            println!("Initialized a git repository.");
        }

        let installed_dependencies = template_manifest.dependency_specs();
        if !installed_dependencies.is_empty() {
            println!("Installing template dependencies using {}...", command);
            println!();
            self.package_manager
                .add(
                    root,
                    &installed_dependencies,
                    AddOptions::default().offline(self.offline),
                )
                .await?;
        }

        let removed_artifacts = remove_generated_artifacts(invocation_dir, root, &preexisting)?;

        println!("Removing template package using {}...", command);
        println!();
        self.package_manager.remove(root, template_name).await?;

        let committed = if initialized_git {
            let message = self.options.commit_message.clone();
            run_git(root, move |git| git.try_commit(&message)).await
        } else {
            false
        };
        if committed {
            println!();
            println!("Created git commit.");
        }

        info!("Project {} initialized from {}", app_name, template_name);
        print_next_steps(root, app_name, invocation_dir);

        Ok(InitOutcome {
            copied_files,
            installed_dependencies,
            removed_artifacts,
            initialized_git,
            committed,
        })
    }
}

/// Run a best-effort git step on the blocking pool. A panicked step counts
/// as failed.
async fn run_git<F>(root: &Path, step: F) -> bool
where
    F: FnOnce(&GitOps) -> bool + Send + 'static,
{
    let git = GitOps::new(root);
    tokio::task::spawn_blocking(move || step(&git))
        .await
        .unwrap_or(false)
}

/// Path to suggest in the `cd` hint: the bare app name when the project was
/// created directly under the invocation directory.
pub fn cd_path(root: &Path, app_name: &str, invocation_dir: &Path) -> String {
    if invocation_dir.join(app_name) == root {
        app_name.to_string()
    } else {
        root.display().to_string()
    }
}

fn print_next_steps(root: &Path, app_name: &str, invocation_dir: &Path) {
    println!();
    println!("✅ Success! Created {} at {}", app_name, root.display());
    println!("Inside that directory, you can run several commands:");
    println!();
    println!("  yarn start");
    println!("    Starts the development server.");
    println!();
    println!("  yarn build");
    println!("    Bundles the app into static files for production.");
    println!();
    println!("We suggest that you begin by typing:");
    println!();
    println!("  cd {}", cd_path(root, app_name, invocation_dir));
    println!("  yarn start");
    println!();
    println!("Happy hacking!");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_manager::MockPackageManager;
    use std::fs;
    use tempfile::tempdir;

    fn install_template(root: &Path, name: &str, manifest: &str, with_content: bool) {
        let dir = root.join("node_modules").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("package.json"), manifest).unwrap();
        if with_content {
            fs::create_dir_all(dir.join(TEMPLATE_CONTENT_DIR)).unwrap();
            fs::write(dir.join(TEMPLATE_CONTENT_DIR).join("README.md"), "# App\n").unwrap();
        }
        ProjectManifest::new("myapp").write_to_dir(root).unwrap();
    }

    fn mock(expect_add: usize, expect_remove: usize) -> MockPackageManager {
        let mut pm = MockPackageManager::new();
        pm.expect_command().return_const("yarnpkg".to_string());
        pm.expect_add().times(expect_add).returning(|_, _, _| Ok(()));
        pm.expect_remove().times(expect_remove).returning(|_, _| Ok(()));
        pm
    }

    #[tokio::test]
    async fn test_missing_template_dir_is_fatal() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("myapp");
        install_template(&root, "cwp-template-basic", r#"{"name": "cwp-template-basic"}"#, false);

        let initializer = Initializer::new(Arc::new(mock(0, 0)), InstallOptions::new().init_git(false));
        let err = initializer
            .initialize(&root, "myapp", temp.path(), "cwp-template-basic")
            .await
            .unwrap_err();

        match err {
            CoreError::MalformedTemplate { path } => {
                assert!(path.ends_with("node_modules/cwp-template-basic/template"))
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_no_dependencies_skips_add() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("myapp");
        install_template(&root, "cwp-template-basic", r#"{"name": "cwp-template-basic"}"#, true);

        let initializer = Initializer::new(Arc::new(mock(0, 1)), InstallOptions::new().init_git(false));
        let outcome = initializer
            .initialize(&root, "myapp", temp.path(), "cwp-template-basic")
            .await
            .unwrap();

        assert!(outcome.installed_dependencies.is_empty());
        assert!(!outcome.initialized_git);
        assert!(root.join("README.md").is_file());
    }

    #[tokio::test]
    async fn test_dependency_install_failure_is_fatal() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("myapp");
        install_template(
            &root,
            "cwp-template-basic",
            r#"{"name": "cwp-template-basic", "dependencies": {"left-pad": "1.0.0"}}"#,
            true,
        );

        let mut pm = MockPackageManager::new();
        pm.expect_command().return_const("yarnpkg".to_string());
        pm.expect_add().times(1).returning(|_, packages, _| {
            Err(CoreError::CommandFailed {
                command: format!("yarnpkg add {}", packages.join(" ")),
            })
        });
        pm.expect_remove().times(0);

        let initializer = Initializer::new(Arc::new(pm), InstallOptions::new().init_git(false));
        let err = initializer
            .initialize(&root, "myapp", temp.path(), "cwp-template-basic")
            .await
            .unwrap_err();

        assert_eq!(err.failed_command(), Some("yarnpkg add left-pad@1.0.0"));
    }

    #[tokio::test]
    async fn test_git_setup_never_aborts() {
        if !GitOps::is_git_available() {
            println!("Git not available, skipping test");
            return;
        }

        let temp = tempdir().unwrap();
        let root = temp.path().join("myapp");
        install_template(&root, "cwp-template-basic", r#"{"name": "cwp-template-basic"}"#, true);

        let initializer = Initializer::new(Arc::new(mock(0, 1)), InstallOptions::new());
        let outcome = initializer
            .initialize(&root, "myapp", temp.path(), "cwp-template-basic")
            .await
            .unwrap();

        // Without a git identity the commit fails and the repository goes away.
        assert_eq!(root.join(".git").exists(), outcome.committed);
        assert!(outcome.initialized_git || !outcome.committed);
        assert!(root.join("README.md").is_file());
    }

    #[test]
    fn test_cd_path() {
        let invocation = Path::new("/work");
        assert_eq!(cd_path(Path::new("/work/myapp"), "myapp", invocation), "myapp");
        assert_eq!(
            cd_path(Path::new("/elsewhere/myapp"), "myapp", invocation),
            "/elsewhere/myapp"
        );
    }
}
