//! Project installer.
//!
//! Creates the project directory and its initial manifest, installs the
//! resolved template package and hands over to the [`Initializer`]. Steps
//! run strictly in order and the first failure aborts the rest. Nothing that
//! was already created is rolled back.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use cwp_templates::{ProjectManifest, ResolvedTemplate, TemplateResolver};

use crate::artifacts::ArtifactSnapshot;
use crate::error::{CoreError, CoreResult};
use crate::initializer::{InitOutcome, Initializer};
use crate::naming::validate_project_name;
use crate::online::check_if_online;
use crate::options::InstallOptions;
use crate::package_manager::{AddOptions, PackageManager, Yarn};

/// A request to create one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// Absolute path of the project directory.
    pub root: PathBuf,
    /// Package name of the project (the root's base name).
    pub app_name: String,
    /// Directory the CLI was invoked from.
    pub invocation_dir: PathBuf,
    /// Raw template argument.
    pub template: String,
}

impl InstallRequest {
    /// Build a request for `project_name` relative to `invocation_dir`.
    pub fn new(project_name: &str, template: &str, invocation_dir: &Path) -> Self {
        let root = normalize(&invocation_dir.join(project_name));
        let app_name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| project_name.to_string());

        Self {
            root,
            app_name,
            invocation_dir: invocation_dir.to_path_buf(),
            template: template.to_string(),
        }
    }
}

/// What the installer did.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub template: ResolvedTemplate,
    pub offline: bool,
    pub init: InitOutcome,
}

/// Creates projects from template packages.
pub struct Installer {
    package_manager: Arc<dyn PackageManager>,
    resolver: TemplateResolver,
    options: InstallOptions,
}

impl Installer {
    pub fn new(package_manager: Arc<dyn PackageManager>, options: InstallOptions) -> Self {
        Self {
            package_manager,
            resolver: TemplateResolver::new(),
            options,
        }
    }

    /// Installer driving the configured package manager binary.
    pub fn with_yarn(options: InstallOptions) -> Self {
        let yarn = Yarn::new(options.package_manager.clone());
        Self::new(Arc::new(yarn), options)
    }

    /// Create the project described by `request`.
    pub async fn install(&self, request: &InstallRequest) -> CoreResult<InstallOutcome> {
        let validation = validate_project_name(&request.app_name);
        if !validation.valid_for_new_packages() {
            return Err(CoreError::InvalidProjectName {
                name: request.app_name.clone(),
                problems: validation.problems(),
            });
        }

        let preexisting = ArtifactSnapshot::capture(&request.invocation_dir);
        let root = request.root.as_path();

        fs::create_dir_all(root)?;
        println!();
        println!("Creating your webiny app in {}.", root.display());
        println!();

        ProjectManifest::new(&request.app_name).write_to_dir(root)?;

        let template = self
            .resolver
            .resolve_str(&request.template, &request.invocation_dir)
            .await?;
        info!("Installing template package {}", template.package);
        println!("Installing packages. This might take a couple of minutes.");

        let offline = match self.options.offline {
            Some(offline) => offline,
            None => !check_if_online(&self.options.registry_host).await,
        };
        if offline {
            println!("You appear to be offline.");
            println!("Falling back to the local Yarn cache.");
            println!();
        }

        self.package_manager
            .add(
                root,
                &[template.install.clone()],
                AddOptions::exact().offline(offline),
            )
            .await?;

        let init = Initializer::new(self.package_manager.clone(), self.options.clone())
            .offline(offline)
            .with_preexisting_artifacts(preexisting)
            .initialize(
                root,
                &request.app_name,
                &request.invocation_dir,
                &template.package.name,
            )
            .await?;

        Ok(InstallOutcome {
            template,
            offline,
            init,
        })
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
