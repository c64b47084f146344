//! # cwp_core
//!
//! Project installer for `create-webiny-project`.
//!
//! Creating a project is a linear pipeline:
//!
//! 1. Validate the project name against npm naming rules
//! 2. Create the project directory and a minimal `package.json`
//! 3. Resolve the template argument to a package and install it
//! 4. Merge the template into the project ([`Initializer`]): manifest keys,
//!    files, Git repository, template dependencies
//! 5. Uninstall the template package
//!
//! # Example
//!
//! ```rust,no_run
//! use cwp_core::{InstallOptions, InstallRequest, Installer};
//!
//! # async fn run() -> cwp_core::CoreResult<()> {
//! let cwd = std::env::current_dir()?;
//! let request = InstallRequest::new("my-site", "basic", &cwd);
//! let outcome = Installer::with_yarn(InstallOptions::new()).install(&request).await?;
//! println!("Installed {}", outcome.template.package);
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod error;
pub mod git;
pub mod info;
pub mod initializer;
pub mod installer;
pub mod naming;
pub mod online;
pub mod options;
pub mod package_manager;

pub use artifacts::{remove_generated_artifacts, ArtifactSnapshot, KNOWN_ARTIFACTS};
pub use error::{CoreError, CoreResult};
pub use git::{GitOps, INITIAL_COMMIT_MESSAGE};
pub use info::{collect_environment_info, print_environment_info, EnvironmentInfo, ToolVersion};
pub use initializer::{InitOutcome, Initializer, TEMPLATE_CONTENT_DIR};
pub use installer::{InstallOutcome, InstallRequest, Installer};
pub use naming::{validate_project_name, NameValidation};
pub use online::{check_if_online, DEFAULT_REGISTRY_HOST};
pub use options::InstallOptions;
pub use package_manager::{AddOptions, PackageManager, Yarn, DEFAULT_PACKAGE_MANAGER};
