//! # cwp_templates
//!
//! Template resolution and project manifest handling for
//! `create-webiny-project`.
//!
//! A template is an installable package whose `package.json` fragment is
//! merged into the new project and whose `template/` directory seeds the
//! project's files. This crate handles:
//!
//! - Classifying template arguments (names, scoped names, versions, paths,
//!   git URLs, tarballs)
//! - Resolving them to installable package references
//! - Merging template manifests into the project manifest
//! - Copying template files into place
//!
//! ## Example
//!
//! ```rust,no_run
//! use cwp_templates::{TemplateResolver, TemplateSpecifier};
//! use std::path::Path;
//!
//! # async fn run() -> cwp_templates::TemplateResult<()> {
//! let specifier = TemplateSpecifier::parse("basic", Path::new("."));
//! let resolved = TemplateResolver::new().resolve(&specifier).await?;
//! assert_eq!(resolved.package.name, "cwp-template-basic");
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod copier;
pub mod error;
pub mod manifest;
pub mod resolver;
pub mod specifier;

pub use archive::{extract_package_info, resolve_tarball};
pub use copier::{apply_gitignore, copy_template_dir, rewrite_readme_commands};
pub use error::{TemplateError, TemplateResult};
pub use manifest::{
    is_blacklisted, read_package_info, ProjectManifest, INITIAL_VERSION, MANIFEST_FILE,
    MERGE_BLACKLIST,
};
pub use resolver::{PackageReference, ResolvedTemplate, TemplateResolver};
pub use specifier::{
    git_package_name, guess_name_from_filename, normalize_template_name, TemplateSpecifier,
    TEMPLATE_PREFIX,
};
