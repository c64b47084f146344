//! Template resolver.
//!
//! Maps a [`TemplateSpecifier`] to the package that has to be installed:
//! - the string handed to the package manager's `add` command
//! - the `{name, version}` the package will be known by once installed

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::archive::resolve_tarball;
use crate::error::TemplateResult;
use crate::manifest::read_package_info;
use crate::specifier::{git_package_name, normalize_template_name, TemplateSpecifier};

/// An installable package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PackageReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Result of resolving a template specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    /// Argument passed to the package manager's `add` command.
    pub install: String,
    /// Package the template is installed as.
    pub package: PackageReference,
}

/// Resolves template specifiers to installable packages.
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver;

impl TemplateResolver {
    pub fn new() -> Self {
        Self
    }

    /// Classify and resolve a raw template argument.
    pub async fn resolve_str(
        &self,
        template: &str,
        invocation_dir: &Path,
    ) -> TemplateResult<ResolvedTemplate> {
        let specifier = TemplateSpecifier::parse(template, invocation_dir);
        self.resolve(&specifier).await
    }

    /// Resolve a classified specifier.
    ///
    /// Only tarballs touch the network, and their failures degrade to a name
    /// guessed from the file name. Local paths fail if their manifest is
    /// missing or unreadable.
    pub async fn resolve(&self, specifier: &TemplateSpecifier) -> TemplateResult<ResolvedTemplate> {
        debug!("Resolving template specifier {:?}", specifier);

        let resolved = match specifier {
            TemplateSpecifier::Default => {
                let name = normalize_template_name("");
                ResolvedTemplate {
                    install: name.clone(),
                    package: PackageReference::new(name),
                }
            }
            TemplateSpecifier::Name(name) => {
                let name = normalize_template_name(name);
                ResolvedTemplate {
                    install: name.clone(),
                    package: PackageReference::new(name),
                }
            }
            TemplateSpecifier::LocalPath(path) => ResolvedTemplate {
                install: format!("file:{}", path.display()),
                package: read_package_info(path)?,
            },
            TemplateSpecifier::Tarball(source) => ResolvedTemplate {
                install: source.clone(),
                package: resolve_tarball(source).await,
            },
            TemplateSpecifier::Git(url) => ResolvedTemplate {
                install: url.clone(),
                package: PackageReference::new(
                    git_package_name(url).unwrap_or_else(|| url.clone()),
                ),
            },
            TemplateSpecifier::Url(url) => ResolvedTemplate {
                install: url.clone(),
                package: PackageReference::new(url.clone()),
            },
            TemplateSpecifier::Versioned { name, version } => ResolvedTemplate {
                install: format!("{}@{}", name, version),
                package: PackageReference::new(name.clone()).with_version(version.clone()),
            },
        };

        info!("Resolved template {} to {}", specifier, resolved.package);
        Ok(resolved)
    }
}
