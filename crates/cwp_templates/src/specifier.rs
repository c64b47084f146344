//! Template specifier classification.
//!
//! A template can be named in several ways on the command line. This module
//! turns the raw argument into a [`TemplateSpecifier`] without touching the
//! network or the filesystem.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Prefix shared by all published template packages.
pub const TEMPLATE_PREFIX: &str = "cwp-template";

/// A classified template argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSpecifier {
    /// No template given; resolves to the base template package.
    Default,
    /// `file:<path>`, made absolute against the invocation directory.
    LocalPath(PathBuf),
    /// URL or path of a `.tgz` / `.tar.gz` archive.
    Tarball(String),
    /// `git+<url>`.
    Git(String),
    /// Any other URL.
    Url(String),
    /// `name@version`.
    Versioned { name: String, version: String },
    /// Bare or scoped package name.
    Name(String),
}

impl TemplateSpecifier {
    /// Classify a raw template argument.
    pub fn parse(input: &str, invocation_dir: &Path) -> Self {
        let input = input.trim();

        if input.is_empty() {
            return Self::Default;
        }

        if let Some(path) = input.strip_prefix("file:") {
            return Self::LocalPath(invocation_dir.join(path));
        }

        if is_tarball(input) {
            return Self::Tarball(input.to_string());
        }

        if input.starts_with("git+") {
            return Self::Git(input.to_string());
        }

        if input.contains("://") {
            return Self::Url(input.to_string());
        }

        // A leading '@' marks a scope, not a version.
        if let Some(at) = input.rfind('@').filter(|&at| at > 0) {
            let (name, version) = (&input[..at], &input[at + 1..]);
            if !version.is_empty() {
                return Self::Versioned {
                    name: name.to_string(),
                    version: version.to_string(),
                };
            }
            return Self::Name(name.to_string());
        }

        Self::Name(input.to_string())
    }
}

impl fmt::Display for TemplateSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "{}", TEMPLATE_PREFIX),
            Self::LocalPath(path) => write!(f, "file:{}", path.display()),
            Self::Tarball(s) | Self::Git(s) | Self::Url(s) | Self::Name(s) => write!(f, "{}", s),
            Self::Versioned { name, version } => write!(f, "{}@{}", name, version),
        }
    }
}

/// Returns true if `input` names a gzipped tarball.
pub fn is_tarball(input: &str) -> bool {
    input.len() > ".tgz".len() && (input.ends_with(".tgz") || input.ends_with(".tar.gz"))
}

/// Add the template prefix to a package name, keeping any `@scope/` intact.
///
/// - `NAME` becomes `cwp-template-NAME`
/// - `@SCOPE/NAME` becomes `@SCOPE/cwp-template-NAME`
/// - `cwp-template-NAME` and `@SCOPE/cwp-template-NAME` are unchanged
/// - `@SCOPE` alone becomes `@SCOPE/cwp-template`
pub fn normalize_template_name(template: &str) -> String {
    let (scope, name) = match template.strip_prefix('@').and_then(|rest| rest.find('/')) {
        Some(slash) => template.split_at(slash + 2),
        None => ("", template),
    };

    if name.is_empty() {
        return format!("{}{}", scope, TEMPLATE_PREFIX);
    }

    if name == TEMPLATE_PREFIX || name.starts_with(&format!("{}-", TEMPLATE_PREFIX)) {
        format!("{}{}", scope, name)
    } else if name.starts_with('@') {
        format!("{}/{}", name, TEMPLATE_PREFIX)
    } else {
        format!("{}{}-{}", scope, TEMPLATE_PREFIX, name)
    }
}

/// Derive a package name from a git URL such as
/// `git+ssh://host/org/repo.git#v1.2.3`.
pub fn git_package_name(url: &str) -> Option<String> {
    static GIT_NAME: OnceLock<Regex> = OnceLock::new();
    let pattern = GIT_NAME.get_or_init(|| Regex::new(r"([^/]+)\.git(#.*)?$").unwrap());

    if let Some(caps) = pattern.captures(url) {
        return Some(caps[1].to_string());
    }

    let without_fragment = url.split('#').next().unwrap_or(url);
    without_fragment
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
        .map(String::from)
}

/// Guess a package name from a tarball file name, dropping any semver suffix:
/// `.../cwp-template-basic-1.0.0-beta.1.tgz` gives `cwp-template-basic`.
pub fn guess_name_from_filename(source: &str) -> Option<String> {
    static TARBALL_NAME: OnceLock<Regex> = OnceLock::new();
    let pattern = TARBALL_NAME
        .get_or_init(|| Regex::new(r"^(?:.*/)?(.+?)(?:-\d+.+)?\.(tgz|tar\.gz)$").unwrap());

    pattern.captures(source).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> TemplateSpecifier {
        TemplateSpecifier::parse(input, Path::new("/work"))
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(parse(""), TemplateSpecifier::Default);
        assert_eq!(
            parse("file:templates/basic"),
            TemplateSpecifier::LocalPath(PathBuf::from("/work/templates/basic"))
        );
        assert_eq!(
            parse("https://example.com/cwp-template-basic-1.0.0.tgz"),
            TemplateSpecifier::Tarball("https://example.com/cwp-template-basic-1.0.0.tgz".into())
        );
        assert_eq!(
            parse("./local.tar.gz"),
            TemplateSpecifier::Tarball("./local.tar.gz".into())
        );
        assert_eq!(
            parse("git+https://github.com/org/repo.git"),
            TemplateSpecifier::Git("git+https://github.com/org/repo.git".into())
        );
        assert_eq!(
            parse("https://example.com/pkg"),
            TemplateSpecifier::Url("https://example.com/pkg".into())
        );
        assert_eq!(parse("basic"), TemplateSpecifier::Name("basic".into()));
        assert_eq!(
            parse("@webiny/basic"),
            TemplateSpecifier::Name("@webiny/basic".into())
        );
    }

    #[test]
    fn test_parse_versioned() {
        assert_eq!(
            parse("pkg@1.2.3"),
            TemplateSpecifier::Versioned {
                name: "pkg".into(),
                version: "1.2.3".into()
            }
        );
        assert_eq!(
            parse("@scope/pkg@next"),
            TemplateSpecifier::Versioned {
                name: "@scope/pkg".into(),
                version: "next".into()
            }
        );
    }

    #[test]
    fn test_normalize_template_name() {
        assert_eq!(normalize_template_name("basic"), "cwp-template-basic");
        assert_eq!(normalize_template_name("cwp-template-basic"), "cwp-template-basic");
        assert_eq!(normalize_template_name("cwp-template"), "cwp-template");
        assert_eq!(normalize_template_name("@acme/basic"), "@acme/cwp-template-basic");
        assert_eq!(
            normalize_template_name("@acme/cwp-template-basic"),
            "@acme/cwp-template-basic"
        );
        assert_eq!(normalize_template_name("@acme"), "@acme/cwp-template");
    }

    #[test]
    fn test_git_package_name() {
        assert_eq!(
            git_package_name("git+https://github.com/org/repo.git").as_deref(),
            Some("repo")
        );
        assert_eq!(
            git_package_name("git+ssh://github.com/org/cwp-template-x.git#v1.2.3").as_deref(),
            Some("cwp-template-x")
        );
        assert_eq!(
            git_package_name("git+https://github.com/org/repo#main").as_deref(),
            Some("repo")
        );
    }

    #[test]
    fn test_guess_name_from_filename() {
        assert_eq!(
            guess_name_from_filename("https://host/cwp-template-basic-0.2.0-alpha.1.tgz")
                .as_deref(),
            Some("cwp-template-basic")
        );
        assert_eq!(
            guess_name_from_filename("cwp-template-basic.tar.gz").as_deref(),
            Some("cwp-template-basic")
        );
        assert_eq!(guess_name_from_filename("not-an-archive.zip"), None);
    }
}
