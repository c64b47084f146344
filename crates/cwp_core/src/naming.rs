//! Project name validation.
//!
//! A project name becomes the `name` of its `package.json`, so it has to be
//! a valid npm package name for new packages. Errors make a name unusable;
//! warnings flag names npm only accepts for legacy packages. Either one
//! rejects the name.

use std::sync::OnceLock;

use regex::Regex;

const MAX_NAME_LENGTH: usize = 214;

const BLACKLISTED_NAMES: &[&str] = &["node_modules", "favicon.ico"];

const CORE_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Outcome of validating a project name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl NameValidation {
    /// True if the name may be used for a new package.
    pub fn valid_for_new_packages(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Errors followed by warnings.
    pub fn problems(&self) -> Vec<String> {
        self.errors.iter().chain(&self.warnings).cloned().collect()
    }
}

/// Validate `name` against npm's package naming rules.
pub fn validate_project_name(name: &str) -> NameValidation {
    let mut result = NameValidation::default();

    if name.is_empty() {
        result.errors.push("name length must be greater than zero".to_string());
    }
    if name.starts_with('.') {
        result.errors.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        result.errors.push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        result
            .errors
            .push("name cannot contain leading or trailing spaces".to_string());
    }

    let lower = name.to_lowercase();
    if BLACKLISTED_NAMES.contains(&lower.as_str()) {
        result.errors.push(format!("{} is a blacklisted name", name));
    }

    if CORE_MODULES.contains(&lower.as_str()) {
        result.warnings.push(format!("{} is a core module name", name));
    }
    if name.len() > MAX_NAME_LENGTH {
        result.warnings.push(format!(
            "name can no longer contain more than {} characters",
            MAX_NAME_LENGTH
        ));
    }
    if lower != name {
        result
            .warnings
            .push("name can no longer contain capital letters".to_string());
    }

    let last_segment = name.rsplit('/').next().unwrap_or(name);
    if last_segment.contains(['~', '\'', '!', '(', ')', '*']) {
        result.warnings.push(
            "name can no longer contain special characters (\"~'!()*\")".to_string(),
        );
    }

    if !is_url_friendly(name) {
        result
            .errors
            .push("name can only contain URL-friendly characters".to_string());
    }

    result
}

/// Plain names must survive URI-component encoding unchanged; scoped names
/// are checked per part.
fn is_url_friendly(name: &str) -> bool {
    static SCOPED: OnceLock<Regex> = OnceLock::new();
    let scoped = SCOPED.get_or_init(|| Regex::new(r"^(?:@([^/]+?)/)?([^/]+?)$").unwrap());

    if is_uri_component_safe(name) {
        return true;
    }

    match scoped.captures(name) {
        Some(caps) => {
            let scope_ok = caps
                .get(1)
                .map(|scope| is_uri_component_safe(scope.as_str()))
                .unwrap_or(false);
            scope_ok && is_uri_component_safe(&caps[2])
        }
        None => false,
    }
}

fn is_uri_component_safe(s: &str) -> bool {
    s.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
    })
}
