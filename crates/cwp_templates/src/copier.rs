//! Copying template files into a project and post-copy touch-ups.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::TemplateResult;

/// Copy everything under `source` into `target`, overwriting existing files.
///
/// Returns the paths of the files written.
pub fn copy_template_dir(source: &Path, target: &Path) -> TemplateResult<Vec<PathBuf>> {
    let mut created_files = Vec::new();
    fs::create_dir_all(target)?;

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry?;
        let relative = match entry.path().strip_prefix(source) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &destination)?;
            debug!("Copied: {:?}", relative);
            created_files.push(destination);
        }
    }

    info!("Copied {} template files", created_files.len());
    Ok(created_files)
}

/// Turn a template-provided `gitignore` into `.gitignore`.
///
/// Packages cannot ship a `.gitignore` (publishing renames it), so templates
/// carry it as `gitignore`. If the project already has a `.gitignore` the
/// template's entries are appended to it.
pub fn apply_gitignore(root: &Path) -> TemplateResult<()> {
    let template_ignore = root.join("gitignore");
    if !template_ignore.exists() {
        return Ok(());
    }

    let gitignore = root.join(".gitignore");
    if gitignore.exists() {
        let data = fs::read(&template_ignore)?;
        let mut file = OpenOptions::new().append(true).open(&gitignore)?;
        file.write_all(&data)?;
        fs::remove_file(&template_ignore)?;
        debug!("Appended template gitignore to {:?}", gitignore);
    } else {
        fs::rename(&template_ignore, &gitignore)?;
        debug!("Renamed template gitignore to {:?}", gitignore);
    }

    Ok(())
}

/// Point `npm`/`npm run` commands in the project README at yarn.
///
/// A missing README is not an error.
pub fn rewrite_readme_commands(root: &Path) -> TemplateResult<()> {
    static NPM_COMMAND: OnceLock<Regex> = OnceLock::new();
    let pattern = NPM_COMMAND.get_or_init(|| Regex::new(r"(npm run |npm )").unwrap());

    let readme = root.join("README.md");
    let content = match fs::read_to_string(&readme) {
        Ok(content) => content,
        Err(_) => return Ok(()),
    };

    let rewritten = pattern.replace_all(&content, "yarn ");
    if rewritten != content {
        fs::write(&readme, rewritten.as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_copy_template_dir_nested() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("template");
        fs::create_dir_all(source.join("apps/admin")).unwrap();
        fs::write(source.join("README.md"), "# App").unwrap();
        fs::write(source.join("apps/admin/index.js"), "export {}").unwrap();

        let target = temp.path().join("project");
        let created = copy_template_dir(&source, &target).unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(fs::read_to_string(target.join("README.md")).unwrap(), "# App");
        assert!(target.join("apps/admin/index.js").is_file());
    }

    #[test]
    fn test_gitignore_is_renamed() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("gitignore"), "node_modules\n").unwrap();

        apply_gitignore(temp.path()).unwrap();

        assert!(!temp.path().join("gitignore").exists());
        assert_eq!(
            fs::read_to_string(temp.path().join(".gitignore")).unwrap(),
            "node_modules\n"
        );
    }

    #[test]
    fn test_gitignore_is_appended() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".gitignore"), ".env\n").unwrap();
        fs::write(temp.path().join("gitignore"), "node_modules\n").unwrap();

        apply_gitignore(temp.path()).unwrap();

        assert!(!temp.path().join("gitignore").exists());
        assert_eq!(
            fs::read_to_string(temp.path().join(".gitignore")).unwrap(),
            ".env\nnode_modules\n"
        );
    }

    #[test]
    fn test_missing_gitignore_is_noop() {
        let temp = tempdir().unwrap();
        apply_gitignore(temp.path()).unwrap();
        assert!(!temp.path().join(".gitignore").exists());
    }

    #[test]
    fn test_rewrite_readme_commands() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("README.md"),
            "Run `npm run build`, then `npm start`.",
        )
        .unwrap();

        rewrite_readme_commands(temp.path()).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("README.md")).unwrap(),
            "Run `yarn build`, then `yarn start`."
        );
    }

    #[test]
    fn test_rewrite_readme_missing_is_ok() {
        let temp = tempdir().unwrap();
        assert!(rewrite_readme_commands(temp.path()).is_ok());
    }
}
