//! CLI command definitions.
//!
//! `create-webiny-project <project-name> --template <template>` creates a
//! project; `create-webiny-project info` prints environment diagnostics.

use clap::{Args, Parser, Subcommand};

use cwp_core::DEFAULT_PACKAGE_MANAGER;

pub mod create;
pub mod info;

/// create-webiny-project - bootstrap a Webiny project from a template
#[derive(Parser, Debug)]
#[command(name = "create-webiny-project")]
#[command(version, about = "Create a new Webiny project from a template")]
#[command(long_about = r#"
Creates a new Webiny project by installing a template package and copying
its files into a fresh project directory.

TEMPLATES:
  basic                         → cwp-template-basic
  @scope/basic                  → @scope/cwp-template-basic
  cwp-template-basic@1.2.3      → exact version
  file:../my-template           → local directory
  git+https://host/org/repo.git → git repository
  https://host/template.tgz     → tarball

  Versioned names are installed as given: write cwp-template-basic@1.2.3,
  not basic@1.2.3, which would fetch the unrelated package "basic".

EXAMPLE:
  create-webiny-project my-site --template=basic
"#)]
#[command(subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub create: create::CreateArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Package manager binary used to install templates and dependencies
    #[arg(
        long,
        global = true,
        env = "CWP_PACKAGE_MANAGER",
        default_value = DEFAULT_PACKAGE_MANAGER
    )]
    pub package_manager: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print environment debug information
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from(["create-webiny-project", "my-site", "--template=basic"])
            .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.create.project_name.as_deref(), Some("my-site"));
        assert_eq!(cli.create.template.as_deref(), Some("basic"));
        assert_eq!(cli.global.package_manager, "yarnpkg");
    }

    #[test]
    fn test_parse_template_alias() {
        let cli =
            Cli::try_parse_from(["create-webiny-project", "my-site", "-t", "@acme/basic"]).unwrap();
        assert_eq!(cli.create.template.as_deref(), Some("@acme/basic"));
    }

    #[test]
    fn test_template_is_required() {
        assert!(Cli::try_parse_from(["create-webiny-project", "my-site"]).is_err());
    }

    #[test]
    fn test_project_name_is_required() {
        assert!(Cli::try_parse_from(["create-webiny-project", "--template=basic"]).is_err());
    }

    #[test]
    fn test_help_warns_about_unprefixed_versions() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("not basic@1.2.3"));
    }

    #[test]
    fn test_parse_info() {
        let cli = Cli::try_parse_from(["create-webiny-project", "info"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Info { json: false })));
    }

    #[test]
    fn test_parse_info_json() {
        let cli = Cli::try_parse_from(["create-webiny-project", "info", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Info { json: true })));
    }

    #[test]
    fn test_parse_package_manager_override() {
        let cli = Cli::try_parse_from([
            "create-webiny-project",
            "--package-manager",
            "yarn",
            "my-site",
            "-t",
            "basic",
        ])
        .unwrap();
        assert_eq!(cli.global.package_manager, "yarn");
    }
}
