//! Create command - create a new project from a template.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use cwp_core::{InstallOptions, InstallRequest, Installer};

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the project directory to create
    #[arg(value_name = "PROJECT_NAME", required = true)]
    pub project_name: Option<String>,

    /// Name of template to use
    #[arg(short, long, required = true)]
    pub template: Option<String>,
}

pub async fn execute(args: CreateArgs, global: &GlobalArgs) -> Result<()> {
    let project_name = args
        .project_name
        .context("You must provide a name for the project to use.")?;
    let template = args
        .template
        .context("You must provide a template to use.")?;

    let invocation_dir =
        std::env::current_dir().context("Failed to determine the current directory")?;
    let request = InstallRequest::new(&project_name, &template, &invocation_dir);
    info!("Creating project {} from template {}", request.app_name, template);

    let options = InstallOptions::new().with_package_manager(global.package_manager.clone());
    Installer::with_yarn(options).install(&request).await?;

    Ok(())
}
