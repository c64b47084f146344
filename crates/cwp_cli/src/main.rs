//! create-webiny-project CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Any failure (invalid arguments, invalid project name, failed
//!   package manager command, malformed template, unexpected error)

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cwp_core::CoreError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(ExitCodes::GENERAL_ERROR)
            } else {
                ExitCode::from(ExitCodes::SUCCESS)
            };
        }
    };

    init_logging(cli.global.verbose);

    let result = match cli.command {
        Some(Commands::Info { json }) => commands::info::execute(json),
        None => commands::create::execute(cli.create, &cli.global).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            report_error(&e);
            ExitCode::from(ExitCodes::GENERAL_ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_directives = if verbose {
        "cwp_cli=debug,cwp_core=debug,cwp_templates=debug,warn"
    } else {
        "cwp_cli=warn,cwp_core=warn,cwp_templates=warn,warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

fn report_error(e: &anyhow::Error) {
    if let Some(CoreError::InvalidProjectName { name, problems }) = e.downcast_ref::<CoreError>() {
        eprintln!(
            "Cannot create a project named \"{}\" because of npm naming restrictions:",
            name
        );
        eprintln!();
        for problem in problems {
            eprintln!("  * {}", problem);
        }
        eprintln!();
        eprintln!("Please choose a different project name.");
        return;
    }

    eprintln!();
    eprintln!("Aborting installation.");
    match e.downcast_ref::<CoreError>().and_then(CoreError::failed_command) {
        Some(command) => eprintln!("  {} has failed.", command),
        None => {
            eprintln!("❌ Unexpected error. Please report it as a bug:");
            eprintln!("{:#}", e);
        }
    }
    eprintln!();
    eprintln!("Done.");
}
