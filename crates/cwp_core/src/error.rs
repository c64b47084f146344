//! Error types for the installer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while creating a project.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Cannot create a project named \"{name}\" because of npm naming restrictions")]
    InvalidProjectName { name: String, problems: Vec<String> },

    #[error("`{command}` has failed")]
    CommandFailed { command: String },

    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Template is malformed: missing directory {path}")]
    MalformedTemplate { path: PathBuf },

    #[error("Git error: {0}")]
    GitError(String),

    #[error("Template error: {0}")]
    Template(#[from] cwp_templates::TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// The failing command line, for subprocess errors.
    pub fn failed_command(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { command } | Self::CommandSpawn { command, .. } => Some(command),
            _ => None,
        }
    }
}
