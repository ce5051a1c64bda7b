//! Error types for lbwrap operations.

use thiserror::Error;

/// Render an exit code for error messages, covering signal termination.
fn format_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}

/// All error types that lbwrap operations can produce.
#[derive(Error, Debug)]
pub enum LiquibaseError {
    /// Invalid or missing configuration (TOML parse errors, missing required fields, etc.).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The configured executable could not be resolved on the search path. Nothing was spawned.
    #[error("Liquibase CLI not found ({path}): {source}")]
    ExecutableNotFound {
        path: String,
        #[source]
        source: which::Error,
    },

    /// The operating system refused to start the child process.
    #[error("Failed to start {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran and reported failure through its exit status.
    #[error("{program} failed with {}", format_exit_code(.code))]
    ToolFailed {
        program: String,
        code: Option<i32>,
        output: String,
    },

    /// An I/O operation failed (reading process output, writing to the sink, reading config).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LiquibaseError {
    /// Captured tool output, when a process ran before the failure.
    pub fn output(&self) -> Option<&str> {
        match self {
            LiquibaseError::ToolFailed { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Exit code reported by the external tool, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            LiquibaseError::ToolFailed { code, .. } => *code,
            _ => None,
        }
    }
}

/// Convenience type alias for `Result<T, LiquibaseError>`.
pub type Result<T> = std::result::Result<T, LiquibaseError>;
