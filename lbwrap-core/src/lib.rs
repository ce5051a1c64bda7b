//! Thin, synchronous wrapper around the Liquibase command-line tool.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lbwrap_core::config::LiquibaseConfig;
//! use lbwrap_core::Liquibase;
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = LiquibaseConfig::default();
//! config.changelog.file = "db/changelog.xml".to_string();
//! config.database.url = "jdbc:postgresql://localhost:5432/app".to_string();
//! config.database.username = "app".to_string();
//! config.database.password = "secret".to_string();
//!
//! let lb = Liquibase::new(config);
//! lb.update()?;
//! lb.tag("release-1")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration loading (TOML, env vars, CLI overrides)
//! - [`operation`]: Subcommand keywords and argument lists
//! - [`invoker`]: Executable resolution and process execution
//! - [`sink`]: Where captured tool output goes
//! - [`error`]: Error types
//!
//! Each call spawns one process and blocks until it exits. Locking between
//! concurrent runs against the same database is left to the tool itself.

pub mod config;
pub mod error;
pub mod invoker;
pub mod operation;
pub mod sink;

use config::{ChangelogConfig, DatabaseConfig, LiquibaseConfig};
use error::Result;

pub use error::LiquibaseError;
pub use operation::Operation;
pub use sink::{BufferSink, OutputSink, StdoutSink};

/// Main entry point for the library.
///
/// Holds a normalized configuration and an output sink; each method runs one
/// Liquibase subcommand with the configuration as it is at call time.
pub struct Liquibase<S: OutputSink = StdoutSink> {
    config: LiquibaseConfig,
    sink: S,
}

impl Liquibase<StdoutSink> {
    /// Create a wrapper that prints tool output to stdout.
    ///
    /// An empty executable path is replaced by `liquibase`.
    pub fn new(config: LiquibaseConfig) -> Self {
        Self::with_sink(config, StdoutSink)
    }
}

impl<S: OutputSink> Liquibase<S> {
    /// Create a wrapper that sends tool output to `sink`.
    pub fn with_sink(config: LiquibaseConfig, sink: S) -> Self {
        Self {
            config: config.normalized(),
            sink,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &LiquibaseConfig {
        &self.config
    }

    /// The executable every call spawns. Never empty.
    pub fn executable(&self) -> &str {
        &self.config.cli.executable
    }

    /// Mutable changelog settings; changes apply to subsequent calls.
    pub fn changelog_mut(&mut self) -> &mut ChangelogConfig {
        &mut self.config.changelog
    }

    /// Mutable database settings; changes apply to subsequent calls.
    pub fn database_mut(&mut self) -> &mut DatabaseConfig {
        &mut self.config.database
    }

    /// Point subsequent calls at a different changelog.
    pub fn set_changelog_file(&mut self, file: impl Into<String>) {
        self.config.changelog.file = file.into();
    }

    /// Sink receiving the captured output of every call.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run a single operation and return the tool's captured output.
    pub fn run(&self, operation: &Operation) -> Result<String> {
        log::debug!(
            "Running {} {}",
            self.config.cli.executable,
            operation.redacted_args(&self.config).join(" ")
        );
        let args = operation.build_args(&self.config);
        invoker::invoke(&self.config.cli, &args, &self.sink)
    }

    /// Apply all pending changesets.
    pub fn update(&self) -> Result<String> {
        self.run(&Operation::Update)
    }

    /// Roll back to a previously recorded tag.
    pub fn rollback(&self, tag: &str) -> Result<String> {
        self.run(&Operation::Rollback {
            tag: tag.to_string(),
        })
    }

    /// Record a tag against the current database state.
    pub fn tag(&self, name: &str) -> Result<String> {
        self.run(&Operation::Tag {
            name: name.to_string(),
        })
    }

    /// Show undeployed changesets.
    pub fn status(&self) -> Result<String> {
        self.run(&Operation::Status)
    }

    /// Validate the changelog.
    pub fn validate(&self) -> Result<String> {
        self.run(&Operation::Validate)
    }

    /// Clear stored changeset checksums.
    pub fn clear_checksums(&self) -> Result<String> {
        self.run(&Operation::ClearChecksums)
    }

    /// Release the changelog lock.
    pub fn release_locks(&self) -> Result<String> {
        self.run(&Operation::ReleaseLocks)
    }

    /// Show deployed changesets.
    pub fn history(&self) -> Result<String> {
        self.run(&Operation::History)
    }
}
