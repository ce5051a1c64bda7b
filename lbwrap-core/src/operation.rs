//! Liquibase subcommands and their argument lists.
//!
//! Every operation renders the same four connection flags in a fixed order,
//! followed by the subcommand keyword and an optional positional argument.
//! The external parser is case- and order-sensitive, so nothing here
//! reorders, deduplicates or quotes.

use std::fmt;

use crate::config::{redact, LiquibaseConfig};

/// A single Liquibase subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Apply all pending changesets.
    Update,
    /// Roll back to the given tag.
    Rollback { tag: String },
    /// Tag the current database state.
    Tag { name: String },
    /// List undeployed changesets.
    Status,
    /// Check the changelog for errors.
    Validate,
    /// Reset stored checksums.
    ClearChecksums,
    /// Release a held changelog lock.
    ReleaseLocks,
    /// List deployed changesets.
    History,
}

impl Operation {
    /// The subcommand keyword exactly as the tool expects it.
    pub fn keyword(&self) -> &'static str {
        match self {
            Operation::Update => "update",
            Operation::Rollback { .. } => "rollback",
            Operation::Tag { .. } => "tag",
            Operation::Status => "status",
            Operation::Validate => "validate",
            Operation::ClearChecksums => "clearCheckSums",
            Operation::ReleaseLocks => "releaseLocks",
            Operation::History => "history",
        }
    }

    /// Positional argument following the keyword, if any.
    pub fn positional(&self) -> Option<&str> {
        match self {
            Operation::Rollback { tag } => Some(tag),
            Operation::Tag { name } => Some(name),
            _ => None,
        }
    }

    /// Build the full argument vector for this operation.
    pub fn build_args(&self, config: &LiquibaseConfig) -> Vec<String> {
        self.render(config, &config.database.password)
    }

    /// Same as [`Operation::build_args`] with the password masked, for logging.
    pub fn redacted_args(&self, config: &LiquibaseConfig) -> Vec<String> {
        self.render(config, redact(&config.database.password))
    }

    fn render(&self, config: &LiquibaseConfig, password: &str) -> Vec<String> {
        let mut args = vec![
            format!("--changeLogFile={}", config.changelog.file),
            format!("--url={}", config.database.url),
            format!("--username={}", config.database.username),
            format!("--password={}", password),
            self.keyword().to_string(),
        ];
        if let Some(arg) = self.positional() {
            args.push(arg.to_string());
        }
        args
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.positional() {
            Some(arg) => write!(f, "{} {}", self.keyword(), arg),
            None => f.write_str(self.keyword()),
        }
    }
}
