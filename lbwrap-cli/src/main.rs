//! CLI entry point for lbwrap.
//! Provides clap-based command routing for the Liquibase subcommands and
//! exit code mapping based on error type.

mod output;

use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;

use lbwrap_core::config::{CliOverrides, LiquibaseConfig};
use lbwrap_core::{BufferSink, Liquibase, LiquibaseError, Operation, OutputSink, StdoutSink};

/// Top-level CLI definition with global flags and subcommand dispatch.
#[derive(Parser)]
#[command(
    name = "lbwrap",
    about = "Run Liquibase operations from a single config",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file path
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<String>,

    /// Changelog file (overrides config)
    #[arg(long, value_name = "PATH", global = true)]
    changelog_file: Option<String>,

    /// Database URL (overrides config)
    #[arg(long, value_name = "URL", global = true)]
    url: Option<String>,

    /// Database username (overrides config)
    #[arg(long, value_name = "USER", global = true)]
    username: Option<String>,

    /// Database password (overrides config)
    #[arg(long, value_name = "PASSWORD", global = true)]
    password: Option<String>,

    /// Path or name of the liquibase executable (overrides config)
    #[arg(long, value_name = "PATH", global = true)]
    executable: Option<String>,

    /// Spawn the executable without resolving it on PATH first
    #[arg(long, global = true)]
    no_verify_executable: bool,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable verbose/debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// All available lbwrap subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Apply pending changesets
    Update,

    /// Roll back to a tag
    Rollback {
        /// Tag to roll back to
        #[arg(value_name = "TAG")]
        tag: String,
    },

    /// Tag the current database state
    Tag {
        /// Tag name
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// List undeployed changesets
    Status,

    /// Validate the changelog
    Validate,

    /// Clear stored changeset checksums
    ClearChecksums,

    /// Release the changelog lock
    ReleaseLocks,

    /// List deployed changesets
    History,

    /// Show the resolved configuration without running liquibase
    Config,
}

impl Commands {
    /// The Liquibase operation this subcommand runs, if any.
    fn operation(&self) -> Option<Operation> {
        match self {
            Commands::Update => Some(Operation::Update),
            Commands::Rollback { tag } => Some(Operation::Rollback { tag: tag.clone() }),
            Commands::Tag { name } => Some(Operation::Tag { name: name.clone() }),
            Commands::Status => Some(Operation::Status),
            Commands::Validate => Some(Operation::Validate),
            Commands::ClearChecksums => Some(Operation::ClearChecksums),
            Commands::ReleaseLocks => Some(Operation::ReleaseLocks),
            Commands::History => Some(Operation::History),
            Commands::Config => None,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Set up logging (suppress when JSON output is requested)
    let filter = if cli.json {
        "error"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    env_logger::Builder::new()
        .parse_env(env_logger::Env::default().default_filter_or(filter))
        .format_target(false)
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli) {
        print_error(&e);
        process::exit(exit_code(&e));
    }
}

/// Map error types to differentiated exit codes.
///
/// Tool failures forward the tool's own exit code.
fn exit_code(error: &LiquibaseError) -> i32 {
    match error {
        LiquibaseError::ConfigError(_) => 2,
        LiquibaseError::ExecutableNotFound { .. } => 3,
        LiquibaseError::SpawnFailed { .. } => 4,
        LiquibaseError::ToolFailed { code, .. } => code.filter(|c| *c != 0).unwrap_or(1),
        LiquibaseError::IoError(_) => 1,
    }
}

fn overrides(cli: &Cli) -> CliOverrides {
    CliOverrides {
        changelog_file: cli.changelog_file.clone(),
        url: cli.url.clone(),
        username: cli.username.clone(),
        password: cli.password.clone(),
        executable: cli.executable.clone(),
        verify_executable: if cli.no_verify_executable {
            Some(false)
        } else {
            None
        },
    }
}

/// Build configuration and dispatch the chosen subcommand.
fn run(cli: Cli) -> Result<(), LiquibaseError> {
    let config = LiquibaseConfig::load(cli.config.as_deref(), &overrides(&cli))?;

    let operation = match cli.command.operation() {
        Some(op) => op,
        None => {
            if cli.json {
                output::print_config_json(&config);
            } else {
                output::print_config_table(&config);
            }
            return Ok(());
        }
    };

    config.ensure_complete()?;

    if cli.json {
        let sink = BufferSink::new();
        let lb = Liquibase::with_sink(config, sink.clone());
        let result = lb.run(&operation);
        output::print_json_report(&operation, &result, &sink.take());
        return result.map(|_| ());
    }

    let lb = Liquibase::with_sink(config, StdoutSink);
    run_operation(&lb, &operation, cli.quiet)
}

/// Execute one operation, printing a summary line on success.
fn run_operation<S: OutputSink>(
    lb: &Liquibase<S>,
    operation: &Operation,
    quiet: bool,
) -> Result<(), LiquibaseError> {
    lb.run(operation)?;
    if !quiet {
        output::print_success(operation);
    }
    Ok(())
}

/// Print a formatted error message with actionable hints to stderr.
fn print_error(error: &LiquibaseError) {
    eprintln!("{} {}", "ERROR:".red().bold(), error);

    match error {
        LiquibaseError::ConfigError(_) => {
            eprintln!(
                "{}",
                "Hint: Check your lbwrap.toml or set LBWRAP_CHANGELOG_FILE and LBWRAP_DATABASE_URL."
                    .dimmed()
            );
        }
        LiquibaseError::ExecutableNotFound { .. } => {
            eprintln!(
                "{}",
                "Hint: Install liquibase, add it to PATH, or pass --executable <PATH>.".dimmed()
            );
        }
        LiquibaseError::SpawnFailed { .. } => {
            eprintln!(
                "{}",
                "Hint: Check that the executable has execute permission.".dimmed()
            );
        }
        LiquibaseError::ToolFailed { .. } => {
            eprintln!(
                "{}",
                "Hint: See the liquibase output above for the cause.".dimmed()
            );
        }
        LiquibaseError::IoError(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rollback_requires_tag() {
        assert!(Cli::try_parse_from(["lbwrap", "rollback"]).is_err());
        let cli = Cli::try_parse_from(["lbwrap", "rollback", "v1"]).unwrap();
        assert_eq!(
            cli.command.operation(),
            Some(Operation::Rollback {
                tag: "v1".to_string()
            })
        );
    }

    #[test]
    fn test_subcommands_map_to_operations() {
        let cases = [
            ("update", Operation::Update),
            ("status", Operation::Status),
            ("validate", Operation::Validate),
            ("clear-checksums", Operation::ClearChecksums),
            ("release-locks", Operation::ReleaseLocks),
            ("history", Operation::History),
        ];
        for (name, expected) in cases {
            let cli = Cli::try_parse_from(["lbwrap", name]).unwrap();
            assert_eq!(cli.command.operation(), Some(expected));
        }

        let cli = Cli::try_parse_from(["lbwrap", "config"]).unwrap();
        assert_eq!(cli.command.operation(), None);
    }

    #[test]
    fn test_global_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "lbwrap",
            "tag",
            "release-1",
            "--url",
            "jdbc:postgresql://localhost/app",
            "--executable",
            "/opt/liquibase/liquibase",
            "--no-verify-executable",
        ])
        .unwrap();

        let o = overrides(&cli);
        assert_eq!(o.url.as_deref(), Some("jdbc:postgresql://localhost/app"));
        assert_eq!(o.executable.as_deref(), Some("/opt/liquibase/liquibase"));
        assert_eq!(o.verify_executable, Some(false));
        assert!(o.changelog_file.is_none());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&LiquibaseError::ConfigError("x".into())), 2);
        assert_eq!(
            exit_code(&LiquibaseError::ToolFailed {
                program: "liquibase".into(),
                code: Some(255),
                output: String::new(),
            }),
            255
        );
        assert_eq!(
            exit_code(&LiquibaseError::ToolFailed {
                program: "liquibase".into(),
                code: None,
                output: String::new(),
            }),
            1
        );
        assert_eq!(
            exit_code(&LiquibaseError::SpawnFailed {
                program: "liquibase".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            }),
            4
        );
    }
}
