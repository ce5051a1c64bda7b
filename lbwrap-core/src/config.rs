//! Configuration loading and resolution.
//!
//! Supports TOML config files, environment variables, and CLI overrides
//! with a defined priority order (CLI > env > TOML > defaults).

use std::fmt;

use serde::Deserialize;

use crate::error::{LiquibaseError, Result};

/// Command used when no executable path is configured.
pub const DEFAULT_EXECUTABLE: &str = "liquibase";

/// Config file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "lbwrap.toml";

/// Helper macro to apply an optional owned value directly to a target field.
///
/// Replaces: `if let Some(v) = $opt { $target = v; }`
macro_rules! apply_option {
    ($opt:expr => $target:expr) => {
        if let Some(v) = $opt {
            $target = v;
        }
    };
}

/// Helper macro to clone a borrowed optional value directly to a target field.
///
/// Replaces: `if let Some(ref v) = $opt { $target = v.clone(); }`
macro_rules! apply_option_clone {
    ($opt:expr => $target:expr) => {
        if let Some(ref v) = $opt {
            $target = v.clone();
        }
    };
}

/// Top-level configuration for a Liquibase wrapper.
#[derive(Debug, Clone, Default)]
pub struct LiquibaseConfig {
    /// Changelog document settings.
    pub changelog: ChangelogConfig,
    /// Database connection settings passed through to the tool.
    pub database: DatabaseConfig,
    /// Settings for locating the external executable.
    pub cli: CliConfig,
}

/// Changelog settings.
#[derive(Debug, Clone, Default)]
pub struct ChangelogConfig {
    /// Path to the changelog document, passed as `--changeLogFile`.
    pub file: String,
}

/// Database connection settings.
#[derive(Clone, Default)]
pub struct DatabaseConfig {
    /// Connection URL as the tool expects it (e.g. `jdbc:postgresql://host:5432/db`).
    pub url: String,
    /// Database user for authentication.
    pub username: String,
    /// Database password for authentication.
    pub password: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}

/// External executable settings.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Path or bare name of the Liquibase binary. Empty means [`DEFAULT_EXECUTABLE`].
    pub executable: String,
    /// Resolve the executable on the search path before spawning it.
    pub verify_executable: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            executable: String::new(),
            verify_executable: true,
        }
    }
}

/// Mask a secret for display. Empty secrets stay visibly empty.
pub fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

// ── TOML deserialization structs ──

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    changelog: Option<TomlChangelogConfig>,
    database: Option<TomlDatabaseConfig>,
    cli: Option<TomlCliConfig>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlChangelogConfig {
    file: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlDatabaseConfig {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlCliConfig {
    executable: Option<String>,
    verify_executable: Option<bool>,
}

/// CLI overrides that take highest priority.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the changelog file path.
    pub changelog_file: Option<String>,
    /// Override the database URL.
    pub url: Option<String>,
    /// Override the database username.
    pub username: Option<String>,
    /// Override the database password.
    pub password: Option<String>,
    /// Override the executable path or name.
    pub executable: Option<String>,
    /// Override whether the executable is resolved before spawning.
    pub verify_executable: Option<bool>,
}

impl LiquibaseConfig {
    /// Load configuration with the following priority (highest wins):
    /// 1. CLI arguments
    /// 2. Environment variables
    /// 3. TOML config file
    /// 4. Built-in defaults
    ///
    /// The result is already normalized (see [`LiquibaseConfig::normalized`]).
    pub fn load(config_path: Option<&str>, overrides: &CliOverrides) -> Result<Self> {
        let mut config = LiquibaseConfig::default();

        // Layer 3: TOML config file
        let toml_path = config_path.unwrap_or(DEFAULT_CONFIG_FILE);
        match std::fs::read_to_string(toml_path) {
            Ok(content) => {
                // The file may carry a database password
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    if let Ok(meta) = std::fs::metadata(toml_path) {
                        let mode = meta.permissions().mode();
                        if mode & 0o077 != 0 {
                            log::warn!("Config file has overly permissive permissions. Consider chmod 600.; path={}, mode={:o}", toml_path, mode);
                        }
                    }
                }
                let toml_config: TomlConfig = toml::from_str(&content).map_err(|e| {
                    LiquibaseError::ConfigError(format!(
                        "Failed to parse config file '{}': {}",
                        toml_path, e
                    ))
                })?;
                config.apply_toml(toml_config);
            }
            // A missing default file is fine; an explicit one must exist
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if config_path.is_some() {
                    return Err(LiquibaseError::ConfigError(format!(
                        "Config file '{}' not found",
                        toml_path
                    )));
                }
            }
            Err(e) => {
                return Err(LiquibaseError::ConfigError(format!(
                    "Failed to read config file '{}': {}",
                    toml_path, e
                )));
            }
        }

        // Layer 2: Environment variables
        config.apply_env();

        // Layer 1: CLI overrides
        config.apply_cli(overrides);

        Ok(config.normalized())
    }

    /// Substitute the default executable name when none is configured.
    pub fn normalized(mut self) -> Self {
        if self.cli.executable.is_empty() {
            log::info!(
                "No custom executable configured, using default command '{}'",
                DEFAULT_EXECUTABLE
            );
            self.cli.executable = DEFAULT_EXECUTABLE.to_string();
        }
        self
    }

    /// Check that the fields every operation sends to the tool are present.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.changelog.file.is_empty() {
            return Err(LiquibaseError::ConfigError(
                "Changelog file is required".to_string(),
            ));
        }
        if self.database.url.is_empty() {
            return Err(LiquibaseError::ConfigError(
                "Database URL is required".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_toml(&mut self, toml: TomlConfig) {
        if let Some(c) = toml.changelog {
            apply_option!(c.file => self.changelog.file);
        }

        if let Some(db) = toml.database {
            apply_option!(db.url => self.database.url);
            apply_option!(db.username => self.database.username);
            apply_option!(db.password => self.database.password);
        }

        if let Some(cli) = toml.cli {
            apply_option!(cli.executable => self.cli.executable);
            apply_option!(cli.verify_executable => self.cli.verify_executable);
        }
    }

    fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        apply_option!(lookup("LBWRAP_CHANGELOG_FILE") => self.changelog.file);
        apply_option!(lookup("LBWRAP_DATABASE_URL") => self.database.url);
        apply_option!(lookup("LBWRAP_DATABASE_USERNAME") => self.database.username);
        apply_option!(lookup("LBWRAP_DATABASE_PASSWORD") => self.database.password);
        apply_option!(lookup("LBWRAP_EXECUTABLE") => self.cli.executable);
        if let Some(v) = lookup("LBWRAP_VERIFY_EXECUTABLE") {
            match parse_bool(&v) {
                Some(verify) => self.cli.verify_executable = verify,
                None => log::warn!(
                    "Ignoring LBWRAP_VERIFY_EXECUTABLE='{}'. Valid values: true, false, 1, 0",
                    v
                ),
            }
        }
    }

    fn apply_cli(&mut self, overrides: &CliOverrides) {
        apply_option_clone!(overrides.changelog_file => self.changelog.file);
        apply_option_clone!(overrides.url => self.database.url);
        apply_option_clone!(overrides.username => self.database.username);
        apply_option_clone!(overrides.password => self.database.password);
        apply_option_clone!(overrides.executable => self.cli.executable);
        apply_option!(overrides.verify_executable => self.cli.verify_executable);
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
