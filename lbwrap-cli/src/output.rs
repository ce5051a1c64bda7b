//! Terminal output formatting for lbwrap commands.
//! Uses comfy-table for the config view and colored for status lines.

use colored::Colorize;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;

use lbwrap_core::config::{redact, LiquibaseConfig};
use lbwrap_core::{LiquibaseError, Operation};

/// JSON report for a single operation.
#[derive(Debug, Serialize)]
pub struct OperationReport<'a> {
    pub operation: String,
    pub success: bool,
    pub exit_code: Option<i32>,
    pub error: Option<String>,
    pub output: &'a str,
}

/// JSON view of the resolved configuration, password redacted.
#[derive(Debug, Serialize)]
struct ConfigView<'a> {
    changelog_file: &'a str,
    url: &'a str,
    username: &'a str,
    password: &'a str,
    executable: &'a str,
    verify_executable: bool,
}

impl<'a> From<&'a LiquibaseConfig> for ConfigView<'a> {
    fn from(config: &'a LiquibaseConfig) -> Self {
        Self {
            changelog_file: &config.changelog.file,
            url: &config.database.url,
            username: &config.database.username,
            password: redact(&config.database.password),
            executable: &config.cli.executable,
            verify_executable: config.cli.verify_executable,
        }
    }
}

/// Print the resolved configuration as a table.
pub fn print_config_table(config: &LiquibaseConfig) {
    let view = ConfigView::from(config);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("Setting"), Cell::new("Value")]);

    let rows = [
        ("Changelog file", view.changelog_file.to_string()),
        ("Database URL", view.url.to_string()),
        ("Username", view.username.to_string()),
        ("Password", view.password.to_string()),
        ("Executable", view.executable.to_string()),
        ("Verify executable", view.verify_executable.to_string()),
    ];
    for (setting, value) in rows {
        let value = if value.is_empty() {
            "(not set)".dimmed().to_string()
        } else {
            value
        };
        table.add_row(vec![Cell::new(setting), Cell::new(value)]);
    }

    println!("{table}");
}

/// Print the resolved configuration as JSON.
pub fn print_config_json(config: &LiquibaseConfig) {
    print_json(&ConfigView::from(config));
}

/// Print an operation result, including the captured tool output, as JSON.
pub fn print_json_report(
    operation: &Operation,
    result: &Result<String, LiquibaseError>,
    output: &str,
) {
    let report = OperationReport {
        operation: operation.to_string(),
        success: result.is_ok(),
        exit_code: match result {
            Ok(_) => Some(0),
            Err(e) => e.exit_code(),
        },
        error: result.as_ref().err().map(|e| e.to_string()),
        output,
    };
    print_json(&report);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize JSON output: {}", e),
    }
}

/// Print a one-line success summary after the tool output.
pub fn print_success(operation: &Operation) {
    let message = match operation {
        Operation::Update => "Update completed.".to_string(),
        Operation::Rollback { tag } => format!("Rolled back to tag '{}'.", tag),
        Operation::Tag { name } => format!("Tagged database as '{}'.", name),
        Operation::Status => "Status retrieved.".to_string(),
        Operation::Validate => "Changelog is valid.".to_string(),
        Operation::ClearChecksums => "Checksums cleared.".to_string(),
        Operation::ReleaseLocks => "Locks released.".to_string(),
        Operation::History => "History retrieved.".to_string(),
    };
    println!("{}", message.green().bold());
}
