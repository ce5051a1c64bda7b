//! External process invocation.
//!
//! Resolves the configured executable, runs it to completion with stdout and
//! stderr merged into one pipe, and forwards the captured text to a sink.
//! Calls block until the child exits; there is no timeout.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::config::CliConfig;
use crate::error::{LiquibaseError, Result};
use crate::sink::OutputSink;

/// Resolve an executable name or path through the search path.
pub fn resolve_executable(executable: &str) -> Result<PathBuf> {
    which::which(executable).map_err(|source| LiquibaseError::ExecutableNotFound {
        path: executable.to_string(),
        source,
    })
}

/// Run the configured executable with `args` and return its merged output.
///
/// The output is emitted to `sink` before returning, on success and on failure.
/// A non-zero exit is reported as [`LiquibaseError::ToolFailed`] carrying the
/// same output.
pub fn invoke<S>(cli: &CliConfig, args: &[String], sink: &S) -> Result<String>
where
    S: OutputSink + ?Sized,
{
    let program = if cli.verify_executable && !cli.executable.is_empty() {
        log::info!("Checking that CLI path exists; path={}", cli.executable);
        let resolved = resolve_executable(&cli.executable)?;
        log::debug!("Resolved executable; path={}", resolved.display());
        resolved
    } else {
        PathBuf::from(&cli.executable)
    };

    let (mut reader, writer) = std::io::pipe()?;
    let mut child = {
        let mut command = Command::new(&program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);
        // The command owns the write ends; dropping it at the end of this
        // block lets the reader see EOF once the child exits.
        command
            .spawn()
            .map_err(|source| LiquibaseError::SpawnFailed {
                program: cli.executable.clone(),
                source,
            })?
    };

    let mut captured = Vec::new();
    let read_result = reader.read_to_end(&mut captured);
    let status = child.wait()?;
    read_result?;

    let output = String::from_utf8_lossy(&captured).into_owned();
    let emitted = sink.emit(&output);

    if !status.success() {
        if let Err(e) = emitted {
            log::warn!("Failed to emit tool output: {}", e);
        }
        log::debug!("Tool exited unsuccessfully; status={}", status);
        return Err(LiquibaseError::ToolFailed {
            program: cli.executable.clone(),
            code: status.code(),
            output,
        });
    }

    emitted?;
    Ok(output)
}
