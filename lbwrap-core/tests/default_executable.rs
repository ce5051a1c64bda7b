//! Resolution of the default `liquibase` executable through PATH.
//!
//! Lives in its own test binary because it modifies PATH for the whole
//! process.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;

use lbwrap_core::config::LiquibaseConfig;
use lbwrap_core::{BufferSink, Liquibase};

#[test]
fn test_empty_executable_spawns_liquibase_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let tool = dir.path().join("liquibase");
    std::fs::write(
        &tool,
        "#!/bin/sh\necho \"$0\"\nfor a in \"$@\"; do echo \"$a\"; done\n",
    )
    .unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

    let old_path = std::env::var_os("PATH").unwrap_or_default();
    let mut paths = vec![dir.path().to_path_buf()];
    paths.extend(std::env::split_paths(&old_path));
    std::env::set_var("PATH", std::env::join_paths(paths).unwrap());

    let mut config = LiquibaseConfig::default();
    config.changelog.file = "changelog.xml".to_string();
    config.cli.executable = String::new();
    let lb = Liquibase::with_sink(config, BufferSink::new());
    assert_eq!(lb.executable(), "liquibase");

    let output = lb.status().unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], tool.to_str().unwrap());
    assert_eq!(lines[1], "--changeLogFile=changelog.xml");
    assert_eq!(lines.last(), Some(&"status"));
    assert!(lb.sink().contents().contains("status"));
}
