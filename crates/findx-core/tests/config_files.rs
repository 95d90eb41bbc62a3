//! Integration tests for config file loading and priority.

use std::fs;
use std::path::Path;

use findx_core::config::{Config, Settings};
use findx_core::FindxError;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path.display().to_string()
}

fn config_with_files(files: &str) -> Config {
    Config::with_environment(Settings::from_env_vars([("FINDX_CONFIG_FILES", files)])).unwrap()
}

fn words(s: &str) -> Vec<String> {
    s.split_whitespace().map(String::from).collect()
}

#[test]
fn file_values_merge_with_defaults() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "config", "stdxf = =\nfind_path = +myfind\n");

    let mut config = config_with_files(&file);
    assert_eq!(config.get("stdxf").unwrap(), Vec::<String>::new());
    assert_eq!(config.get("find_path").unwrap(), words("gnufind find myfind"));
}

#[test]
fn later_files_take_priority() {
    let dir = TempDir::new().unwrap();
    let low = write(dir.path(), "low", "find_style = bsd\ngrep_path = +low\n");
    let high = write(dir.path(), "high", "find_style = gnu\ngrep_path = +high\n");

    let mut config = config_with_files(&format!("{low} {high}"));
    assert_eq!(config.get_scalar("find_style").unwrap(), "gnu");
    assert_eq!(config.get("grep_path").unwrap(), words("gnugrep grep low high"));
}

#[test]
fn missing_files_are_ignored() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope").display().to_string();

    let mut config = config_with_files(&missing);
    assert_eq!(config.get("xargs_path").unwrap(), words("gnuxargs xargs"));
}

#[test]
fn config_files_reach_a_fixed_point() {
    let dir = TempDir::new().unwrap();
    let second = write(dir.path(), "second", "xargs_style = posix\ngrep_style = bsd\n");
    let first = write(
        dir.path(),
        "first",
        &format!("config_files = +{second}\nxargs_style = gnu\n"),
    );

    let mut config = config_with_files(&format!("+{first}"));
    let files = config.config_files().unwrap();
    assert!(files.ends_with(&[second.clone(), first.clone()]));
    assert_eq!(config.get_scalar("xargs_style").unwrap(), "gnu");
    assert_eq!(config.get_scalar("grep_style").unwrap(), "bsd");
}

#[test]
fn growing_config_files_never_stabilize() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loop");
    let path_str = path.display().to_string();
    // Every pass appends the file to itself again.
    fs::write(&path, format!("config_files = +{path_str}\n")).unwrap();

    let mut config = config_with_files(&format!("+{path_str}"));
    assert!(matches!(
        config.get("find_path"),
        Err(FindxError::ConfigFilesUnstable)
    ));
}

#[test]
fn unknown_variable_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "config", "no_such_var = 1\n");

    let mut config = config_with_files(&file);
    match config.get("find_path") {
        Err(err @ FindxError::InvalidConfigVar { .. }) => {
            assert!(err.to_string().contains("variable 'no_such_var' is invalid"));
        }
        other => panic!("expected InvalidConfigVar, got {other:?}"),
    }
}

#[test]
fn malformed_value_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "config", "stdxd = 'unclosed\n");

    let mut config = config_with_files(&file);
    assert!(matches!(
        config.get("find_path"),
        Err(FindxError::InvalidConfigValue { .. })
    ));
}

#[test]
fn malformed_line_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "config", "find_path gnufind\n");

    let mut config = config_with_files(&file);
    match config.get("find_path") {
        Err(FindxError::InvalidConfigLine { reason, .. }) => assert_eq!(reason, "Missing '='"),
        other => panic!("expected InvalidConfigLine, got {other:?}"),
    }
}
