//! CLI end-to-end tests.
//!
//! These tests spawn the actual `findx`, `ffx` and `ffg` binaries and check
//! stdout, stderr and exit codes.
//!
//! Every run is isolated from the host: config files are disabled and tool
//! names and styles are pinned, so `-show` output is deterministic.
//!
//! Exit code expectations:
//! - 0: Success
//! - 1: Syntax error (bad option, bad config value, non-UTF-8 argument)
//! - 2: Runtime error (invalid root)
//! - 101..: Pipeline statuses

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a findx binary in `dir` and return (stdout, stderr, exit_code).
fn run_in(exe: &str, dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(exe)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("FINDX_CONFIG_FILES", "=")
        .env("FINDX_FIND_PATH", "find")
        .env("FINDX_FIND_STYLE", "gnu")
        .env("FINDX_XARGS_PATH", "xargs")
        .env("FINDX_XARGS_STYLE", "gnu")
        .env("FINDX_GREP_PATH", "grep")
        .env("FINDX_GREP_STYLE", "posix")
        .output()
        .expect("failed to execute findx");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn run_findx(args: &[&str]) -> (String, String, i32) {
    let dir = TempDir::new().unwrap();
    run_in(env!("CARGO_BIN_EXE_findx"), dir.path(), args)
}

/// A small tree: `a.c`, `b.h`, `notes.txt`, `sub/c.c`, `.git/config`.
fn sample_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    for file in ["a.c", "b.h", "notes.txt", "sub/c.c", ".git/config"] {
        fs::write(root.join(file), "int main;\n").unwrap();
    }
    dir
}

fn sorted_lines(s: &str) -> Vec<String> {
    let mut lines: Vec<String> = s.lines().map(String::from).collect();
    lines.sort();
    lines
}

// ============================================================================
// -show
// ============================================================================

#[test]
fn show_expands_globs() {
    let (stdout, stderr, code) = run_findx(&["-show", "*.{c,h}"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(stdout.trim_end(), "find . ( ( -name *.c -o -name *.h ) )");
}

#[test]
fn show_xargs_pipeline() {
    let (stdout, _, code) = run_findx(&["-show", "*.c", "-x", "-name", "build", ":", "grep", "main"]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout.trim_end(),
        "find . ( -name build ) -prune -o ( -name *.c ) -print0 | xargs -0 --no-run-if-empty grep main"
    );
}

#[test]
fn config_switch_changes_tool() {
    let (stdout, _, code) = run_findx(&["--find-path", "gfind", "-show", "-type", "f"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), "gfind . ( -type f )");
}

#[test]
fn show_var_prints_setting() {
    let (stdout, _, code) = run_findx(&["-show-var", "grep_style"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), "grep_style = 'posix'");
}

#[test]
fn ffx_prepends_abbreviation() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_in(
        env!("CARGO_BIN_EXE_ffx"),
        dir.path(),
        &["--stdxd", ".git", "--stdxf", "*.o", "-show"],
    );
    assert_eq!(code, 0);
    assert_eq!(
        stdout.trim_end(),
        "find -L . ( -type d -iname .git -o -not -type d -iname *.o ) -prune -o ( -type f ) -print"
    );
}

#[test]
fn ffg_prepends_grep() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_in(
        env!("CARGO_BIN_EXE_ffg"),
        dir.path(),
        &["main", "[", "--stdxd", "=", "--stdxf", "=", "-show"],
    );
    // User arguments are xargs until '[' returns to FINDX MODE.
    assert_eq!(code, 0);
    assert_eq!(
        stdout.trim_end(),
        "find -L . ( -type f ) -print0 | xargs -0 --no-run-if-empty grep main"
    );
}

// ============================================================================
// Informational Options
// ============================================================================

#[test]
fn help_and_version() {
    let (stdout, _, code) = run_findx(&["-help"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Usage: findx"));
    assert!(stdout.contains("CONFIGURATION VARIABLES"));

    let (stdout, _, code) = run_findx(&["--version"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("findx version "));
}

#[test]
fn log_level_flag_is_accepted() {
    let (stdout, _, code) = run_findx(&["--log-level", "error", "-show"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), "find .");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn invalid_option_is_syntax_error() {
    let (_, stderr, code) = run_findx(&["-bogus"]);
    assert_eq!(code, 1);
    assert_eq!(stderr.trim_end(), "findx: Error: Invalid command-line option '-bogus'");
}

#[test]
fn missing_xarg_is_syntax_error() {
    let (_, stderr, code) = run_findx(&["*.c", ":"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Missing required xarg"));
}

#[test]
fn print_with_xargs_is_syntax_error() {
    let (_, stderr, code) = run_findx(&["-print", ":", "ls"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Cannot mix '-print' with XARGS"));
}

#[test]
fn bad_config_value_is_syntax_error() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_findx"))
        .arg("-show")
        .current_dir(dir.path())
        .env("FINDX_CONFIG_FILES", "=")
        .env("FINDX_FIND_STYLE", "sometimes")
        .output()
        .expect("failed to execute findx");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Variable 'find_style' must be one of: probe, gnu, bsd, posix"));
}

#[test]
fn invalid_root_is_runtime_error() {
    let (_, stderr, code) = run_findx(&["-root", "no-such-dir"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Invalid root path 'no-such-dir'"));
}

#[cfg(unix)]
#[test]
fn non_utf8_argument_is_syntax_error() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_findx"))
        .arg("-show")
        .arg(OsStr::from_bytes(b"caf\xe9.c"))
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env("FINDX_CONFIG_FILES", "=")
        .output()
        .expect("failed to execute findx");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.trim_end(),
        "findx: Error: Argument 'caf\u{fffd}.c' is not valid UTF-8"
    );
}

// ============================================================================
// Running the Pipeline
// ============================================================================

#[cfg(unix)]
#[test]
fn runs_find() {
    let dir = sample_tree();
    let (stdout, stderr, code) = run_in(env!("CARGO_BIN_EXE_findx"), dir.path(), &["*.c"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(sorted_lines(&stdout), ["./a.c", "./sub/c.c"]);
}

#[cfg(unix)]
#[test]
fn runs_find_with_exclusions() {
    let dir = sample_tree();
    let (stdout, stderr, code) = run_in(
        env!("CARGO_BIN_EXE_findx"),
        dir.path(),
        &["-x", "sub,.git", "-type", "f"],
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(sorted_lines(&stdout), ["./a.c", "./b.h", "./notes.txt"]);
}

#[cfg(unix)]
#[test]
fn runs_find_into_xargs() {
    let dir = sample_tree();
    let (stdout, stderr, code) = run_in(
        env!("CARGO_BIN_EXE_findx"),
        dir.path(),
        &["*.h", ":", "grep", "-l", "main"],
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(stdout.trim_end(), "./b.h");
}

#[cfg(unix)]
#[test]
fn xargs_failure_is_mapped() {
    let dir = sample_tree();
    let (_, _, code) = run_in(
        env!("CARGO_BIN_EXE_findx"),
        dir.path(),
        &["*.h", ":", "grep", "-q", "no-such-text"],
    );
    // grep exits 1 with no match, so xargs exits 123.
    assert_eq!(code, 123);
}
