//! Running `find`, alone or piped into `xargs`.
//!
//! No shell is involved: `find`'s stdout is connected straight to `xargs`'s
//! stdin, and both exit statuses are merged into one (see
//! [`findx_core::status`]).

use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use findx_core::quoting::optionally_quoted_join;
use findx_core::status::{merge_find_xargs_status, SIGNAL_BASE};
use findx_core::{FindxError, FindxResult};

use crate::tools::must_find_executable;

/// The assembled `find` and `xargs` command lines.
///
/// Each list starts with the tool name. `xargs` is empty when there is no
/// xargs stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    pub find: Vec<String>,
    pub xargs: Vec<String>,
}

impl Pipeline {
    /// The pipeline as a shell-style command line (`find ... | xargs ...`).
    pub fn command_line(&self) -> String {
        let mut line = optionally_quoted_join(&self.find);
        if !self.xargs.is_empty() {
            line.push_str(" | ");
            line.push_str(&optionally_quoted_join(&self.xargs));
        }
        line
    }

    /// Run the pipeline and return the merged exit status.
    ///
    /// Every root must exist before anything is spawned.
    pub fn run(&self, roots: &[String]) -> FindxResult<i32> {
        for root in roots {
            if !Path::new(root).exists() {
                return Err(FindxError::InvalidRoot { root: root.clone() });
            }
        }

        let (find_name, find_args) = split_program(&self.find)?;
        let find_exe = must_find_executable(find_name)?;

        let Some((xargs_name, xargs_args)) = self.xargs.split_first() else {
            tracing::debug!(find = ?self.find, "running find");
            let mut find = spawn(find_name, Command::new(&find_exe).args(find_args))?;
            let find_status = wait(find_name, &mut find)?;
            return Ok(merge_find_xargs_status(find_status, 0));
        };
        let xargs_exe = must_find_executable(xargs_name)?;

        tracing::debug!(find = ?self.find, xargs = ?self.xargs, "running find | xargs");
        let mut find = spawn(
            find_name,
            Command::new(&find_exe).args(find_args).stdout(Stdio::piped()),
        )?;
        let find_stdout = find
            .stdout
            .take()
            .ok_or_else(|| FindxError::internal("find stdout was not captured"))?;
        let spawned = spawn(
            xargs_name,
            Command::new(&xargs_exe).args(xargs_args).stdin(find_stdout),
        );
        let mut xargs = match spawned {
            Ok(child) => child,
            Err(err) => {
                abandon(find_name, &mut find);
                return Err(err);
            }
        };

        let find_status = wait(find_name, &mut find)?;
        let xargs_status = wait(xargs_name, &mut xargs)?;
        tracing::debug!(find_status, xargs_status, "pipeline finished");
        Ok(merge_find_xargs_status(find_status, xargs_status))
    }
}

fn split_program(args: &[String]) -> FindxResult<(&str, &[String])> {
    args.split_first()
        .map(|(name, rest)| (name.as_str(), rest))
        .ok_or_else(|| FindxError::internal("empty find command"))
}

fn spawn(program: &str, command: &mut Command) -> FindxResult<Child> {
    command.spawn().map_err(|source| FindxError::Spawn {
        program: program.to_string(),
        source,
    })
}

fn wait(program: &str, child: &mut Child) -> FindxResult<i32> {
    let status = child.wait().map_err(|source| FindxError::Spawn {
        program: program.to_string(),
        source,
    })?;
    Ok(status_code(status))
}

/// Kill and reap a child whose output is no longer wanted.
fn abandon(program: &str, child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!(program, error = %e, "kill failed");
    }
    if let Err(e) = child.wait() {
        tracing::debug!(program, error = %e, "wait failed");
    }
}

/// Exit code of a finished process, or `128+n` if it died on signal `n`.
pub fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return SIGNAL_BASE + signal;
        }
    }
    SIGNAL_BASE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn command_line_without_xargs() {
        let pipeline = Pipeline {
            find: words("find . ( -name *.c )"),
            xargs: Vec::new(),
        };
        assert_eq!(pipeline.command_line(), "find . ( -name *.c )");
    }

    #[test]
    fn command_line_quotes_when_needed() {
        let pipeline = Pipeline {
            find: vec!["find".into(), "my dir".into(), "-print0".into()],
            xargs: words("xargs -0 grep main"),
        };
        assert_eq!(
            pipeline.command_line(),
            "find 'my dir' -print0 | xargs -0 grep main"
        );
    }

    #[test]
    fn invalid_root_is_checked_first() {
        let pipeline = Pipeline {
            find: words("findx-no-such-find"),
            xargs: Vec::new(),
        };
        let roots = vec!["/findx/no/such/root".to_string()];
        match pipeline.run(&roots) {
            Err(FindxError::InvalidRoot { root }) => assert_eq!(root, "/findx/no/such/root"),
            other => panic!("expected InvalidRoot, got {other:?}"),
        }
    }

    #[test]
    fn missing_find_executable() {
        let pipeline = Pipeline {
            find: words("findx-no-such-find"),
            xargs: Vec::new(),
        };
        assert!(matches!(
            pipeline.run(&[".".to_string()]),
            Err(FindxError::ExecutableNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn abandoned_child_is_reaped() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        abandon("sleep", &mut child);
        let status = child.try_wait().unwrap().expect("child was not reaped");
        assert_eq!(status_code(status), 137);
    }

    #[cfg(unix)]
    #[test]
    fn unspawnable_xargs_is_reported() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let bogus = dir.path().join("bogus-xargs");
        fs::write(&bogus, b"\x00\x01\x02\x03").unwrap();
        fs::set_permissions(&bogus, fs::Permissions::from_mode(0o755)).unwrap();

        let root = dir.path().display().to_string();
        let pipeline = Pipeline {
            find: vec!["find".to_string(), root.clone(), "-print0".to_string()],
            xargs: vec![bogus.display().to_string(), "-0".to_string()],
        };
        match pipeline.run(&[root]) {
            Err(FindxError::Spawn { program, .. }) => {
                assert_eq!(program, bogus.display().to_string())
            }
            other => panic!("expected Spawn, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn exit_statuses() {
        let ok = Command::new("true").status().unwrap();
        assert_eq!(status_code(ok), 0);
        let failed = Command::new("false").status().unwrap();
        assert_eq!(status_code(failed), 1);
    }

    #[cfg(unix)]
    #[test]
    fn signal_status() {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(status_code(ExitStatus::from_raw(9)), 137);
    }
}
