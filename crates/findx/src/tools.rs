//! Locating and probing the external `find`, `xargs` and `grep` tools.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use findx_core::config::{Config, ToolStyle};
use findx_core::util::expand_user;
use findx_core::{FindxError, FindxResult};

/// Absolute path of `name`, searched on `PATH` if it has no directory part.
pub fn must_find_executable(name: &str) -> FindxResult<PathBuf> {
    which::which(name).map_err(|_| FindxError::ExecutableNotFound {
        executable: name.to_string(),
    })
}

/// Pick a tool from a `*_path` variable.
///
/// The first configured location that resolves to an executable wins. If
/// none does, the first location is returned and the failure surfaces when
/// the tool is actually run.
pub fn resolve_path_var(config: &mut Config, var: &str) -> FindxResult<String> {
    let locations: Vec<String> = config
        .get_non_empty(var)?
        .iter()
        .map(|loc| expand_user(loc).display().to_string())
        .collect();

    if let Some(found) = locations.iter().find(|loc| which::which(loc).is_ok()) {
        tracing::debug!(var, tool = %found, "resolved tool");
        return Ok(found.clone());
    }
    tracing::debug!(var, tool = %locations[0], "no configured tool found, using first");
    Ok(locations[0].clone())
}

/// Run `TOOL --version` and classify the tool as GNU or BSD.
///
/// Any failure to run the tool counts as BSD.
pub fn probe_gnu_style(tool: &str) -> ToolStyle {
    let output = Command::new(tool)
        .arg("--version")
        .stdin(Stdio::null())
        .output();

    let style = match output {
        Ok(output) if output.status.success() => {
            let mentions_gnu = |bytes: &[u8]| bytes.windows(3).any(|w| w == b"GNU");
            if mentions_gnu(&output.stdout) || mentions_gnu(&output.stderr) {
                ToolStyle::Gnu
            } else {
                ToolStyle::Bsd
            }
        }
        Ok(_) => ToolStyle::Bsd,
        Err(e) => {
            tracing::debug!(tool, error = %e, "style probe failed");
            ToolStyle::Bsd
        }
    };
    tracing::debug!(tool, %style, "probed tool style");
    style
}

/// Resolve a `*_style` variable, probing `tool` when the style is `probe`.
pub fn resolve_style(config: &mut Config, var: &str, tool: &str) -> FindxResult<ToolStyle> {
    match config.get_style(var)? {
        ToolStyle::Probe => Ok(probe_gnu_style(tool)),
        style => Ok(style),
    }
}
