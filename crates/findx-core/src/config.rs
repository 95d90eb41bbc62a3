//! Layered configuration variables.
//!
//! Every variable holds a list of words. A value is looked up in these
//! sources, highest priority first:
//!
//! 1. command-line switches (`--var-name VALUE`)
//! 2. environment variables (`FINDX_VAR_NAME`)
//! 3. the files named by `config_files`, last file first
//! 4. [`DEFAULT_CONFIG_TEXT`]
//!
//! A raw value may start with a merge operator. `+` appends to the value
//! inherited from the lower-priority sources, `^` prepends, `-` removes and
//! `=` assigns whatever follows literally. Without an operator the value is
//! assigned.
//!
//! `config_files` can itself be set in a config file, so the file list is
//! resolved to a fixed point before any other variable is read.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::sync::LazyLock;

use crate::error::{FindxError, FindxResult};
use crate::quoting::{joined_lines, quoted_join, quoted_split, split_leading_whitespace, UnclosedQuote};
use crate::util::expand_user;

/// Built-in defaults, also shown by `-show-defaults`.
pub const DEFAULT_CONFIG_TEXT: &str = r"# Configuration files to use in order of increasing priority.
config_files =
    /etc/findx/config
    ~/.config/findx/config

# Names and/or absolute paths for the 'find' utility.  The first-found
# choice will be used (must not be empty).
find_path = gnufind find

# Style of find utility: probe, gnu, bsd, posix
find_style = probe

# Names and/or absolute paths for the 'xargs' utility.  The first-found
# choice will be used (must not be empty).
xargs_path = gnuxargs xargs

# Style of xargs utility: probe, gnu, bsd, posix
xargs_style = probe

# Names and/or absolute paths for the 'grep' utility.  The first-found
# choice will be used (must not be empty).
grep_path = gnugrep grep

# Style of grep utility: probe, gnu, bsd, posix
grep_style = probe

# Extra grep arguments for use when grep_style = gnu.
gnu_grep_args = '-H' '--color=auto'

# Extra grep arguments for use when grep_style = bsd.
bsd_grep_args = '-H' '--color=auto'

# Extra grep arguments for use when grep_style = posix.
posix_grep_args =

# Directory globs excluded by '-stdxd'.
stdxd =
    .svn .git .bzr .hg .undo build *export pkgexp
    bak *.egg-info *.egg .mypy_cache .tox htmlcov

# File globs excluded by '-stdxf'.
stdxf =
    *.bak *~ *.tmp
    *.o *.a *.so *.ds *.os *.sbr *.pch *.pdb *.pyc *.pyo
    *.zip *.tar *.gz *.bz2
    *.bin *.elf *.exe *.obj *.dll *.lib *.suo
    *.bmp *.ico *.gif *.jpg *.png
    *.pdf
    .*.sw? tags";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "FINDX_";

/// Passes allowed for `config_files` to reach a fixed point.
const MAX_CONFIG_FILES_PASSES: usize = 10;

/// Variable names assigned in [`DEFAULT_CONFIG_TEXT`], in order.
static VALID_VARS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    DEFAULT_CONFIG_TEXT
        .lines()
        .filter_map(|line| {
            let end = line
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(line.len());
            (end > 0).then_some(&line[..end])
        })
        .collect()
});

/// Names of all configuration variables.
pub fn valid_vars() -> &'static [&'static str] {
    &VALID_VARS
}

pub fn is_valid_var(var: &str) -> bool {
    VALID_VARS.contains(&var)
}

/// Convert a command-line switch such as `--find-path` to `find_path`.
pub fn switch_to_var(switch: &str) -> String {
    switch.trim_start_matches('-').replace('-', "_")
}

/// Format a variable as a config-file assignment.
pub fn format_setting<S: AsRef<str>>(var: &str, value: &[S]) -> String {
    let joined = quoted_join(value);
    if joined.is_empty() {
        format!("{var} =")
    } else {
        format!("{var} = {joined}")
    }
}

// ============================================================================
// Raw Values
// ============================================================================

/// How a value combines with the value inherited from lower-priority sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOp {
    Append,
    Prepend,
    Remove,
    Assign,
}

impl MergeOp {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(MergeOp::Append),
            '^' => Some(MergeOp::Prepend),
            '-' => Some(MergeOp::Remove),
            '=' => Some(MergeOp::Assign),
            _ => None,
        }
    }

    fn merge(self, parent: Vec<String>, value: Vec<String>) -> Vec<String> {
        match self {
            MergeOp::Append => {
                let mut merged = parent;
                merged.extend(value);
                merged
            }
            MergeOp::Prepend => {
                let mut merged = value;
                merged.extend(parent);
                merged
            }
            MergeOp::Remove => {
                let mut merged = parent;
                for v in &value {
                    if let Some(pos) = merged.iter().position(|m| m == v) {
                        merged.remove(pos);
                    }
                }
                merged
            }
            MergeOp::Assign => value,
        }
    }
}

/// Split a raw value into its merge operator and words.
pub fn parse_raw_value(raw: &str) -> Result<(MergeOp, Vec<String>), UnclosedQuote> {
    let mut chars = raw.chars();
    let (op, rest) = match chars.next().and_then(MergeOp::from_char) {
        Some(op) => (op, chars.as_str()),
        None => (MergeOp::Assign, raw),
    };
    Ok((op, quoted_split(rest)?))
}

// ============================================================================
// Settings
// ============================================================================

/// Raw (unsplit) assignments from one source.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    name: String,
    values: HashMap<String, String>,
}

impl Settings {
    pub fn new(name: impl Into<String>) -> Self {
        Settings {
            name: name.into(),
            values: HashMap::new(),
        }
    }

    /// Parse config-file text.
    pub fn from_text(name: impl Into<String>, text: &str) -> FindxResult<Self> {
        let mut settings = Settings::new(name);
        settings.set_text(text)?;
        Ok(settings)
    }

    /// Load a config file. A missing file yields empty settings.
    pub fn from_file(path: &str) -> FindxResult<Self> {
        let name = format!("config file '{path}'");
        let expanded = expand_user(path);
        if !expanded.exists() {
            tracing::debug!(path, "config file not found");
            return Ok(Settings::new(name));
        }
        let text = fs::read_to_string(&expanded).map_err(|source| FindxError::ReadConfig {
            path: expanded.display().to_string(),
            source,
        })?;
        tracing::debug!(path, "loaded config file");
        Settings::from_text(name, &text)
    }

    /// Collect `FINDX_*` variables from the process environment.
    pub fn from_env() -> Self {
        Settings::from_env_vars(std::env::vars())
    }

    /// Collect `FINDX_*` variables from `vars`.
    pub fn from_env_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut settings = Settings::new("[Environment]");
        for (key, value) in vars {
            if let Some(var) = key.as_ref().strip_prefix(ENV_PREFIX) {
                settings.values.insert(var.to_lowercase(), value.into());
            }
        }
        settings
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, var: &str) -> Option<&str> {
        self.values.get(var).map(String::as_str)
    }

    pub fn insert(&mut self, var: impl Into<String>, raw_value: impl Into<String>) {
        self.values.insert(var.into(), raw_value.into());
    }

    /// Variable names, sorted.
    pub fn vars(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = self.values.keys().map(String::as_str).collect();
        vars.sort_unstable();
        vars
    }

    fn set_text(&mut self, text: &str) -> FindxResult<()> {
        for line in joined_lines(text.lines()) {
            let (leading, _) = split_leading_whitespace(&line);
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if !leading.is_empty() {
                return Err(FindxError::config_line(&self.name, line, "Unexpected indentation"));
            }
            let Some((var, value)) = line.split_once('=') else {
                return Err(FindxError::config_line(&self.name, line, "Missing '='"));
            };
            let var = var.trim_end();
            if var.is_empty() {
                return Err(FindxError::config_line(&self.name, line, "Missing variable name"));
            }
            if self.values.contains_key(var) {
                return Err(FindxError::config_line(&self.name, line, "Duplicate assignment"));
            }
            self.values
                .insert(var.to_string(), value.trim_start().to_string());
        }
        Ok(())
    }

    /// Reject unknown variables and unsplittable values.
    fn validate(&self) -> FindxResult<()> {
        for var in self.vars() {
            if !is_valid_var(var) {
                return Err(FindxError::InvalidConfigVar {
                    source_name: self.name.clone(),
                    var: var.to_string(),
                });
            }
            self.parse(var)?;
        }
        Ok(())
    }

    fn parse(&self, var: &str) -> FindxResult<Option<(MergeOp, Vec<String>)>> {
        let Some(raw) = self.get(var) else {
            return Ok(None);
        };
        parse_raw_value(raw)
            .map(Some)
            .map_err(|err| FindxError::InvalidConfigValue {
                source_name: self.name.clone(),
                var: var.to_string(),
                reason: err.to_string(),
            })
    }
}

// ============================================================================
// Tool Styles
// ============================================================================

/// Dialect of an external tool, selected by the `*_style` variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStyle {
    /// Run `TOOL --version` and look for GNU.
    Probe,
    Gnu,
    Bsd,
    Posix,
}

impl ToolStyle {
    pub const CHOICES: [&'static str; 4] = ["probe", "gnu", "bsd", "posix"];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolStyle::Probe => "probe",
            ToolStyle::Gnu => "gnu",
            ToolStyle::Bsd => "bsd",
            ToolStyle::Posix => "posix",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "probe" => Some(ToolStyle::Probe),
            "gnu" => Some(ToolStyle::Gnu),
            "bsd" => Some(ToolStyle::Bsd),
            "posix" => Some(ToolStyle::Posix),
            _ => None,
        }
    }

    /// True for styles whose tools understand NUL-separated names
    /// (`find -print0`, `xargs -0`).
    pub fn has_nul_separators(self) -> bool {
        matches!(self, ToolStyle::Gnu | ToolStyle::Bsd)
    }
}

impl fmt::Display for ToolStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    CommandLine,
    Environment,
    File(String),
    Defaults,
}

/// Resolves variables across all sources.
#[derive(Debug)]
pub struct Config {
    command_line: Settings,
    environment: Settings,
    defaults: Settings,
    files: HashMap<String, Settings>,
    config_files: Vec<String>,
    config_files_stable: bool,
}

impl Config {
    /// Configuration backed by the process environment.
    pub fn new() -> FindxResult<Self> {
        Config::with_environment(Settings::from_env())
    }

    /// Configuration with an explicit environment source.
    pub fn with_environment(environment: Settings) -> FindxResult<Self> {
        let defaults = Settings::from_text("[Default Settings]", DEFAULT_CONFIG_TEXT)
            .map_err(|err| FindxError::internal(format!("bad default config: {err}")))?;
        Ok(Config {
            command_line: Settings::new("[command line]"),
            environment,
            defaults,
            files: HashMap::new(),
            config_files: Vec::new(),
            config_files_stable: false,
        })
    }

    /// Resolved value of `var`.
    pub fn get(&mut self, var: &str) -> FindxResult<Vec<String>> {
        self.get_merged(var, MergeOp::Append, Vec::new())
    }

    /// Resolved value of `var`, which must not be empty.
    pub fn get_non_empty(&mut self, var: &str) -> FindxResult<Vec<String>> {
        let value = self.get(var)?;
        if value.is_empty() {
            return Err(FindxError::InvalidEmptyConfigVar {
                var: var.to_string(),
            });
        }
        Ok(value)
    }

    /// Resolved value of `var`, which must be exactly one word.
    pub fn get_scalar(&mut self, var: &str) -> FindxResult<String> {
        let mut value = self.get(var)?;
        match value.pop() {
            Some(word) if value.is_empty() => Ok(word),
            _ => Err(FindxError::InvalidScalarConfigVar {
                var: var.to_string(),
            }),
        }
    }

    /// Resolved value of `var`, which must be one of `choices`.
    pub fn get_choice(&mut self, var: &str, choices: &[&str]) -> FindxResult<String> {
        let value = self.get_scalar(var)?;
        if !choices.contains(&value.as_str()) {
            return Err(FindxError::InvalidChoiceConfigVar {
                var: var.to_string(),
                choices: choices.iter().map(|c| c.to_string()).collect(),
            });
        }
        Ok(value)
    }

    /// Resolved value of a `*_style` variable.
    pub fn get_style(&mut self, var: &str) -> FindxResult<ToolStyle> {
        let value = self.get_choice(var, &ToolStyle::CHOICES)?;
        ToolStyle::parse(&value)
            .ok_or_else(|| FindxError::internal(format!("unhandled style '{value}'")))
    }

    /// Merge `value` into `var` and store the result as a command-line setting.
    pub fn set(&mut self, var: &str, op: MergeOp, value: Vec<String>) -> FindxResult<()> {
        let merged = self.get_merged(var, op, value)?;
        tracing::debug!(var, value = ?merged, "set config variable");
        self.command_line.insert(var, quoted_join(&merged));
        if var == "config_files" {
            self.config_files_stable = false;
        }
        Ok(())
    }

    /// Config files in effect, in order of increasing priority.
    pub fn config_files(&mut self) -> FindxResult<Vec<String>> {
        self.stabilize_config_files()?;
        Ok(self.config_files.clone())
    }

    fn get_merged(&mut self, var: &str, op: MergeOp, value: Vec<String>) -> FindxResult<Vec<String>> {
        let sources = self.sources()?;
        self.resolve(var, &sources, op, value)
    }

    fn resolve(
        &self,
        var: &str,
        sources: &[Source],
        op: MergeOp,
        value: Vec<String>,
    ) -> FindxResult<Vec<String>> {
        if op == MergeOp::Assign {
            return Ok(value);
        }
        let mut parent = Vec::new();
        for (i, source) in sources.iter().enumerate() {
            if let Some((source_op, source_value)) = self.settings(source)?.parse(var)? {
                parent = self.resolve(var, &sources[i + 1..], source_op, source_value)?;
                break;
            }
        }
        Ok(op.merge(parent, value))
    }

    fn settings(&self, source: &Source) -> FindxResult<&Settings> {
        match source {
            Source::CommandLine => Ok(&self.command_line),
            Source::Environment => Ok(&self.environment),
            Source::Defaults => Ok(&self.defaults),
            Source::File(path) => self
                .files
                .get(path)
                .ok_or_else(|| FindxError::internal(format!("config file '{path}' not loaded"))),
        }
    }

    fn sources(&mut self) -> FindxResult<Vec<Source>> {
        self.stabilize_config_files()?;
        let mut sources = vec![Source::CommandLine, Source::Environment];
        for path in self.config_files.clone().into_iter().rev() {
            self.load_file(&path)?;
            sources.push(Source::File(path));
        }
        sources.push(Source::Defaults);
        Ok(sources)
    }

    fn stabilize_config_files(&mut self) -> FindxResult<()> {
        if self.config_files_stable {
            return Ok(());
        }
        // Lookups made while stabilizing use the current file list as-is.
        self.config_files_stable = true;
        for _ in 0..MAX_CONFIG_FILES_PASSES {
            let config_files = self.get("config_files")?;
            if config_files == self.config_files {
                tracing::debug!(files = ?self.config_files, "config files resolved");
                return Ok(());
            }
            self.config_files = config_files;
        }
        Err(FindxError::ConfigFilesUnstable)
    }

    fn load_file(&mut self, path: &str) -> FindxResult<()> {
        if !self.files.contains_key(path) {
            let settings = Settings::from_file(path)?;
            settings.validate()?;
            self.files.insert(path.to_string(), settings);
        }
        Ok(())
    }
}
