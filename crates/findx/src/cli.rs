//! The findx command line.
//!
//! [`Findx`] consumes the findx argument list and assembles the `find` (and
//! optional `xargs`) command it stands for. Arguments are read in two modes:
//!
//! - FINDX MODE (the default): findx options, `find` options, roots and
//!   metaglobs, in any order
//! - XARGS MODE: every argument is appended to the `xargs` command
//!
//! | Argument | Effect |
//! |----------|--------|
//! | `:`      | XARGS MODE; an xarg must follow |
//! | `::`     | XARGS MODE for the rest of the line; an xarg must follow |
//! | `[`      | back to FINDX MODE (an xarg once XARGS MODE is permanent) |
//! | `]`      | XARGS MODE |
//! | `]]`     | XARGS MODE for the rest of the line |
//!
//! Abbreviations (`-stdx`, `-ff`, `-ffx`, `-ffg`) and `-grep` work by
//! pushing their expansion back onto the argument stream.

use std::path::Path;

use findx_core::config::{
    format_setting, is_valid_var, parse_raw_value, switch_to_var, valid_vars, Config, ToolStyle,
    DEFAULT_CONFIG_TEXT,
};
use findx_core::cursor::ArgCursor;
use findx_core::expr::{distribute_option, ExprParser};
use findx_core::tables::{has_meta, is_post_path, is_pre_path, is_reserved};
use findx_core::{expand_glob, FindxError, FindxResult};

use crate::pipeline::Pipeline;
use crate::tools::{resolve_path_var, resolve_style};

/// What to do once the command line has been parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Run the pipeline.
    #[default]
    Run,
    Help,
    Version,
    Readme,
    /// Print the pipeline instead of running it (`-show`).
    Show,
    /// Only print the lines requested by `-show-var` and friends.
    Shown,
}

/// A fully parsed findx command line.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub mode: Mode,
    /// Lines produced by `-show-var`, `-show-vars` and `-show-defaults`.
    pub output: Vec<String>,
    pub roots: Vec<String>,
    pub pipeline: Pipeline,
}

/// Append `extension` to `base`, joined with `-o` when both are non-empty.
fn or_extend(base: &mut Vec<String>, extension: Vec<String>) {
    if !base.is_empty() && !extension.is_empty() {
        base.push("-o".to_string());
    }
    base.extend(extension);
}

/// `-iname` tests OR'ed over every alternative of every glob.
fn iname_globs<S: AsRef<str>>(globs: &[S]) -> Vec<String> {
    let alternatives: Vec<String> = globs
        .iter()
        .flat_map(|glob| expand_glob(glob.as_ref()))
        .collect();
    if alternatives.is_empty() {
        return alternatives;
    }
    distribute_option("-iname", &alternatives)
}

/// True if `arg` should be taken as a root path.
///
/// Roots never start with `-`, are never reserved words, and contain glob
/// metacharacters only if they name an existing path.
pub fn matches_root(arg: &str) -> bool {
    !is_reserved(arg) && !arg.starts_with('-') && (!has_meta(arg) || Path::new(arg).exists())
}

/// findx command-line parser.
#[derive(Debug)]
pub struct Findx {
    config: Config,
    parser: ExprParser,
    pre_path_options: Vec<String>,
    post_path_options: Vec<String>,
    roots: Vec<String>,
    excludes: Vec<String>,
    includes: Vec<String>,
    expression: Vec<String>,
    xargs: Vec<String>,
    in_xargs: bool,
    locked_in_xargs: bool,
    need_xarg: bool,
    stdxd: bool,
    stdxf: bool,
    show: bool,
    show_help: bool,
    show_version: bool,
    show_readme: bool,
    output: Vec<String>,
}

impl Findx {
    pub fn new(config: Config) -> Self {
        Findx {
            config,
            parser: ExprParser::default(),
            pre_path_options: Vec::new(),
            post_path_options: Vec::new(),
            roots: Vec::new(),
            excludes: Vec::new(),
            includes: Vec::new(),
            expression: Vec::new(),
            xargs: Vec::new(),
            in_xargs: false,
            locked_in_xargs: false,
            need_xarg: false,
            stdxd: false,
            stdxf: false,
            show: false,
            show_help: false,
            show_version: false,
            show_readme: false,
            output: Vec::new(),
        }
    }

    /// Parse `args` and assemble the pipeline.
    pub fn parse_command_line(mut self, args: Vec<String>) -> FindxResult<Invocation> {
        self.parse_findx_args(args)?;
        let pipeline = self.assemble()?;

        let mode = if self.show_help {
            Mode::Help
        } else if self.show_version {
            Mode::Version
        } else if self.show_readme {
            Mode::Readme
        } else if self.show {
            Mode::Show
        } else if !self.output.is_empty() {
            Mode::Shown
        } else {
            Mode::Run
        };

        Ok(Invocation {
            mode,
            output: self.output,
            roots: self.roots,
            pipeline,
        })
    }

    fn cursor(&mut self) -> &mut ArgCursor {
        self.parser.cursor_mut()
    }

    fn parse_findx_args(&mut self, args: Vec<String>) -> FindxResult<()> {
        self.parser = ExprParser::new(ArgCursor::new(args));

        while !self.parser.cursor().is_empty() {
            let arg = self.cursor().pop()?;
            if arg == "[" && !self.locked_in_xargs {
                self.in_xargs = false;
            } else if self.in_xargs {
                self.xargs.push(arg);
                self.need_xarg = false;
            } else {
                match arg.as_str() {
                    "]" => self.in_xargs = true,
                    "]]" => {
                        self.in_xargs = true;
                        self.locked_in_xargs = true;
                    }
                    ":" => {
                        self.in_xargs = true;
                        self.need_xarg = true;
                    }
                    "::" => {
                        self.in_xargs = true;
                        self.need_xarg = true;
                        self.locked_in_xargs = true;
                    }
                    _ => self.parse_findx_arg(arg)?,
                }
            }
        }

        if self.need_xarg {
            return Err(FindxError::MissingXarg);
        }
        if self.parser.saw_print() && !self.xargs.is_empty() {
            return Err(FindxError::PrintWithXargs);
        }
        if self.roots.is_empty() {
            self.roots.push(".".to_string());
        }
        tracing::debug!(
            roots = ?self.roots,
            expression = ?self.expression,
            xargs = ?self.xargs,
            "parsed findx arguments"
        );
        Ok(())
    }

    fn parse_findx_arg(&mut self, arg: String) -> FindxResult<()> {
        if self.parse_show_arg(&arg)? || self.parse_abbrev_arg(&arg) || self.parse_exclude_arg(&arg)? {
            return Ok(());
        }

        if arg == "-root" {
            let root = self.cursor().pop()?;
            self.roots.push(root);
        } else if arg == "-grep" {
            let grep_tool = resolve_path_var(&mut self.config, "grep_path")?;
            let grep_style = resolve_style(&mut self.config, "grep_style", &grep_tool)?;
            let grep_args = self.config.get(&format!("{grep_style}_grep_args"))?;

            let mut expansion = vec![":".to_string(), grep_tool];
            expansion.extend(grep_args);
            expansion.extend(["[".to_string(), ":".to_string()]);
            self.cursor().push_all(expansion);
        } else if is_pre_path(&arg) {
            self.cursor().push(arg);
            let option = self.parser.option_list()?;
            self.pre_path_options.extend(option);
        } else if is_post_path(&arg) {
            self.cursor().push(arg);
            let option = self.parser.option_list()?;
            self.post_path_options.extend(option);
        } else if matches_root(&arg) {
            self.roots.push(arg);
        } else if let Some(switch) = arg.strip_prefix("--") {
            let var = switch_to_var(switch);
            if !is_valid_var(&var) {
                return Err(FindxError::invalid_option(arg));
            }
            let raw_value = self.cursor().pop()?;
            let (op, value) =
                parse_raw_value(&raw_value).map_err(|err| FindxError::InvalidConfigValue {
                    source_name: "Command line".to_string(),
                    var: var.clone(),
                    reason: err.to_string(),
                })?;
            self.config.set(&var, op, value)?;
        } else {
            self.cursor().push(arg);
            let fragment = self.parser.expression()?;
            self.expression.extend(fragment);
        }
        Ok(())
    }

    fn parse_show_arg(&mut self, arg: &str) -> FindxResult<bool> {
        match arg {
            "-help" | "--help" => self.show_help = true,
            "-version" | "--version" => self.show_version = true,
            "-readme" | "--readme" => self.show_readme = true,
            "-show" => self.show = true,
            "-show-var" => {
                let var = self.cursor().pop()?;
                let value = self.config.get(&var)?;
                self.output.push(format_setting(&var, &value));
            }
            "-show-vars" => {
                for var in valid_vars() {
                    let value = self.config.get(var)?;
                    self.output.push(format_setting(var, &value));
                }
            }
            "-show-defaults" => {
                self.output
                    .extend(DEFAULT_CONFIG_TEXT.lines().map(String::from));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn parse_abbrev_arg(&mut self, arg: &str) -> bool {
        let expansion: &[&str] = match arg {
            "-stdx" => &["-stdxd", "-stdxf"],
            "-ff" => &["-L", "-type", "f"],
            "-ffx" => &["-stdx", "-ff"],
            "-ffg" => &["-ffx", "-grep"],
            _ => return false,
        };
        self.cursor().push_all(expansion.iter().copied());
        true
    }

    fn parse_exclude_arg(&mut self, arg: &str) -> FindxResult<bool> {
        match arg {
            "-stdxd" => self.stdxd = true,
            "-stdxf" => self.stdxf = true,
            "-x" | "-e" => {
                let term = self.parser.term()?;
                or_extend(&mut self.excludes, term);
            }
            "-i" => {
                if self.cursor().peek()? == "*" {
                    self.cursor().pop()?;
                    self.includes.clear();
                    self.excludes.clear();
                    self.stdxd = false;
                    self.stdxf = false;
                } else {
                    let term = self.parser.term()?;
                    or_extend(&mut self.includes, term);
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Build the `find` and `xargs` argument lists.
    fn assemble(&mut self) -> FindxResult<Pipeline> {
        let find_tool = resolve_path_var(&mut self.config, "find_path")?;
        let find_style = resolve_style(&mut self.config, "find_style", &find_tool)?;

        let mut find = vec![find_tool];
        find.extend(self.pre_path_options.iter().cloned());
        find.extend(self.roots.iter().cloned());
        find.extend(self.post_path_options.iter().cloned());

        let mut excludes = Vec::new();
        if self.stdxd {
            let globs = iname_globs(&self.config.get("stdxd")?);
            if !globs.is_empty() {
                let mut term = vec!["-type".to_string(), "d".to_string()];
                term.extend(globs);
                or_extend(&mut excludes, term);
            }
        }
        if self.stdxf {
            let globs = iname_globs(&self.config.get("stdxf")?);
            if !globs.is_empty() {
                let mut term = vec!["-not".to_string(), "-type".to_string(), "d".to_string()];
                term.extend(globs);
                or_extend(&mut excludes, term);
            }
        }
        or_extend(&mut excludes, std::mem::take(&mut self.excludes));

        if !excludes.is_empty() {
            find.push("(".to_string());
            find.extend(excludes.iter().cloned());
            find.push(")".to_string());
            if !self.includes.is_empty() {
                find.push("!".to_string());
                find.push("(".to_string());
                find.extend(self.includes.iter().cloned());
                find.push(")".to_string());
            }
            find.push("-prune".to_string());
            find.push("-o".to_string());
        }

        if !self.expression.is_empty() {
            find.push("(".to_string());
            find.extend(self.expression.iter().cloned());
            find.push(")".to_string());
        }

        let need_print = !self.parser.saw_action() && (!self.xargs.is_empty() || !excludes.is_empty());
        let mut print_action = "-print";

        let mut xargs = Vec::new();
        if !self.xargs.is_empty() {
            let xargs_tool = resolve_path_var(&mut self.config, "xargs_path")?;
            let xargs_style = resolve_style(&mut self.config, "xargs_style", &xargs_tool)?;
            xargs.push(xargs_tool);
            if xargs_style.has_nul_separators() && find_style.has_nul_separators() {
                xargs.push("-0".to_string());
                print_action = "-print0";
            }
            if xargs_style == ToolStyle::Gnu {
                xargs.push("--no-run-if-empty".to_string());
            }
            xargs.extend(self.xargs.iter().cloned());
        }

        if need_print {
            find.push(print_action.to_string());
        }

        Ok(Pipeline { find, xargs })
    }
}
