//! findx: shortcuts for `find` and `find | xargs`.
//!
//! The `findx`, `ffx` and `ffg` binaries all call [`run_main`]; `ffx` and
//! `ffg` only differ in the abbreviation they prepend to the arguments.
//!
//! ## Usage
//!
//! ```bash
//! # Grep for 'main' in .c and .cpp files
//! findx '*.{c,cpp}' : grep main
//!
//! # Show the command instead of running it
//! findx -show -stdx -type d : ls -ld
//!
//! # Grep through all files with standard exclusions
//! ffg main
//! ```

pub mod cli;
pub mod help;
pub mod pipeline;
pub mod tools;

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use findx_core::config::Config;
use findx_core::{FindxError, FindxResult};

use crate::cli::{Findx, Mode};

/// Outer command line. Everything after `--log-level` belongs to findx.
#[derive(Parser, Debug)]
#[command(
    name = "findx",
    about = "Shortcuts for find and find | xargs",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Log level for tracing output.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// findx arguments (see `findx -help`).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Initialize tracing; `RUST_LOG` overrides `--log-level`.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Entry point shared by the findx binaries.
///
/// `prefix` is inserted before the user's arguments (`-ffx` for `ffx`).
pub fn run_main(prefix: Option<&str>) -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let result = utf8_args(cli.args).and_then(|mut args| {
        if let Some(prefix) = prefix {
            args.insert(0, prefix.to_string());
        }
        run(args)
    });

    match result {
        Ok(status) => ExitCode::from(u8::try_from(status).unwrap_or(u8::MAX)),
        Err(err) => {
            eprintln!("findx: Error: {err}");
            ExitCode::from(err.code().code())
        }
    }
}

/// Convert raw arguments, rejecting any that are not valid UTF-8.
fn utf8_args(args: Vec<OsString>) -> FindxResult<Vec<String>> {
    args.into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|arg| FindxError::InvalidArgumentEncoding {
                    arg: arg.to_string_lossy().into_owned(),
                })
        })
        .collect()
}

/// Parse `args`, then print or run what they ask for.
pub fn run(args: Vec<String>) -> FindxResult<i32> {
    let _span = tracing::debug_span!("findx").entered();

    let config = Config::new()?;
    let invocation = Findx::new(config).parse_command_line(args)?;

    for line in &invocation.output {
        println!("{line}");
    }

    match invocation.mode {
        Mode::Help => println!("{}", help::help_text()),
        Mode::Version => println!("{}", help::version_text()),
        Mode::Readme => println!("{}", help::README.trim_end()),
        Mode::Show => println!("{}", invocation.pipeline.command_line()),
        Mode::Shown => {}
        Mode::Run => return invocation.pipeline.run(&invocation.roots),
    }
    Ok(0)
}
