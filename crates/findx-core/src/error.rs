//! Error types and exit code classification for findx.
//!
//! `FindxError` is the single error type surfaced to the command line. Every
//! variant belongs to one of three classes (see [`ErrorCode`]):
//!
//! - `1`: Syntax errors (bad command-line arguments or configuration)
//! - `2`: Runtime errors (missing executables, invalid roots, spawn failures)
//! - `3`: Internal errors (unexpected state inside findx)
//!
//! Messages are formatted so the caller can print them verbatim after a
//! `findx: Error: ` prefix.

use std::fmt;

use thiserror::Error;

// ============================================================================
// Error Codes
// ============================================================================

/// Exit code class for a [`FindxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    /// Invalid invocation (typically caused by bad user-supplied data).
    Syntax = 1,
    /// Failure while preparing or running the pipeline.
    Runtime = 2,
    /// Buggy code within findx.
    Internal = 3,
}

impl ErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for findx.
#[derive(Debug, Error)]
pub enum FindxError {
    /// Token stream exhausted while an argument was still required.
    #[error("Missing command-line argument")]
    MissingArgument,

    /// A token appeared where a different one was required.
    #[error("Got argument '{found}', expected '{expected}'")]
    UnexpectedArgument { found: String, expected: String },

    /// Arguments ran out where a specific token was required.
    #[error("Got end of arguments, expected '{expected}'")]
    UnexpectedEnd { expected: String },

    /// Unrecognized option where a term was expected.
    #[error("Invalid command-line option '{option}'")]
    InvalidOption { option: String },

    /// Command-line argument that is not valid UTF-8.
    #[error("Argument '{arg}' is not valid UTF-8")]
    InvalidArgumentEncoding { arg: String },

    /// `:` or `::` was given without any following xarg.
    #[error("Missing required xarg")]
    MissingXarg,

    /// `-print` cannot feed an xargs stage.
    #[error("Cannot mix '-print' with XARGS")]
    PrintWithXargs,

    /// Malformed line in a config source.
    #[error("In {source_name} for line '{line}': {reason}")]
    InvalidConfigLine {
        source_name: String,
        line: String,
        reason: String,
    },

    /// Unknown variable assigned in a config source.
    #[error("In {source_name} variable '{var}' is invalid")]
    InvalidConfigVar { source_name: String, var: String },

    /// Value that could not be split into words.
    #[error("In {source_name} for variable '{var}': {reason}")]
    InvalidConfigValue {
        source_name: String,
        var: String,
        reason: String,
    },

    /// Variable that must hold at least one value is empty.
    #[error("Variable '{var}' must not be empty")]
    InvalidEmptyConfigVar { var: String },

    /// Variable that must hold exactly one value does not.
    #[error("Variable '{var}' must be a single value")]
    InvalidScalarConfigVar { var: String },

    /// Variable holds a value outside its allowed choices.
    #[error("Variable '{var}' must be one of: {}", .choices.join(", "))]
    InvalidChoiceConfigVar { var: String, choices: Vec<String> },

    /// `config_files` keeps changing as more files are read.
    #[error("'config_files' setting does not stabilize")]
    ConfigFilesUnstable,

    /// Root path does not exist.
    #[error("Invalid root path '{root}'")]
    InvalidRoot { root: String },

    /// Executable could not be located on `PATH`.
    #[error("Executable '{executable}' not found")]
    ExecutableNotFound { executable: String },

    /// Failure spawning or waiting on a child process.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Failure reading a config file.
    #[error("Cannot read {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl FindxError {
    /// Create an `InvalidOption` error.
    pub fn invalid_option(option: impl Into<String>) -> Self {
        FindxError::InvalidOption {
            option: option.into(),
        }
    }

    /// Create an `UnexpectedArgument` error.
    pub fn unexpected(found: impl Into<String>, expected: impl Into<String>) -> Self {
        FindxError::UnexpectedArgument {
            found: found.into(),
            expected: expected.into(),
        }
    }

    /// Create an `InvalidConfigLine` error.
    pub fn config_line(
        source_name: impl Into<String>,
        line: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FindxError::InvalidConfigLine {
            source_name: source_name.into(),
            line: line.into(),
            reason: reason.into(),
        }
    }

    /// Create an `Internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        FindxError::Internal {
            message: message.into(),
        }
    }

    /// Exit code class for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::from(self)
    }
}

impl From<&FindxError> for ErrorCode {
    fn from(err: &FindxError) -> Self {
        match err {
            FindxError::MissingArgument
            | FindxError::UnexpectedArgument { .. }
            | FindxError::UnexpectedEnd { .. }
            | FindxError::InvalidOption { .. }
            | FindxError::InvalidArgumentEncoding { .. }
            | FindxError::MissingXarg
            | FindxError::PrintWithXargs
            | FindxError::InvalidConfigLine { .. }
            | FindxError::InvalidConfigVar { .. }
            | FindxError::InvalidConfigValue { .. }
            | FindxError::InvalidEmptyConfigVar { .. }
            | FindxError::InvalidScalarConfigVar { .. }
            | FindxError::InvalidChoiceConfigVar { .. }
            | FindxError::ConfigFilesUnstable => ErrorCode::Syntax,
            FindxError::InvalidRoot { .. }
            | FindxError::ExecutableNotFound { .. }
            | FindxError::Spawn { .. }
            | FindxError::ReadConfig { .. } => ErrorCode::Runtime,
            FindxError::Internal { .. } => ErrorCode::Internal,
        }
    }
}

/// Result type for findx operations.
pub type FindxResult<T> = Result<T, FindxError>;

// ============================================================================
// Tests
// ============================================================================
