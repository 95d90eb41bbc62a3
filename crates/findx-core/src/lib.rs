//! Core of findx.
//!
//! This crate turns findx shorthand into `find` arguments without touching
//! any processes:
//! - `find` option tables and classification
//! - Extended glob expansion (`*.{c,h}`, `a|b`, `a[,]b`)
//! - Recursive-descent parsing of `find` expressions
//! - Shell-style quoting of configuration values
//! - Layered configuration variables
//! - Exit status mapping for the `find | xargs` pipeline
//! - Error types and error codes

pub mod config;
pub mod cursor;
pub mod error;
pub mod expr;
pub mod glob;
pub mod quoting;
pub mod status;
pub mod tables;
pub mod util;

pub use error::{ErrorCode, FindxError, FindxResult};
pub use expr::{parse_expression, ParsedExpression};
pub use glob::expand_glob;
