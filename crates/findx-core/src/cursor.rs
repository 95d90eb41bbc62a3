//! Argument stream shared by the expression parser and the findx dispatcher.
//!
//! Tokens are consumed from the front. Abbreviations such as `-ffx` work by
//! pushing their expansion back onto the front of the stream.

use std::collections::VecDeque;

use crate::error::{FindxError, FindxResult};

/// Remaining command-line tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgCursor {
    args: VecDeque<String>,
}

impl ArgCursor {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ArgCursor {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Put one token back at the front.
    pub fn push(&mut self, arg: impl Into<String>) {
        self.args.push_front(arg.into());
    }

    /// Put several tokens at the front, keeping their order.
    pub fn push_all<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: Into<String>,
    {
        for arg in args.into_iter().rev() {
            self.args.push_front(arg.into());
        }
    }

    pub fn peek(&self) -> FindxResult<&str> {
        self.args
            .front()
            .map(String::as_str)
            .ok_or(FindxError::MissingArgument)
    }

    pub fn pop(&mut self) -> FindxResult<String> {
        self.args.pop_front().ok_or(FindxError::MissingArgument)
    }

    /// Pop a token that must equal `expected`.
    pub fn pop_expected(&mut self, expected: &str) -> FindxResult<String> {
        let arg = self.args.pop_front().ok_or_else(|| FindxError::UnexpectedEnd {
            expected: expected.to_string(),
        })?;
        if arg != expected {
            return Err(FindxError::unexpected(arg, expected));
        }
        Ok(arg)
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> Vec<String> {
        self.args.iter().cloned().collect()
    }
}
