//! Recursive-descent parser for `find` expressions.
//!
//! The parser consumes command-line tokens and rebuilds them as a `find`
//! expression, rewriting findx shorthand on the way:
//!
//! - `-type fd` becomes `( -type f -o -type d )`
//! - `-name *.{c,h}` becomes `( -name *.c -o -name *.h )`
//! - a bare word with glob metacharacters becomes `-name WORD`, or
//!   `-path WORD` when it contains a `/`
//!
//! ## Grammar
//!
//! ```text
//! <expr>          := <term> (<binary-op> <term> | <optional-term>)*
//! <term>          := "(" <expr> ")"
//!                  | <unary-op> <term>
//!                  | <option> <option-args>
//!                  | <metaglob>
//! <optional-term> := <term> | (nothing)
//! ```
//!
//! An optional term is empty when the next token is a pre-path or post-path
//! option, or anything else that cannot start a term. Scanning stops there
//! and the caller decides what to do with the token.

use crate::cursor::ArgCursor;
use crate::error::{FindxError, FindxResult};
use crate::glob::expand_glob;
use crate::tables::{
    has_meta, is_action, is_binary_operator, is_glob_test, is_pre_expression, is_unary_operator,
    lookup, Arity,
};

/// Result of [`parse_expression`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedExpression {
    /// The rewritten expression wrapped in one pair of parentheses.
    pub expression: Vec<String>,
    /// Tokens after the expression, left for root and option handling.
    pub remaining: Vec<String>,
    /// Any action (`-print`, `-delete`, `-exec`, ...) was seen.
    pub saw_action: bool,
    /// `-print` specifically was seen.
    pub saw_print: bool,
}

/// Parse one expression from the front of `tokens`.
///
/// # Examples
///
/// ```
/// use findx_core::expr::parse_expression;
///
/// let parsed = parse_expression(["*.c", "-o", "-type", "fl", "/src"]).unwrap();
/// assert_eq!(
///     parsed.expression,
///     ["(", "-name", "*.c", "-o", "(", "-type", "f", "-o", "-type", "l", ")", ")"]
/// );
/// assert_eq!(parsed.remaining, ["/src"]);
/// ```
pub fn parse_expression<I, S>(tokens: I) -> FindxResult<ParsedExpression>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parser = ExprParser::new(ArgCursor::new(tokens));
    let body = parser.expression()?;

    let mut expression = Vec::with_capacity(body.len() + 2);
    expression.push("(".to_string());
    expression.extend(body);
    expression.push(")".to_string());

    Ok(ParsedExpression {
        expression,
        remaining: parser.cursor().remaining(),
        saw_action: parser.saw_action(),
        saw_print: parser.saw_print(),
    })
}

/// Apply `option` to each parameter, OR'ing the results.
///
/// A single parameter needs no parentheses: `-type f`. Several become
/// `( -type f -o -type d )`.
pub fn distribute_option<S: AsRef<str>>(option: &str, params: &[S]) -> Vec<String> {
    if params.len() <= 1 {
        let mut list = vec![option.to_string()];
        list.extend(params.iter().map(|p| p.as_ref().to_string()));
        return list;
    }

    let mut list = vec!["(".to_string()];
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            list.push("-o".to_string());
        }
        list.push(option.to_string());
        list.push(param.as_ref().to_string());
    }
    list.push(")".to_string());
    list
}

/// Expand the extended glob argument of a glob test.
pub fn expand_test_with_glob(test: &str, glob: &str) -> Vec<String> {
    distribute_option(test, &expand_glob(glob))
}

/// Stateful parser over an [`ArgCursor`].
///
/// The action flags accumulate across calls, so several expression
/// fragments from one command line share them.
#[derive(Debug, Clone, Default)]
pub struct ExprParser {
    cursor: ArgCursor,
    saw_action: bool,
    saw_print: bool,
}

impl ExprParser {
    pub fn new(cursor: ArgCursor) -> Self {
        ExprParser {
            cursor,
            saw_action: false,
            saw_print: false,
        }
    }

    pub fn cursor(&self) -> &ArgCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut ArgCursor {
        &mut self.cursor
    }

    pub fn saw_action(&self) -> bool {
        self.saw_action
    }

    pub fn saw_print(&self) -> bool {
        self.saw_print
    }

    /// Pop an option name together with the arguments its arity requires.
    ///
    /// Variadic options run through the first `;` or `+`, inclusive.
    pub fn option_list(&mut self) -> FindxResult<Vec<String>> {
        let option = self.cursor.pop()?;
        let Some(info) = lookup(&option) else {
            return Err(FindxError::invalid_option(option));
        };

        let mut list = vec![option];
        match info.arity {
            Arity::Zero => {}
            Arity::One => list.push(self.cursor.pop()?),
            Arity::Two => {
                list.push(self.cursor.pop()?);
                list.push(self.cursor.pop()?);
            }
            Arity::Variadic => loop {
                let arg = self.cursor.pop()?;
                let done = arg == ";" || arg == "+";
                list.push(arg);
                if done {
                    break;
                }
            },
        }
        Ok(list)
    }

    /// Parse a term if one starts at the front of the stream.
    ///
    /// Returns an empty list when the next token cannot start a term.
    pub fn optional_term(&mut self) -> FindxResult<Vec<String>> {
        let arg = self.cursor.peek()?.to_string();

        let term = if arg == "(" {
            let mut term = vec![self.cursor.pop()?];
            term.extend(self.expression()?);
            term.push(self.cursor.pop_expected(")")?);
            term
        } else if is_unary_operator(&arg) {
            let mut term = vec![self.cursor.pop()?];
            term.extend(self.term()?);
            term
        } else if is_pre_expression(&arg) {
            Vec::new()
        } else if lookup(&arg).is_some() {
            self.option_list()?
        } else if has_meta(&arg) {
            let test = if arg.contains('/') { "-path" } else { "-name" };
            vec![test.to_string(), self.cursor.pop()?]
        } else {
            Vec::new()
        };

        Ok(self.rewrite_term(term))
    }

    /// Parse a term that must be present.
    pub fn term(&mut self) -> FindxResult<Vec<String>> {
        let term = self.optional_term()?;
        if term.is_empty() {
            return Err(match self.cursor.peek() {
                Ok(next) => FindxError::invalid_option(next),
                Err(_) => FindxError::MissingArgument,
            });
        }
        Ok(term)
    }

    /// Parse terms joined by operators (or implicit AND) until a token
    /// that cannot continue the expression.
    pub fn expression(&mut self) -> FindxResult<Vec<String>> {
        let mut expr = self.term()?;
        while !self.cursor.is_empty() {
            if is_binary_operator(self.cursor.peek()?) {
                expr.push(self.cursor.pop()?);
                expr.extend(self.term()?);
            } else {
                let term = self.optional_term()?;
                if term.is_empty() {
                    break;
                }
                expr.extend(term);
            }
        }
        tracing::trace!(?expr, "parsed expression");
        Ok(expr)
    }

    fn rewrite_term(&mut self, term: Vec<String>) -> Vec<String> {
        let Some(head) = term.first() else {
            return term;
        };

        if head == "-type" && term.len() == 2 {
            let letters: Vec<String> = term[1].chars().map(String::from).collect();
            distribute_option(head, &letters)
        } else if is_glob_test(head) && term.len() == 2 {
            expand_test_with_glob(head, &term[1])
        } else {
            if is_action(head) {
                self.saw_action = true;
                if head == "-print" {
                    self.saw_print = true;
                }
            }
            term
        }
    }
}
