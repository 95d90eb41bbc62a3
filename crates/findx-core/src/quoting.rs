//! Shell-style quoting for configuration values.
//!
//! Values are lists of words. On input a value is split with
//! [`quoted_split`]; on output words are re-quoted so the result splits back
//! to the same list.
//!
//! ## Backslashes
//!
//! A run of backslashes is literal unless it is special. A special run
//! collapses each pair to one backslash, and an unpaired backslash escapes
//! the character after the run. A run is special:
//!
//! - inside double quotes, when followed by `"`
//! - outside quotes, when followed by `'`, `"` or whitespace
//!
//! Inside single quotes nothing is special.

use thiserror::Error;

/// A quote was opened and never closed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No closing quotation")]
pub struct UnclosedQuote;

/// Quote `s` with single quotes, escaping embedded single quotes as `\'`.
pub fn single_quoted(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    s.split('\'')
        .map(|part| {
            if part.is_empty() {
                String::new()
            } else {
                format!("'{part}'")
            }
        })
        .collect::<Vec<_>>()
        .join("\\'")
}

/// Quote `s` with double quotes.
///
/// Backslashes are doubled only where they would otherwise become special:
/// before an embedded `"` and before the closing quote.
pub fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut backslashes = 0usize;
    for c in s.chars() {
        if c == '\\' {
            backslashes += 1;
            continue;
        }
        if c == '"' {
            backslashes = 2 * backslashes + 1;
        }
        out.extend(std::iter::repeat_n('\\', backslashes));
        out.push(c);
        backslashes = 0;
    }
    out.extend(std::iter::repeat_n('\\', 2 * backslashes));
    out.push('"');
    out
}

/// Single-quote `s`, or double-quote it if it contains a single quote.
pub fn quoted(s: &str) -> String {
    if s.contains('\'') {
        double_quoted(s)
    } else {
        single_quoted(s)
    }
}

pub fn quoted_join<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| quoted(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// True if `arg` would not survive [`quoted_split`] unquoted.
pub fn quote_required(arg: &str) -> bool {
    arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\\' | '"' | '\''))
}

pub fn optionally_quoted(s: &str) -> String {
    if quote_required(s) {
        quoted(s)
    } else {
        s.to_string()
    }
}

pub fn optionally_quoted_join<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| optionally_quoted(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split off the first token of `s`.
///
/// A token is a maximal run of backslashes, a maximal run of whitespace, or
/// any other single character. Only an empty `s` gives an empty token.
pub fn split_token(s: &str) -> (&str, &str) {
    let mut chars = s.char_indices();
    let Some((_, first)) = chars.next() else {
        return ("", "");
    };
    let same_class = |c: char| {
        if first == '\\' {
            c == '\\'
        } else if first.is_whitespace() {
            c.is_whitespace()
        } else {
            false
        }
    };
    let split_at = chars
        .find(|&(_, c)| !same_class(c))
        .map_or(s.len(), |(i, _)| i);
    s.split_at(split_at)
}

/// True if `token` is a backslash run that is special given what follows
/// it and the currently open quote (if any).
pub fn found_special_backslashes(token: &str, rest: &str, quote: Option<char>) -> bool {
    if !token.starts_with('\\') {
        return false;
    }
    let Some(next) = rest.chars().next() else {
        return false;
    };
    match quote {
        Some('"') => next == '"',
        Some(_) => false,
        None => matches!(next, '\'' | '"') || next.is_whitespace(),
    }
}

/// Split `value` into words following the quoting rules.
///
/// # Examples
///
/// ```
/// use findx_core::quoting::quoted_split;
///
/// assert_eq!(
///     quoted_split(r#"a 'b c' "d\"e" f\ g"#).unwrap(),
///     ["a", "b c", "d\"e", "f g"]
/// );
/// ```
pub fn quoted_split(value: &str) -> Result<Vec<String>, UnclosedQuote> {
    let mut args = Vec::new();
    let mut quote: Option<char> = None;
    // `Some` once a word has started, even if it is still empty (`''`).
    let mut arg: Option<String> = None;
    let mut rest = value;

    while !rest.is_empty() {
        let (token, after) = split_token(rest);
        rest = after;
        let Some(first) = token.chars().next() else {
            break;
        };

        if found_special_backslashes(token, rest, quote) {
            let word = arg.get_or_insert_with(String::new);
            word.extend(std::iter::repeat_n('\\', token.len() / 2));
            if token.len() % 2 == 1 {
                let mut chars = rest.chars();
                if let Some(escaped) = chars.next() {
                    word.push(escaped);
                }
                rest = chars.as_str();
            }
        } else if let Some(q) = quote {
            if first == q {
                quote = None;
            } else {
                arg.get_or_insert_with(String::new).push_str(token);
            }
        } else if first == '\'' || first == '"' {
            quote = Some(first);
            arg.get_or_insert_with(String::new);
        } else if first.is_whitespace() {
            args.extend(arg.take());
        } else {
            arg.get_or_insert_with(String::new).push_str(token);
        }
    }

    if quote.is_some() {
        return Err(UnclosedQuote);
    }
    args.extend(arg);
    Ok(args)
}

/// Split `s` into its leading whitespace and the remainder.
pub fn split_leading_whitespace(s: &str) -> (&str, &str) {
    let rest = s.trim_start();
    (&s[..s.len() - rest.len()], rest)
}

/// Merge indented continuation lines into the line they continue.
///
/// Trailing whitespace is dropped from every line. A continuation joins
/// with a single space, or with nothing when it starts with `+`. Indented
/// lines that follow a blank line are returned as-is.
pub fn joined_lines<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut joined = Vec::new();
    let mut current: Option<String> = None;

    for line in lines {
        let line = line.trim_end();
        let (leading, rest) = split_leading_whitespace(line);
        match current.as_mut() {
            Some(cur) if !cur.is_empty() && !leading.is_empty() => {
                if let Some(glued) = rest.strip_prefix('+') {
                    cur.push_str(glued);
                } else {
                    cur.push(' ');
                    cur.push_str(rest);
                }
            }
            _ => {
                joined.extend(current.take());
                current = Some(line.to_string());
            }
        }
    }
    joined.extend(current);
    joined
}
