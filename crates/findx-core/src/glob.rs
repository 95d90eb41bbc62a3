//! Extended glob expansion.
//!
//! An extended glob reduces to one or more `find`-style globs that are
//! logically OR'ed. Alternatives are separated by `|` or `,`; braces limit
//! the reach of a separator and may nest; bracket classes hide every
//! metacharacter they contain.
//!
//! ```text
//! one|two          one, two
//! *.{c,cpp}        *.c, *.cpp
//! {a,b}{c,d}       ac, ad, bc, bd
//! quoted[,]comma   quoted[,]comma
//! ```
//!
//! ## Scanning
//!
//! Each scan works on a character vector plus a parallel mask of protected
//! positions. Bracket classes are masked first, so a `{`, `}`, `,` or `|`
//! inside `[...]` is invisible. When looking for top-level separators the
//! contents of every outermost brace group are masked too. Output text is
//! always cut from the input characters, never from the mask.
//!
//! Braces whose contents hold no top-level separator are kept as literal
//! text, and scanning continues inside them. Malformed input never fails:
//! an unmatched `{` is literal.

use std::collections::VecDeque;

/// Mask bracket classes: `[` through the next `]`.
fn bracket_mask(chars: &[char]) -> Vec<bool> {
    let mut mask = vec![false; chars.len()];
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '[' {
            match chars[i + 1..].iter().position(|&c| c == ']') {
                Some(offset) => {
                    let end = i + 1 + offset;
                    mask[i..=end].fill(true);
                    i = end + 1;
                    continue;
                }
                // No later `]` means no later class either.
                None => break,
            }
        }
        i += 1;
    }
    mask
}

/// Range strictly inside the first complete outermost brace pair at or after `start`.
fn braced_range(chars: &[char], mask: &[bool], mut start: usize) -> Option<(usize, usize)> {
    let is = |i: usize, c: char| chars[i] == c && !mask[i];
    while start < chars.len() {
        let pos = start;
        start += 1;
        if !is(pos, '{') {
            continue;
        }
        let mut depth = 1usize;
        for end in start..chars.len() {
            if is(end, '{') {
                depth += 1;
            } else if is(end, '}') {
                depth -= 1;
                if depth == 0 {
                    return Some((start, end));
                }
            }
        }
    }
    None
}

fn cut_points(chars: &[char]) -> Vec<usize> {
    let mut mask = bracket_mask(chars);
    let mut start = 0;
    while let Some((open, close)) = braced_range(chars, &mask, start) {
        mask[open..close].fill(true);
        start = close;
    }
    (0..chars.len())
        .filter(|&i| !mask[i] && matches!(chars[i], ',' | '|'))
        .collect()
}

fn split_outside_braces(chars: &[char]) -> Vec<Vec<char>> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for cut in cut_points(chars) {
        pieces.push(chars[start..cut].to_vec());
        start = cut + 1;
    }
    pieces.push(chars[start..].to_vec());
    pieces
}

/// Return the character range inside the outermost braces at or after `start`.
///
/// The range excludes the braces themselves. Braces inside bracket classes
/// are ignored, and an opening brace with no partner is skipped.
pub fn find_braced_range(glob: &str, start: usize) -> Option<(usize, usize)> {
    let chars: Vec<char> = glob.chars().collect();
    let mask = bracket_mask(&chars);
    braced_range(&chars, &mask, start)
}

/// Character indices of every `,` or `|` outside all brackets and braces.
pub fn find_cut_points(glob: &str) -> Vec<usize> {
    let chars: Vec<char> = glob.chars().collect();
    cut_points(&chars)
}

/// Split `glob` at its top-level separators; empty pieces are kept.
pub fn split_glob_outside_braces(glob: &str) -> Vec<String> {
    let chars: Vec<char> = glob.chars().collect();
    split_outside_braces(&chars)
        .into_iter()
        .map(|piece| piece.into_iter().collect())
        .collect()
}

/// Expand an extended glob into the primitive globs it denotes.
///
/// The result is never empty. Alternatives that come out empty are dropped
/// (`tmp,` gives `["tmp"]`); if nothing remains the result is `[""]`.
/// Expansion is outermost-first and left-to-right, so in `{a,b}{c,d}` the
/// left group varies slowest.
pub fn expand_glob(glob: &str) -> Vec<String> {
    let chars: Vec<char> = glob.chars().collect();
    let mut output: Vec<String> = Vec::new();
    let mut pending: VecDeque<Vec<char>> = split_outside_braces(&chars).into();

    while let Some(piece) = pending.pop_front() {
        let mask = bracket_mask(&piece);
        let mut start = 0;
        loop {
            let Some((open, close)) = braced_range(&piece, &mask, start) else {
                if !piece.is_empty() {
                    output.push(piece.iter().collect());
                }
                break;
            };
            let middles = split_outside_braces(&piece[open..close]);
            if middles.len() > 1 {
                let prefix = &piece[..open - 1];
                let suffix = &piece[close + 1..];
                for middle in middles.into_iter().rev() {
                    let mut expanded = Vec::with_capacity(prefix.len() + middle.len() + suffix.len());
                    expanded.extend_from_slice(prefix);
                    expanded.extend(middle);
                    expanded.extend_from_slice(suffix);
                    pending.push_front(expanded);
                }
                break;
            }
            // Literal braces; look for groups nested inside them.
            start = open;
        }
    }

    if output.is_empty() {
        output.push(String::new());
    }
    tracing::trace!(glob, ?output, "expanded glob");
    output
}
