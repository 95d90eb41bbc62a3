//! Exit status mapping for the `find | xargs` pipeline.
//!
//! ```text
//! 0         success
//! 100       find and xargs both failed
//! 101..119  find returned 1..19
//! 120       find returned 20..127
//! 121       xargs returned 1
//! 122       xargs returned 2..122
//! 123..127  xargs returned 123..127
//! 128+n     a process was killed by signal n
//! ```
//!
//! Statuses of 128 and above pass through unchanged and win over 100.

/// Exit status when both stages of the pipeline fail.
pub const MULTIPLE_FAILURES: i32 = 100;

/// Base of the `128+n` signal statuses.
pub const SIGNAL_BASE: i32 = 128;

pub fn map_find_status(status: i32) -> i32 {
    match status {
        1..=19 => 100 + status,
        20..=127 => 120,
        _ => status,
    }
}

pub fn map_xargs_status(status: i32) -> i32 {
    match status {
        1 => 121,
        2..=122 => 122,
        _ => status,
    }
}

/// Combine the raw statuses of `find` and `xargs` into one exit status.
///
/// Use `0` for `xargs` when the pipeline had no xargs stage.
pub fn merge_find_xargs_status(find: i32, xargs: i32) -> i32 {
    if find >= SIGNAL_BASE {
        find
    } else if xargs >= SIGNAL_BASE {
        xargs
    } else if find != 0 && xargs != 0 {
        MULTIPLE_FAILURES
    } else if find != 0 {
        map_find_status(find)
    } else {
        map_xargs_status(xargs)
    }
}
