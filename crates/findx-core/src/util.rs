//! Small path helpers.

use std::path::PathBuf;

/// Expand a leading `~` or `~/` to the user's home directory.
///
/// Other paths, including `~user` forms, are returned unchanged. If the home
/// directory is unknown the path is returned unchanged too.
pub fn expand_user(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => &rest[1..],
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}
