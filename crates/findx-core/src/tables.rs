//! Classification of `find` primitives.
//!
//! Every option, test, and action `find` understands is listed here with the
//! number of arguments it consumes and the position it may take on the
//! command line. The tables are built once on first use and never change.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Number of arguments an option consumes after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Zero,
    One,
    Two,
    /// Arguments run up to and including a `;` or `+` terminator.
    Variadic,
}

/// Where an option belongs in a `find` command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Must appear before the root paths (`-L`, `-D debugopts`).
    PrePath,
    /// Must appear immediately after the root paths (`-maxdepth N`).
    PostPath,
    /// Produces output or side effects (`-print0`, `-exec ... ;`).
    Action,
    /// Plain test (`-type f`, `-mtime -1`).
    Test,
    /// Test whose argument is an extended glob (`-name`, `-ipath`).
    GlobTest,
}

/// Arity and kind of one `find` primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOption {
    pub arity: Arity,
    pub kind: OptionKind,
}

const PRE_PATH_OPTIONS_0: &[&str] = &["-H", "-L", "-P", "-O0", "-O1", "-O2", "-O3"];
const PRE_PATH_OPTIONS_1: &[&str] = &["-D"];

const POST_PATH_OPTIONS_0: &[&str] = &[
    "-d",
    "-depth",
    "--help",
    "-help",
    "-ignore_readdir_race",
    "-mount",
    "-noignore_readdir_race",
    "-noleaf",
    "-nowarn",
    "--version",
    "-warn",
    "-xautofs",
    "-xdev",
];
const POST_PATH_OPTIONS_1: &[&str] = &["-maxdepth", "-mindepth"];

const ACTIONS_VAR: &[&str] = &["-exec", "-execdir", "-ok", "-okdir"];
const ACTIONS_0: &[&str] = &["-delete", "-ls", "-print", "-print0", "-quit"];
const ACTIONS_1: &[&str] = &["-fls", "-fprint", "-fprint0", "-printf"];
const ACTIONS_2: &[&str] = &["-fprintf"];

const TESTS_0: &[&str] = &[
    "-daystart",
    "-empty",
    "-executable",
    "-false",
    "-follow",
    "-nogroup",
    "-nouser",
    "-prune",
    "-readable",
    "-true",
    "-writable",
];
const TESTS_1: &[&str] = &[
    "-amin",
    "-anewer",
    "-atime",
    "-cmin",
    "-cnewer",
    "-context",
    "-ctime",
    "-fstype",
    "-gid",
    "-group",
    "-inum",
    "-iregex",
    "-links",
    "-mmin",
    "-mtime",
    "-newer",
    "-perm",
    "-regex",
    "-regextype",
    "-samefile",
    "-size",
    "-type",
    "-uid",
    "-used",
    "-user",
    "-xtype",
];

/// Timestamp letters accepted by `-newerXY`.
const NEWER_REF_TYPES: &str = "aBcmt";

/// Tests whose argument is an extended glob.
pub const TESTS_WITH_GLOB: &[&str] = &[
    "-ilname",
    "-iname",
    "-ipath",
    "-iwholename",
    "-lname",
    "-name",
    "-path",
    "-wholename",
];

pub const UNARY_OPERATORS: &[&str] = &["!", "-not"];
pub const BINARY_OPERATORS: &[&str] = &[",", "-a", "-and", "-o", "-or"];

/// Characters that make a bare word a glob.
pub const META_CHARS: &str = "*?|,";

/// Paired characters; a single one of these on its own is not a glob.
pub const META_PAIRS: &str = "[]{}";

static OPTIONS: LazyLock<HashMap<String, FindOption>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    let mut add = |names: &[&str], arity: Arity, kind: OptionKind| {
        for name in names {
            table.insert(name.to_string(), FindOption { arity, kind });
        }
    };

    add(PRE_PATH_OPTIONS_0, Arity::Zero, OptionKind::PrePath);
    add(PRE_PATH_OPTIONS_1, Arity::One, OptionKind::PrePath);
    add(POST_PATH_OPTIONS_0, Arity::Zero, OptionKind::PostPath);
    add(POST_PATH_OPTIONS_1, Arity::One, OptionKind::PostPath);
    add(ACTIONS_VAR, Arity::Variadic, OptionKind::Action);
    add(ACTIONS_0, Arity::Zero, OptionKind::Action);
    add(ACTIONS_1, Arity::One, OptionKind::Action);
    add(ACTIONS_2, Arity::Two, OptionKind::Action);
    add(TESTS_0, Arity::Zero, OptionKind::Test);
    add(TESTS_1, Arity::One, OptionKind::Test);
    add(TESTS_WITH_GLOB, Arity::One, OptionKind::GlobTest);

    for x in NEWER_REF_TYPES.chars() {
        for y in NEWER_REF_TYPES.chars() {
            table.insert(
                format!("-newer{x}{y}"),
                FindOption {
                    arity: Arity::One,
                    kind: OptionKind::Test,
                },
            );
        }
    }

    table
});

/// Look up a `find` primitive by name.
pub fn lookup(name: &str) -> Option<FindOption> {
    OPTIONS.get(name).copied()
}

/// True for options that must precede the root paths.
pub fn is_pre_path(name: &str) -> bool {
    matches!(lookup(name), Some(opt) if opt.kind == OptionKind::PrePath)
}

/// True for options that must directly follow the root paths.
pub fn is_post_path(name: &str) -> bool {
    matches!(lookup(name), Some(opt) if opt.kind == OptionKind::PostPath)
}

/// True for options that belong before the expression (pre- or post-path).
pub fn is_pre_expression(name: &str) -> bool {
    is_pre_path(name) || is_post_path(name)
}

pub fn is_action(name: &str) -> bool {
    matches!(lookup(name), Some(opt) if opt.kind == OptionKind::Action)
}

pub fn is_glob_test(name: &str) -> bool {
    TESTS_WITH_GLOB.contains(&name)
}

pub fn is_unary_operator(name: &str) -> bool {
    UNARY_OPERATORS.contains(&name)
}

pub fn is_binary_operator(name: &str) -> bool {
    BINARY_OPERATORS.contains(&name)
}

/// True for any word `find` would interpret itself: options, operators, parens.
pub fn is_reserved(word: &str) -> bool {
    lookup(word).is_some()
        || is_unary_operator(word)
        || is_binary_operator(word)
        || word == "("
        || word == ")"
}

/// True if `s` contains glob metacharacters.
///
/// Paired characters only count in strings longer than one character, since
/// a lone `[` or `]` cannot form a pattern.
pub fn has_meta(s: &str) -> bool {
    if s.chars().any(|c| META_CHARS.contains(c)) {
        return true;
    }
    s.chars().count() > 1 && s.chars().any(|c| META_PAIRS.contains(c))
}
