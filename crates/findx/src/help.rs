//! Help, version and README text.

use findx_core::config::DEFAULT_CONFIG_TEXT;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// README shown by `-readme`.
pub const README: &str = include_str!("../../../README.md");

/// Usage text up to the configuration variables section.
const HELP_TEXT: &str = r#"Usage: findx [OPTION | FINDOPTION | ROOT | METAGLOB]*
  or:  findx [OPTION | FINDOPTION | ROOT | METAGLOB]* : [XARG]+

Additional shortcut commands:

  ffx:  findx -ffx
  ffg:  findx -ffg

**NOTE** Examples below include POSIX shell quoting to protect special
characters from the shell.

Provides shortcuts for the following 'find' idioms:
    find [...]
    find [...] -print0 | xargs -0 [XARG]+

The OPTION, FINDOPTION, ROOT, and METAGLOB options may be specified in any
order while in FINDX MODE.  The XARGs are kept in-order while in XARGS MODE.

OPTION      An option to findx (specified below).

FINDOPTION  A standard 'find' option to be appended to EXPRESSION.
            ('man find' or 'find --help' for details.)

ROOT        A directory or file to be appended to ROOTS.
            ROOT must not contain METACHARACTERS unless it exists.

METAGLOB    A GLOB containing one or more METACHARACTERS.
            Shortcut for -name METAGLOB (or -path METAGLOB if it contains
            a '/').

XARG        Appended to XARGLIST for second 'xargs' stage of pipeline.
            If XARGLIST is empty, the 'xargs' stage is not used.  When xargs
            are present, the 'find' action '-print0' is used in combination
            with the 'xargs' option '-0'.  'xargs' is always run with the
            option '--no-run-if-empty' to prevent execution without filenames,
            if GNU xargs is detected.  BSD xargs implements this behavior by
            default.

GLOB        An extended-syntax filename glob reducing to one or more logically
            OR'ed 'find'-style globs containing '*', '?', and '[]'.  OR'ing
            occurs at '|' and ',' characters.  Bash-like braces may be used to
            constrain expansion; braces may be nested.  All metacharacters
            except ']' may be "quoted" via square brackets.  Globs containing
            shell metacharacters should be escaped.  Examples:

            -name 'one|two'         \( -name one -o -name two \)
            -name one,two           \( -name one -o -name two \)
            -name '*.{c,cpp}'       \( -name '*.c' -o -name '*.cpp' \)
            -name 'quoted[,]comma'  -name 'quoted[,]comma'

            Extended GLOBs are recognized after the following 'find' tests:
            -ilname -iname -ipath -iwholename -lname -name -path -wholename

Extensions to FINDOPTIONS

  In addition to extended GLOBs, the '-type' option is extended to accept
  multiple type characters which are logically OR'ed.  Examples:
            -type fd                \( -type f -o -type d \)
            -type f                 -type f

OPTIONS

  -help, --help         print this usage help and terminate
  -version, --version   print version of findx and terminate
  -readme, --readme     print findx README
  -show                 show command without executing it
  -show-var VAR         show current value of variable VAR
  -show-vars            show values of all variables
  -show-defaults        show default values of all variables
  -root ROOT            add arbitrary ROOT (directory or file) to ROOTS
  -x EXCLUDE            add EXCLUDE to list of exclusions (also '-e')
  -i INCLUDE            add INCLUDE to list of inclusions (disable exclusions
                        by including everything via '-i \*')
  -stdxf                use standard exclusions for files (configured by
                        the 'stdxf' variable)
  -stdxd                use standard exclusions for directories (configured
                        by the 'stdxd' variable)
  -stdx                 use standard exclusions; short for '-stdxd -stdxf'
  -ff                   find files following symlinks; short for '-L -type f'
  -ffx                  find files with standard exclusions, following
                        symlinks; short for '-stdx -ff'
  -ffg                  grep through files; short for '-ffx -grep'
  :                     switch to XARGS MODE; require subsequent xarg
  ::                    permanent XARGS MODE; require subsequent xarg
  [                     switch to FINDX MODE from FINDX MODE or XARGS MODE
  ]                     switch to XARGS MODE
  ]]                    switch to XARGS MODE permanently
  -grep                 short for ': <grep> <grep_args> [ :' where
                        <grep> and <grep_args> come from the variables
                        'grep_path' and '<grep_style>_grep_args'
  --log-level LEVEL     diagnostic logging on stderr (trace, debug, info,
                        warn, error); must be the first argument.  RUST_LOG
                        takes precedence when set.

Note: FINDX MODE is active at start.  The '[' option does not necessitate ']'.
A bare '[' may not be used as an XARG unless XARGS MODE has been made
permanent via '::' or ']]'.

EXCLUSIONS, INCLUSIONS
  Exclusions and inclusions are arbitrary 'find' terms, not full 'find'
  expressions.  Loosely, a term extends to the next AND or OR operator
  (including the AND implied between consecutive terms).  Parenthesized
  expressions count as a term.
  If exclusions are present, they are logically OR'ed as follows:
    find \( EXCLUDE1 -o EXCLUDE2 ... \) -prune -o EXPRESSION
  Inclusions override exclusions; if both are present, the pruning becomes:
    find \( EXCLUDE1 -o EXCLUDE2 ... \) ! \( INCLUDE1 -o INCLUDE2 ... \) -prune
  An inclusion of '-i \*' resets previously specified exclusions and
  inclusions.

  Examples:
    # Exclude *.txt, *.TXT, etc.
    -x -iname '*.txt'

    # Exclude anything with a '.' in the name, but include '*.txt'.
    -x -name '*.*' -i '*.txt'

    # Exclude .svn directories and files named '*.bak', but include 'f.bak'.
    # NOTE that '-i' requires '-name' because f.bak has no metacharacters.
    -x \( -type d -name .svn -o -type f -name '*.bak' \) -i -name f.bak

STANDARD EXCLUSIONS
  When '-stdx' is specified, a built-in list of standard exclusions applies.
  (Use '-show' to see the list.)

STANDARD ACTION
  If EXPRESSION contains no 'find' action (e.g., '-print', '-print0',
  '-delete', ...), a standard action will be appended to EXPRESSION.  The
  standard action is '-print0' when XARGS are present, and '-print' otherwise.

EXIT STATUS
  0         full success
  1         'findx' syntax error (e.g., invalid command-line option)
  2         'findx' runtime error (e.g., missing 'xargs' command)
  3         'findx' internal error (if seen, please submit a bug report)
  4..99     reserved
  100       multiple pipeline failures ('find' and 'xargs' both non-zero)

  101..119  'find' returned 1..19
  120       'find' returned 20..127

  121       'xargs' returned 1
  122       'xargs' returned 2..122
  123..127  'xargs' returned 123..127

  128+n     'findx' or other program terminated on signal n

  Returning 128+n takes precedence over returning 100.  If any of 'findx',
  'find', or 'xargs' are terminated by a signal, the overall exit status
  will reflect one of their individual exit statuses rather than a combined
  code of 100.

EXAMPLES

# Grep for 'main' in .c and .cpp files.
  findx '*.{c,cpp}' : grep main

# Grep for 'main' in .c and .cpp files, excluding .svn and CVS directories.
  findx '*.{c,cpp}' -x -name .svn,CVS : grep main

# Grep for 'main' in all files with standard exclusions.
  ffg main

# Grep for 'main' case-insensitively in all .c files under /work.
  ffg main -i [ '*.c' /work
  ffg -i [ '*.c' /work ] main
  ffg [ '*.c' /work : main -i

# Remove backup files with standard exclusions.
  ffx '*~|*.bak' : rm
  ffx '*~|*.bak' -delete

# All files and directories modified less than 1 day ago.
  findx -mtime 1

# List directories only with standard exclusions.
  findx -stdx -type d : ls -ld

# Look for directories only.
  findx -type d
  findx -type d : ls -ld

# Grep for 'main' excluding tmp directories; the use of '-name' can be avoided
# by adding a comma to 'tmp', making it into an extended glob.
  ffg main [ -x -name tmp
  ffg main [ -x tmp,

# Override pre-defined exclusions.
  findx -i '*'

# Use findx for no pre-defined exclusions, etc.
  findx -mtime -1

# Just files with standard exclusions (fails with newline in filename).
  ffx | while read i; do Something; done

CONFIGURING FINDX

findx uses configuration variable to control its behavior.  Each variable has a
value that is a list of zero or more strings generally delimited by whitespace
(subject to the quoting rules described later).

Variables are named in lower_case_separated_by_underscores.

A "normal assignment" replaces the variable with the value given:

  variable_name = value

However, if the value begins with an "assignment mode" special character, it
may be merged with the variable's previous value:

  variable_name = +values to append
  variable_name = ^values to prepend
  variable_name = -values to remove

Use the special character '=' to force normal assignment of arbitrary values;
all characters after the '=' are taken literally:

  variable_name = =+literal_value_starts_with_plus
  variable_name = =^literal_value_starts_with_caret
  variable_name = =-literal_value_starts_with_minus

CONFIG FILE

A configuration file consists of blank lines, comments, and variable
assignments.  For example:

  # This is a comment.
  variable_name = first_element second_element third_element

  # Consecutive indented lines are merged with the assignment line, with
  # the intervening whitespace replaced by a single space:
  variable_name = first_element
    second_element
    third_element

  # To avoid the space, begin the continuation lines with '+':
  variable_name = first_
    +element second_
    +element third_element

Errors in a configuration file will prevent findx from running; however, it is
not an error for a configuration file to be missing.  A file is read and parsed
only when it is first needed.  Files later in 'config_files' take precedence
over earlier ones.

QUOTING RULES

A run of backslashes is generally treated literally, but may at times be
treated specially.  If the run is treated specially, each pair of backslashes
in the run is treated as a single escaped backslash; then if an unpaired
backslash remains, it escapes the character following the run.

Inside single quotes, all characters are treated literally until the closing
single quote.

Inside double quotes, almost all characters are treated literally, but a run of
backslashes is treated specially if followed by a double-quote.

Outside of quotes, a run of backslashes is special if it precedes one of the
following characters:

    '  "  (whitespace)

With future extensions, more characters may require quoting or escaping.  To
future-proof your configuration files, quote anything other than the following
characters that will never be special:

    (letters) (digits) _ - / .

Quote characters must be paired and must not cross line boundaries.

SETTING CONFIGURATION VARIABLES

Each variable has a default value built into findx.  This value may be modified
or replaced by any of the following mechanisms taken in this order (later
choices have higher precedence):

- Configuration file(s)
- Environment variable
- Command-line switch

For environment variables, the variable name is converted to uppercase and
'FINDX_' is prepended.  On the command line, the name's underscores are
converted to hyphens and '--' is prepended.  For example, the variable
'config_files' would become 'FINDX_CONFIG_FILES' as an environment variable and
'--config-files' on the command line.  An assignment appending the file
'new_config_file' could be done any of the following ways::

  # In a config file:
  config_files = +new_config_file

  # In an environment variable:
  FINDX_CONFIG_FILES=+new_config_file

  # On the command line:
  --config-files +new_config_file

CONFIGURATION VARIABLES"#;

/// Full `-help` text, ending with the default configuration.
pub fn help_text() -> String {
    format!("{HELP_TEXT}\n\n{DEFAULT_CONFIG_TEXT}")
}

pub fn version_text() -> String {
    format!("findx version {VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_ends_with_defaults() {
        let help = help_text();
        assert!(help.starts_with("Usage: findx"));
        assert!(help.ends_with(DEFAULT_CONFIG_TEXT));
        assert!(help.contains("EXIT STATUS"));
    }

    #[test]
    fn version_names_the_program() {
        assert!(version_text().starts_with("findx version "));
    }

    #[test]
    fn readme_is_embedded() {
        assert!(README.contains("findx"));
    }
}
