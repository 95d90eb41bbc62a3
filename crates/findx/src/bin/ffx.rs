//! `ffx`: findx with `-ffx` (files, following symlinks, standard exclusions).

use std::process::ExitCode;

fn main() -> ExitCode {
    findx::run_main(Some("-ffx"))
}
