//! `ffg`: findx with `-ffg` (grep through files with standard exclusions).

use std::process::ExitCode;

fn main() -> ExitCode {
    findx::run_main(Some("-ffg"))
}
