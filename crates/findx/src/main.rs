//! Binary entry point for findx.

use std::process::ExitCode;

fn main() -> ExitCode {
    findx::run_main(None)
}
