//! Horizon - what to work on next, and how long until a goal is reachable

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = horizon_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
