//! # abook CLI
//!
//! The binary is intentionally thin: the interactive client lives in
//! `src/abook/cli/`, and this file only invokes `cli::run()` and handles
//! process termination.
//!
//! Everything the client does goes through [`abook::api::BookApi`]. Command
//! failures are printed and the loop continues; only startup problems (an
//! unreadable data file) and a failed save on exit end up here.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
