//! # CLI Layer
//!
//! An interactive read-eval-print loop over [`abook::api::BookApi`].
//!
//! - `setup.rs`: clap flags and logging
//! - `table.rs`: the command table and line resolution
//! - `commands.rs`: `AppContext`, the loop, and one handler per command
//! - `print.rs`: terminal output for `CmdResult`s and errors
//!
//! This is the only place that touches stdin/stdout.

mod commands;
mod print;
mod setup;
mod table;

pub use commands::run;
