//! # abook Architecture
//!
//! abook is a small address book: names, phone numbers and birthdays, kept in
//! memory while the program runs and written to a CSV, JSON or binary file
//! between runs.
//!
//! The crate is a library with a thin interactive client on top. Everything
//! with rules lives in the library; the binary only reads lines, picks a
//! command and prints what comes back.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Command table, REPL loop, colored output                 │
//! │  - The ONLY place that knows about stdin/stdout/exit codes  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - One method per user-facing operation                     │
//! │  - Returns structured CmdResult values                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (ledger.rs, model.rs, fields.rs)                      │
//! │  - Ledger of Records, validated Phone / Birthday fields     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - LedgerCodec trait: CSV, JSON and snapshot codecs         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Errors
//!
//! Every fallible operation returns [`error::Result`]. Validation failures
//! (bad phone, future birthday, unknown name...) are ordinary
//! [`error::BookError`] values; the dispatcher prints them and keeps going.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`ledger`]: The ordered collection of records, pagination and search
//! - [`model`]: The `Record` type
//! - [`fields`]: Phone and birthday validation
//! - [`store`]: File formats and save/load
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod fields;
pub mod ledger;
pub mod model;
pub mod store;
