//! # Storage Layer
//!
//! Persistence for the [`Ledger`]. Three independent on-disk formats are
//! supported, each behind the [`LedgerCodec`] trait:
//!
//! - [`tabular::CsvCodec`]: `name,birthday,phones` rows, phones joined by `;`.
//!   This is the default data file format.
//! - [`structured::JsonCodec`]: an object mapping each name to
//!   `{"phones": [...], "birthday": "dd.mm.yyyy"}` (birthday omitted when
//!   unset), keys in ledger order.
//! - [`snapshot::SnapshotCodec`]: a versioned `bincode` dump of every record.
//!
//! Codecs work on plain `Read` / `Write` values so they can be exercised on
//! in-memory buffers. [`save`] and [`load`] add the file handling:
//!
//! - Saving never replaces an existing file unless `overwrite` is set. The
//!   check happens when the file is opened (`create_new`), before any byte is
//!   written.
//! - A failure half way through a save can leave a partially written file.
//! - Loading decodes and validates the whole file into a fresh `Ledger`; the
//!   caller only swaps it in on success.
//!
//! Records read back from CSV and JSON go through the same validation as
//! interactive input, so a bad phone in a file fails the load with
//! `InvalidPhoneFormat` just like `add_phone` would.

use crate::error::{BookError, Result};
use crate::ledger::Ledger;
use crate::model::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub mod snapshot;
pub mod structured;
pub mod tabular;

pub use snapshot::SnapshotCodec;
pub use structured::JsonCodec;
pub use tabular::CsvCodec;

/// Encodes a whole ledger to, and decodes it from, a byte stream.
pub trait LedgerCodec {
    fn encode<W: Write>(&self, ledger: &Ledger, writer: W) -> Result<()>;

    fn decode<R: Read>(&self, reader: R) -> Result<Ledger>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Json,
    Snapshot,
}

impl Format {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Format::Csv),
            "json" => Some(Format::Json),
            "bin" | "snapshot" => Some(Format::Snapshot),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Snapshot => "bin",
        }
    }

    pub fn encode<W: Write>(self, ledger: &Ledger, writer: W) -> Result<()> {
        match self {
            Format::Csv => CsvCodec.encode(ledger, writer),
            Format::Json => JsonCodec.encode(ledger, writer),
            Format::Snapshot => SnapshotCodec.encode(ledger, writer),
        }
    }

    pub fn decode<R: Read>(self, reader: R) -> Result<Ledger> {
        match self {
            Format::Csv => CsvCodec.decode(reader),
            Format::Json => JsonCodec.decode(reader),
            Format::Snapshot => SnapshotCodec.decode(reader),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Snapshot => "snapshot",
        };
        f.write_str(name)
    }
}

impl FromStr for Format {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "snapshot" | "bin" => Ok(Format::Snapshot),
            other => Err(BookError::Usage(format!("Unknown file format: {}", other))),
        }
    }
}

pub fn save(ledger: &Ledger, path: &Path, format: Format, overwrite: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = open_for_write(path, overwrite)?;
    let mut writer = BufWriter::new(file);
    format.encode(ledger, &mut writer)?;
    writer.flush()?;

    debug!(
        path = %path.display(),
        %format,
        records = ledger.len(),
        "saved ledger"
    );
    Ok(())
}

pub fn load(path: &Path, format: Format) -> Result<Ledger> {
    let file = File::open(path)?;
    let ledger = format.decode(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        %format,
        records = ledger.len(),
        "loaded ledger"
    );
    Ok(ledger)
}

fn open_for_write(path: &Path, overwrite: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    options.open(path).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => BookError::FileAlreadyExists(path.to_path_buf()),
        _ => BookError::Io(e),
    })
}

/// Rebuilds a record from persisted text fields, validating every one.
/// An empty birthday string means "not set".
fn record_from_fields<'a>(
    name: String,
    birthday: Option<&str>,
    phones: impl IntoIterator<Item = &'a str>,
) -> Result<Record> {
    let birthday = birthday.filter(|b| !b.is_empty());
    let mut record = Record::new(name, birthday)?;
    for phone in phones {
        record.add_phone(phone)?;
    }
    Ok(record)
}
