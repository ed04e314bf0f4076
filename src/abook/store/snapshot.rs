use super::LedgerCodec;
use crate::error::{BookError, Result};
use crate::ledger::Ledger;
use crate::model::Record;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

const MAGIC: &[u8; 6] = b"ABOOK\0";
const VERSION: u32 = 1;
const SIZE_LIMIT: u64 = 64 * 1024 * 1024;

/// Binary dump of every record, prefixed with a magic tag and a version.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotCodec;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    records: Vec<&'a Record>,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    records: Vec<Record>,
}

fn options() -> impl Options {
    bincode::DefaultOptions::new().with_limit(SIZE_LIMIT)
}

impl LedgerCodec for SnapshotCodec {
    fn encode<W: Write>(&self, ledger: &Ledger, mut writer: W) -> Result<()> {
        writer.write_all(MAGIC)?;
        let snapshot = SnapshotRef {
            version: VERSION,
            records: ledger.iter().collect(),
        };
        options().serialize_into(writer, &snapshot)?;
        Ok(())
    }

    fn decode<R: Read>(&self, mut reader: R) -> Result<Ledger> {
        let mut magic = [0u8; 6];
        reader.read_exact(&mut magic).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => not_a_snapshot(),
            _ => BookError::Io(e),
        })?;
        if &magic != MAGIC {
            return Err(not_a_snapshot());
        }

        let snapshot: Snapshot = options().deserialize_from(reader).map_err(malformed)?;
        if snapshot.version != VERSION {
            return Err(BookError::MalformedRecord(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let mut ledger = Ledger::new();
        for record in snapshot.records {
            if record.name().trim().is_empty() {
                return Err(BookError::MalformedRecord(
                    "snapshot contains a record without a name".to_string(),
                ));
            }
            ledger.add_record(record)?;
        }
        Ok(ledger)
    }
}

fn not_a_snapshot() -> BookError {
    BookError::MalformedRecord("not an address book snapshot".to_string())
}

fn malformed(err: bincode::Error) -> BookError {
    match *err {
        bincode::ErrorKind::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            BookError::MalformedRecord("snapshot payload is truncated".to_string())
        }
        bincode::ErrorKind::Io(e) => BookError::Io(e),
        other => BookError::MalformedRecord(other.to_string()),
    }
}
