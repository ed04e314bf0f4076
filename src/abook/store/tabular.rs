use super::{record_from_fields, LedgerCodec};
use crate::error::{BookError, Result};
use crate::ledger::Ledger;
use serde::Deserialize;
use std::io::{Read, Write};

pub const HEADER: [&str; 3] = ["name", "birthday", "phones"];
pub const PHONE_SEPARATOR: char = ';';

/// One row per record: `name,birthday,phones`, phones joined with `;` and an
/// empty birthday column when unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

#[derive(Deserialize)]
struct Row {
    name: String,
    birthday: String,
    phones: String,
}

impl LedgerCodec for CsvCodec {
    fn encode<W: Write>(&self, ledger: &Ledger, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(HEADER)?;

        let separator = PHONE_SEPARATOR.to_string();
        for record in ledger {
            let birthday = record.birthday().map(|b| b.to_string()).unwrap_or_default();
            let phones = record
                .phones()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(&separator);
            csv_writer.write_record([record.name(), birthday.as_str(), phones.as_str()])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    fn decode<R: Read>(&self, reader: R) -> Result<Ledger> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let mut ledger = Ledger::new();
        for row in csv_reader.deserialize::<Row>() {
            let row = row.map_err(malformed)?;
            let phones = row
                .phones
                .split(PHONE_SEPARATOR)
                .filter(|phone| !phone.is_empty());
            let record = record_from_fields(row.name, Some(row.birthday.as_str()), phones)?;
            ledger.add_record(record)?;
        }
        Ok(ledger)
    }
}

fn malformed(err: csv::Error) -> BookError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => BookError::Io(e),
        _ => BookError::MalformedRecord(message),
    }
}
