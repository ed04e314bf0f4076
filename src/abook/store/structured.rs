use super::{record_from_fields, LedgerCodec};
use crate::error::{BookError, Result};
use crate::ledger::Ledger;
use crate::model::Record;
use serde::de::{MapAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::io::{Read, Write};

/// `{"<name>": {"phones": [...], "birthday": "dd.mm.yyyy"}, ...}`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl LedgerCodec for JsonCodec {
    fn encode<W: Write>(&self, ledger: &Ledger, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &DocumentRef(ledger))?;
        Ok(())
    }

    fn decode<R: Read>(&self, reader: R) -> Result<Ledger> {
        let document: Document = serde_json::from_reader(reader).map_err(malformed)?;

        let mut ledger = Ledger::new();
        for (name, entry) in document.0 {
            let record = record_from_fields(
                name,
                entry.birthday.as_deref(),
                entry.phones.iter().map(String::as_str),
            )?;
            ledger.add_record(record)?;
        }
        Ok(ledger)
    }
}

fn malformed(err: serde_json::Error) -> BookError {
    if err.is_io() {
        BookError::Io(err.into())
    } else {
        BookError::MalformedRecord(err.to_string())
    }
}

#[derive(Serialize)]
struct EntryRef<'a> {
    phones: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birthday: Option<String>,
}

impl<'a> From<&'a Record> for EntryRef<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            phones: record.phones().iter().map(|p| p.as_str()).collect(),
            birthday: record.birthday().map(|b| b.to_string()),
        }
    }
}

struct DocumentRef<'a>(&'a Ledger);

impl Serialize for DocumentRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|r| (r.name(), EntryRef::from(r))))
    }
}

#[derive(Deserialize)]
struct Entry {
    phones: Vec<String>,
    birthday: Option<String>,
}

/// Entries in document order; a plain map type would lose it.
struct Document(Vec<(String, Entry)>);

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = Document;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping contact names to entries")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Document, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, entry)) = map.next_entry::<String, Entry>()? {
                    entries.push((name, entry));
                }
                Ok(Document(entries))
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn encode(ledger: &Ledger) -> Vec<u8> {
        let mut buf = Vec::new();
        JsonCodec.encode(ledger, &mut buf).unwrap();
        buf
    }

    fn decode(text: &str) -> Result<Ledger> {
        JsonCodec.decode(text.as_bytes())
    }

    #[test]
    fn writes_expected_layout() {
        let mut ledger = Ledger::new();
        let mut alice = Record::new("Alice", Some("01.01.1990")).unwrap();
        alice.add_phone("1234567890").unwrap();
        ledger.add_record(alice).unwrap();
        ledger.add_record(Record::new("Bob", None).unwrap()).unwrap();

        let value: Value = serde_json::from_slice(&encode(&ledger)).unwrap();
        assert_eq!(
            value,
            json!({
                "Alice": {"phones": ["1234567890"], "birthday": "01.01.1990"},
                "Bob": {"phones": []}
            })
        );
    }

    #[test]
    fn keeps_document_order() {
        let ledger = decode(
            r#"{"Zed": {"phones": []}, "Amy": {"phones": []}, "Mo": {"phones": []}}"#,
        )
        .unwrap();
        assert_eq!(ledger.names().collect::<Vec<_>>(), ["Zed", "Amy", "Mo"]);

        let text = String::from_utf8(encode(&ledger)).unwrap();
        let zed = text.find("Zed").unwrap();
        let amy = text.find("Amy").unwrap();
        assert!(zed < amy);
    }

    #[test]
    fn round_trip_preserves_phones_and_birthdays() {
        let mut ledger = Ledger::new();
        let mut carol = Record::new("Carol", Some("29.02.2000")).unwrap();
        carol.add_phone("5555555555").unwrap();
        carol.add_phone("5555555555").unwrap();
        carol.add_phone("0000000001").unwrap();
        ledger.add_record(carol).unwrap();

        let restored = JsonCodec.decode(encode(&ledger).as_slice()).unwrap();
        assert_eq!(restored, ledger);
    }

    #[test]
    fn empty_or_null_birthday_means_unset() {
        let ledger =
            decode(r#"{"A": {"phones": [], "birthday": ""}, "B": {"phones": [], "birthday": null}}"#)
                .unwrap();
        assert!(ledger.iter().all(|r| r.birthday().is_none()));
    }

    #[test]
    fn invalid_fields_fail_with_validation_errors() {
        assert!(matches!(
            decode(r#"{"A": {"phones": ["12"]}}"#),
            Err(BookError::InvalidPhoneFormat(_))
        ));
        assert!(matches!(
            decode(r#"{"A": {"phones": [], "birthday": "1990-01-01"}}"#),
            Err(BookError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            decode(r#"{" ": {"phones": []}}"#),
            Err(BookError::EmptyName)
        ));
    }

    #[test]
    fn bad_shape_is_malformed() {
        for text in [
            r#"{"A": {"birthday": "01.01.1990"}}"#,
            r#"["A", "B"]"#,
            r#"{"A": {"phones": "1234567890"}}"#,
            "{not json",
        ] {
            assert!(
                matches!(decode(text), Err(BookError::MalformedRecord(_))),
                "{text} should be malformed"
            );
        }
    }
}
