//! # Ledger
//!
//! The address book: an insertion-ordered collection of [`Record`]s keyed by
//! their exact (case-sensitive) name.
//!
//! Records live in a `Vec` so iteration order is the order they were added
//! (or the order they appear in a loaded file). Lookups are linear, which is
//! fine for a personal address book.
//!
//! Pagination and search hand out borrowing iterators ([`Pages`],
//! [`Matches`]). Each call starts a fresh pass over the current contents.
//!
//! Persistence goes through [`crate::store`]; the `save_*` / `load_*` methods
//! here are thin wrappers choosing a [`Format`]. A load only replaces the
//! ledger once the whole file decoded and validated.

use crate::error::{BookError, Result};
use crate::model::Record;
use crate::store::{self, Format};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<Record>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: Record) -> Result<()> {
        if self.contains(record.name()) {
            return Err(BookError::DuplicateName(record.name().to_string()));
        }
        debug!(name = record.name(), "adding record");
        self.records.push(record);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn find(&self, name: &str) -> Result<&Record> {
        let pos = self.require(name)?;
        Ok(&self.records[pos])
    }

    pub fn find_mut(&mut self, name: &str) -> Result<&mut Record> {
        let pos = self.require(name)?;
        Ok(&mut self.records[pos])
    }

    pub fn delete(&mut self, name: &str) -> Result<Record> {
        let pos = self.require(name)?;
        debug!(name, "deleting record");
        Ok(self.records.remove(pos))
    }

    /// Splits the ledger into pages of at most `size` records, in order.
    pub fn paginated(&self, size: usize) -> Result<Pages<'_>> {
        if size == 0 {
            return Err(BookError::InvalidPageSize(size.to_string()));
        }
        Ok(Pages {
            chunks: self.records.chunks(size),
        })
    }

    /// Records whose name or any phone contains `sample`, ignoring case.
    /// Each record is yielded at most once.
    pub fn search(&self, sample: &str) -> Result<Matches<'_>> {
        if sample.is_empty() {
            return Err(BookError::EmptySample);
        }
        Ok(Matches {
            records: self.records.iter(),
            sample: sample.to_lowercase(),
        })
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(Record::name)
    }

    pub fn save(&self, path: &Path, format: Format, overwrite: bool) -> Result<()> {
        store::save(self, path, format, overwrite)
    }

    pub fn load(&mut self, path: &Path, format: Format) -> Result<()> {
        *self = store::load(path, format)?;
        Ok(())
    }

    pub fn save_csv(&self, path: &Path, overwrite: bool) -> Result<()> {
        self.save(path, Format::Csv, overwrite)
    }

    pub fn load_csv(&mut self, path: &Path) -> Result<()> {
        self.load(path, Format::Csv)
    }

    pub fn save_json(&self, path: &Path, overwrite: bool) -> Result<()> {
        self.save(path, Format::Json, overwrite)
    }

    pub fn load_json(&mut self, path: &Path) -> Result<()> {
        self.load(path, Format::Json)
    }

    pub fn save_snapshot(&self, path: &Path, overwrite: bool) -> Result<()> {
        self.save(path, Format::Snapshot, overwrite)
    }

    pub fn load_snapshot(&mut self, path: &Path) -> Result<()> {
        self.load(path, Format::Snapshot)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name() == name)
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| BookError::NameNotFound(name.to_string()))
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// One chunk of [`Ledger::paginated`]: an ordered run of records.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    records: &'a [Record],
}

impl<'a> Page<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&'a Record> {
        self.records.iter().find(|r| r.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.records.iter().map(Record::name)
    }

    pub fn records(&self) -> &'a [Record] {
        self.records
    }
}

pub struct Pages<'a> {
    chunks: std::slice::Chunks<'a, Record>,
}

impl<'a> Iterator for Pages<'a> {
    type Item = Page<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next().map(|records| Page { records })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

pub struct Matches<'a> {
    records: std::slice::Iter<'a, Record>,
    sample: String,
}

fn is_match(record: &Record, sample: &str) -> bool {
    record.name().to_lowercase().contains(sample)
        || record
            .phones()
            .iter()
            .any(|phone| phone.as_str().to_lowercase().contains(sample))
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = &self.sample;
        self.records.by_ref().find(|record| is_match(record, sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, phones: &[&str]) -> Record {
        let mut record = Record::new(name, None).unwrap();
        for phone in phones {
            record.add_phone(phone).unwrap();
        }
        record
    }

    fn ledger_of(names: &[&str]) -> Ledger {
        let mut ledger = Ledger::new();
        for name in names {
            ledger.add_record(record(name, &[])).unwrap();
        }
        ledger
    }

    #[test]
    fn duplicate_name_is_rejected_and_ledger_unchanged() {
        let mut ledger = Ledger::new();
        ledger.add_record(record("Alice", &["1111111111"])).unwrap();
        let before = ledger.clone();

        let err = ledger
            .add_record(record("Alice", &["2222222222"]))
            .unwrap_err();
        assert!(matches!(err, BookError::DuplicateName(name) if name == "Alice"));
        assert_eq!(ledger, before);
    }

    #[test]
    fn names_are_case_sensitive_keys() {
        let mut ledger = ledger_of(&["alice"]);
        ledger.add_record(record("Alice", &[])).unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(matches!(ledger.find("ALICE"), Err(BookError::NameNotFound(_))));
    }

    #[test]
    fn find_mut_edits_in_place() {
        let mut ledger = ledger_of(&["Alice"]);
        ledger.find_mut("Alice").unwrap().add_phone("1234567890").unwrap();
        assert_eq!(ledger.find("Alice").unwrap().phones().len(), 1);
    }

    #[test]
    fn delete_preserves_remaining_order() {
        let mut ledger = ledger_of(&["a", "b", "c"]);
        let removed = ledger.delete("b").unwrap();
        assert_eq!(removed.name(), "b");
        assert_eq!(ledger.names().collect::<Vec<_>>(), ["a", "c"]);
        assert!(matches!(ledger.delete("b"), Err(BookError::NameNotFound(_))));
    }

    #[test]
    fn paginated_splits_in_order() {
        let ledger = ledger_of(&["a", "b", "c", "d", "e"]);
        let pages: Vec<Vec<&str>> = ledger
            .paginated(2)
            .unwrap()
            .map(|page| page.names().collect())
            .collect();
        assert_eq!(pages, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);
    }

    #[test]
    fn paginated_is_restartable() {
        let ledger = ledger_of(&["a", "b", "c"]);
        let first: Vec<usize> = ledger.paginated(2).unwrap().map(|p| p.len()).collect();
        let second: Vec<usize> = ledger.paginated(2).unwrap().map(|p| p.len()).collect();
        assert_eq!(first, [2, 1]);
        assert_eq!(first, second);
    }

    #[test]
    fn paginated_rejects_zero_and_handles_empty() {
        let ledger = Ledger::new();
        assert!(matches!(ledger.paginated(0), Err(BookError::InvalidPageSize(_))));
        assert_eq!(ledger.paginated(3).unwrap().count(), 0);
    }

    #[test]
    fn page_lookup_by_name() {
        let ledger = ledger_of(&["a", "b", "c"]);
        let page = ledger.paginated(2).unwrap().nth(1).unwrap();
        assert!(page.get("c").is_some());
        assert!(page.get("a").is_none());
    }

    #[test]
    fn search_yields_each_record_once() {
        let mut ledger = Ledger::new();
        ledger.add_record(record("Bob", &["1231231231"])).unwrap();
        let found: Vec<_> = ledger.search("123").unwrap().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "Bob");

        let mut ledger = Ledger::new();
        ledger
            .add_record(record("Agent 007", &["0070000000", "1007000000"]))
            .unwrap();
        assert_eq!(ledger.search("007").unwrap().count(), 1);
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let mut ledger = Ledger::new();
        ledger.add_record(record("Maria", &[])).unwrap();
        ledger.add_record(record("Bob", &[])).unwrap();
        ledger.add_record(record("MARIO", &[])).unwrap();

        let names: Vec<_> = ledger.search("mAr").unwrap().map(Record::name).collect();
        assert_eq!(names, ["Maria", "MARIO"]);
    }

    #[test]
    fn search_rejects_empty_sample() {
        let ledger = ledger_of(&["a"]);
        assert!(matches!(ledger.search(""), Err(BookError::EmptySample)));
    }

    #[test]
    fn clear_removes_everything() {
        let mut ledger = ledger_of(&["a", "b"]);
        ledger.clear();
        assert!(ledger.is_empty());
    }
}
