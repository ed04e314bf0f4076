//! # API Facade
//!
//! [`BookApi`] is the single entry point the command dispatcher talks to. It
//! owns the [`Ledger`] and the location of its data file.
//!
//! Each method performs exactly one ledger or record operation and returns a
//! [`CmdResult`]: the records to show plus status messages. Failures are
//! returned as [`BookError`](crate::error::BookError) values for the caller
//! to render; nothing here prints or exits.

use crate::error::Result;
use crate::ledger::Ledger;
use crate::model::Record;
use crate::store::Format;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the ledger lives between runs.
#[derive(Debug, Clone)]
pub struct BookPaths {
    pub data_file: PathBuf,
    pub format: Format,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listed_records: Vec<Record>,
    pub pages: Vec<Vec<Record>>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_listed_records(mut self, records: Vec<Record>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_pages(mut self, pages: Vec<Vec<Record>>) -> Self {
        self.pages = pages;
        self
    }
}

pub struct BookApi {
    ledger: Ledger,
    paths: BookPaths,
}

impl BookApi {
    pub fn new(ledger: Ledger, paths: BookPaths) -> Self {
        Self { ledger, paths }
    }

    /// Loads the data file if there is one, otherwise starts empty.
    pub fn open(paths: BookPaths) -> Result<Self> {
        let mut ledger = Ledger::new();
        if paths.data_file.exists() {
            ledger.load(&paths.data_file, paths.format)?;
            info!(
                path = %paths.data_file.display(),
                records = ledger.len(),
                "opened address book"
            );
        } else {
            info!(path = %paths.data_file.display(), "no data file yet, starting empty");
        }
        Ok(Self::new(ledger, paths))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn paths(&self) -> &BookPaths {
        &self.paths
    }

    /// The record is only inserted when the name, phone and birthday are all valid.
    pub fn add_contact(
        &mut self,
        name: &str,
        phone: Option<&str>,
        birthday: Option<&str>,
    ) -> Result<CmdResult> {
        let mut record = Record::new(name, birthday)?;
        if let Some(phone) = phone {
            record.add_phone(phone)?;
        }
        self.ledger.add_record(record.clone())?;
        Ok(CmdResult::default()
            .with_listed_records(vec![record])
            .with_message(CmdMessage::success(format!(
                "New name {} has been added",
                name
            ))))
    }

    pub fn add_phone(&mut self, name: &str, phone: &str) -> Result<CmdResult> {
        self.ledger.find_mut(name)?.add_phone(phone)?;
        Ok(CmdResult::default().with_message(CmdMessage::success(format!(
            "Phone number {} for name {} has been added",
            phone, name
        ))))
    }

    pub fn remove_phone(&mut self, name: &str, phone: &str) -> Result<CmdResult> {
        self.ledger.find_mut(name)?.remove_phone(phone)?;
        Ok(CmdResult::default().with_message(CmdMessage::success(format!(
            "Phone number {} for name {} has been removed",
            phone, name
        ))))
    }

    pub fn edit_phone(&mut self, name: &str, old_phone: &str, new_phone: &str) -> Result<CmdResult> {
        self.ledger.find_mut(name)?.edit_phone(old_phone, new_phone)?;
        Ok(CmdResult::default().with_message(CmdMessage::success(format!(
            "Phone number {} for name {} has been changed to {}",
            old_phone, name, new_phone
        ))))
    }

    pub fn remove_contact(&mut self, name: &str) -> Result<CmdResult> {
        let removed = self.ledger.delete(name)?;
        Ok(CmdResult::default()
            .with_listed_records(vec![removed])
            .with_message(CmdMessage::success(format!("{} has been removed", name))))
    }

    pub fn show_contact(&self, name: &str) -> Result<CmdResult> {
        let record = self.ledger.find(name)?;
        Ok(CmdResult::default().with_listed_records(vec![record.clone()]))
    }

    pub fn set_birthday(&mut self, name: &str, birthday: &str) -> Result<CmdResult> {
        let record = self.ledger.find_mut(name)?;
        record.set_birthday(birthday)?;
        let stored = record
            .birthday()
            .map(|b| b.to_string())
            .unwrap_or_default();
        Ok(CmdResult::default().with_message(CmdMessage::success(format!(
            "Birthday for {} has been set to {}",
            name, stored
        ))))
    }

    pub fn days_to_birthday(&self, name: &str) -> Result<CmdResult> {
        let record = self.ledger.find(name)?;
        let message = match record.days_to_birthday() {
            Some(0) => CmdMessage::success(format!("Today is {}'s birthday!", name)),
            Some(1) => CmdMessage::info(format!("1 day until {}'s birthday", name)),
            Some(days) => CmdMessage::info(format!("{} days until {}'s birthday", days, name)),
            None => CmdMessage::warning(format!("No birthday set for {}", name)),
        };
        Ok(CmdResult::default().with_message(message))
    }

    pub fn search(&self, sample: &str) -> Result<CmdResult> {
        let found: Vec<Record> = self.ledger.search(sample)?.cloned().collect();
        debug!(sample, matches = found.len(), "search");

        let mut result = CmdResult::default();
        if found.is_empty() {
            result.add_message(CmdMessage::info("Nothing found"));
        }
        Ok(result.with_listed_records(found))
    }

    pub fn show_all(&self, page_size: usize) -> Result<CmdResult> {
        let pages: Vec<Vec<Record>> = self
            .ledger
            .paginated(page_size)?
            .map(|page| page.records().to_vec())
            .collect();

        let mut result = CmdResult::default();
        if pages.is_empty() {
            result.add_message(CmdMessage::warning("It's empty. There are no records."));
        }
        Ok(result.with_pages(pages))
    }

    /// Writes the ledger to a new file. Never overwrites.
    pub fn export(&self, path: &Path, format: Option<Format>) -> Result<CmdResult> {
        let format = self.resolve_format(path, format);
        self.ledger.save(path, format, false)?;
        Ok(CmdResult::default().with_message(CmdMessage::success(format!(
            "Exported {} records to {} ({})",
            self.ledger.len(),
            path.display(),
            format
        ))))
    }

    /// Replaces the whole ledger with the contents of `path`.
    pub fn import(&mut self, path: &Path, format: Option<Format>) -> Result<CmdResult> {
        let format = self.resolve_format(path, format);
        self.ledger.load(path, format)?;
        Ok(CmdResult::default().with_message(CmdMessage::success(format!(
            "Imported {} records from {}",
            self.ledger.len(),
            path.display()
        ))))
    }

    pub fn clear(&mut self) -> Result<CmdResult> {
        let count = self.ledger.len();
        self.ledger.clear();
        Ok(CmdResult::default().with_message(CmdMessage::success(format!(
            "Removed {} records",
            count
        ))))
    }

    /// Writes the ledger back to its data file.
    pub fn save(&self, overwrite: bool) -> Result<CmdResult> {
        self.ledger
            .save(&self.paths.data_file, self.paths.format, overwrite)?;
        info!(
            path = %self.paths.data_file.display(),
            records = self.ledger.len(),
            "saved address book"
        );
        Ok(CmdResult::default().with_message(CmdMessage::info(format!(
            "Saved {} records to {}",
            self.ledger.len(),
            self.paths.data_file.display()
        ))))
    }

    fn resolve_format(&self, path: &Path, format: Option<Format>) -> Format {
        format
            .or_else(|| Format::from_path(path))
            .unwrap_or(self.paths.format)
    }
}
