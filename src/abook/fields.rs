//! # Field Validators
//!
//! Every value stored on a [`Record`](crate::model::Record) goes through one of
//! the validators here, both when it is first set and on every later change.
//! The newtypes [`Phone`] and [`Birthday`] can only be built through them, so
//! an invalid value never reaches the ledger, including values read back from
//! disk (both types re-validate on deserialization).

use crate::error::{BookError, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PHONE_LEN: usize = 10;
pub const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";

/// Succeeds iff `s` is exactly ten ASCII digits.
pub fn validate_phone(s: &str) -> Result<()> {
    if s.len() == PHONE_LEN && s.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(BookError::InvalidPhoneFormat(s.to_string()))
    }
}

/// Parses a `dd.mm.yyyy` birthday and rejects dates after today.
pub fn validate_birthday(s: &str) -> Result<NaiveDate> {
    validate_birthday_on(s, today())
}

/// Same as [`validate_birthday`], against an explicit reference date.
pub fn validate_birthday_on(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let has_full_year = s
        .rsplit('.')
        .next()
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()));
    if !has_full_year {
        return Err(BookError::InvalidDateFormat(s.to_string()));
    }

    let date = NaiveDate::parse_from_str(s, BIRTHDAY_FORMAT)
        .map_err(|_| BookError::InvalidDateFormat(s.to_string()))?;
    if date > today {
        return Err(BookError::FutureBirthday(s.to_string()));
    }
    Ok(date)
}

/// The local calendar date, time of day dropped.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn new(s: &str) -> Result<Self> {
        validate_phone(s)?;
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Phone {
    type Error = BookError;

    fn try_from(value: String) -> Result<Self> {
        validate_phone(&value)?;
        Ok(Self(value))
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Phone {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// A validated, non-future birthday. Always rendered zero-padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday(NaiveDate);

impl Birthday {
    pub fn new(s: &str) -> Result<Self> {
        validate_birthday(s).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl TryFrom<String> for Birthday {
    type Error = BookError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Birthday> for String {
    fn from(birthday: Birthday) -> Self {
        birthday.to_string()
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDAY_FORMAT))
    }
}
