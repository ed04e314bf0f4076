use crate::error::{BookError, Result};
use crate::fields::{self, Birthday, Phone};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One contact. The name is the identity key and never changes after
/// construction; phones and birthday are validated on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    name: String,
    phones: Vec<Phone>,
    birthday: Option<Birthday>,
}

impl Record {
    pub fn new(name: impl Into<String>, birthday: Option<&str>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BookError::EmptyName);
        }
        let birthday = birthday.map(Birthday::new).transpose()?;
        Ok(Self {
            name,
            phones: Vec::new(),
            birthday,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn birthday(&self) -> Option<Birthday> {
        self.birthday
    }

    pub fn set_birthday(&mut self, birthday: &str) -> Result<()> {
        self.birthday = Some(Birthday::new(birthday)?);
        Ok(())
    }

    /// Duplicates are kept; a contact may list the same number twice.
    pub fn add_phone(&mut self, phone: &str) -> Result<()> {
        self.phones.push(Phone::new(phone)?);
        Ok(())
    }

    pub fn remove_phone(&mut self, phone: &str) -> Result<Phone> {
        let pos = self.position_of(phone)?;
        Ok(self.phones.remove(pos))
    }

    pub fn edit_phone(&mut self, old_phone: &str, new_phone: &str) -> Result<()> {
        let pos = self.position_of(old_phone)?;
        self.phones[pos] = Phone::new(new_phone)?;
        Ok(())
    }

    pub fn find_phone(&self, phone: &str) -> Option<&Phone> {
        self.phones.iter().find(|p| *p == phone)
    }

    pub fn days_to_birthday(&self) -> Option<i64> {
        self.days_to_birthday_from(fields::today())
    }

    /// Days from `today` until the next occurrence of the birthday's month and
    /// day. `Some(0)` on the birthday itself. 29 February falls back to
    /// 28 February in non-leap years.
    pub fn days_to_birthday_from(&self, today: NaiveDate) -> Option<i64> {
        let born = self.birthday?.date();
        let mut next = anniversary(born, today.year())?;
        if next < today {
            next = anniversary(born, today.year() + 1)?;
        }
        Some((next - today).num_days())
    }

    pub fn to_display_string(&self) -> String {
        let phones = self
            .phones
            .iter()
            .map(Phone::as_str)
            .collect::<Vec<_>>()
            .join("; ");
        let birthday = self
            .birthday
            .map(|b| b.to_string())
            .unwrap_or_else(|| "not set".to_string());
        format!(
            "Contact name: {}, phones: {}, birthday: {}",
            self.name, phones, birthday
        )
    }

    fn position_of(&self, phone: &str) -> Result<usize> {
        self.phones
            .iter()
            .position(|p| p == phone)
            .ok_or_else(|| BookError::PhoneNotFound(phone.to_string()))
    }
}

fn anniversary(born: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, born.month(), born.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn alice() -> Record {
        let mut record = Record::new("Alice", Some("01.01.1990")).unwrap();
        record.add_phone("1234567890").unwrap();
        record
    }

    #[test]
    fn rejects_blank_names() {
        assert!(matches!(Record::new("", None), Err(BookError::EmptyName)));
        assert!(matches!(Record::new("   ", None), Err(BookError::EmptyName)));
    }

    #[test]
    fn rejects_invalid_birthday_at_construction() {
        assert!(matches!(
            Record::new("Bob", Some("1990/01/01")),
            Err(BookError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            Record::new("Bob", Some("01.01.9999")),
            Err(BookError::FutureBirthday(_))
        ));
    }

    #[test]
    fn set_birthday_keeps_old_value_on_error() {
        let mut record = alice();
        assert!(record.set_birthday("not a date").is_err());
        assert_eq!(record.birthday().unwrap().to_string(), "01.01.1990");

        record.set_birthday("15.03.1991").unwrap();
        assert_eq!(record.birthday().unwrap().to_string(), "15.03.1991");
    }

    #[test]
    fn add_phone_validates_and_allows_duplicates() {
        let mut record = alice();
        assert!(matches!(
            record.add_phone("12345"),
            Err(BookError::InvalidPhoneFormat(_))
        ));
        record.add_phone("1234567890").unwrap();
        assert_eq!(record.phones().len(), 2);
    }

    #[test]
    fn remove_phone_removes_first_match_only() {
        let mut record = alice();
        record.add_phone("5555555555").unwrap();
        record.add_phone("1234567890").unwrap();

        record.remove_phone("1234567890").unwrap();
        let phones: Vec<_> = record.phones().iter().map(Phone::as_str).collect();
        assert_eq!(phones, ["5555555555", "1234567890"]);

        assert!(matches!(
            record.remove_phone("0000000000"),
            Err(BookError::PhoneNotFound(_))
        ));
    }

    #[test]
    fn edit_phone_replaces_in_place() {
        let mut record = alice();
        record.add_phone("5555555555").unwrap();

        record.edit_phone("1234567890", "0987654321").unwrap();
        let phones: Vec<_> = record.phones().iter().map(Phone::as_str).collect();
        assert_eq!(phones, ["0987654321", "5555555555"]);
    }

    #[test]
    fn edit_phone_reports_missing_and_invalid() {
        let mut record = alice();
        assert!(matches!(
            record.edit_phone("0000000000", "1111111111"),
            Err(BookError::PhoneNotFound(_))
        ));
        assert!(matches!(
            record.edit_phone("1234567890", "bad"),
            Err(BookError::InvalidPhoneFormat(_))
        ));
        assert_eq!(record.phones()[0].as_str(), "1234567890");
    }

    #[test]
    fn find_phone_returns_none_when_absent() {
        let record = alice();
        assert_eq!(record.find_phone("1234567890").unwrap().as_str(), "1234567890");
        assert!(record.find_phone("0000000000").is_none());
    }

    #[test]
    fn days_to_birthday_rolls_into_next_year() {
        let record = alice();
        assert_eq!(record.days_to_birthday_from(date(2024, 1, 2)), Some(365));
        assert_eq!(record.days_to_birthday_from(date(2023, 1, 2)), Some(364));
    }

    #[test]
    fn days_to_birthday_later_this_year_and_today() {
        let record = Record::new("Carol", Some("10.06.1980")).unwrap();
        assert_eq!(record.days_to_birthday_from(date(2024, 6, 1)), Some(9));
        assert_eq!(record.days_to_birthday_from(date(2024, 6, 10)), Some(0));
    }

    #[test]
    fn days_to_birthday_on_leap_day() {
        let record = Record::new("Leap", Some("29.02.2000")).unwrap();
        assert_eq!(record.days_to_birthday_from(date(2023, 2, 1)), Some(27));
        assert_eq!(record.days_to_birthday_from(date(2024, 2, 1)), Some(28));
    }

    #[test]
    fn days_to_birthday_without_birthday() {
        let record = Record::new("Dave", None).unwrap();
        assert_eq!(record.days_to_birthday_from(date(2024, 1, 2)), None);
    }

    #[test]
    fn display_lists_all_fields() {
        let mut record = alice();
        record.add_phone("0987654321").unwrap();
        assert_eq!(
            record.to_string(),
            "Contact name: Alice, phones: 1234567890; 0987654321, birthday: 01.01.1990"
        );

        let bare = Record::new("Dave", None).unwrap();
        assert_eq!(
            bare.to_display_string(),
            "Contact name: Dave, phones: , birthday: not set"
        );
    }
}
