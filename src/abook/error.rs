use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookError {
    #[error("Name is not specified")]
    EmptyName,

    #[error("Name \"{0}\" already exists")]
    DuplicateName(String),

    #[error("Name \"{0}\" does not exist")]
    NameNotFound(String),

    #[error("Phone \"{0}\" does not exist")]
    PhoneNotFound(String),

    #[error("Incorrect phone number format \"{0}\". Should be 10 digits")]
    InvalidPhoneFormat(String),

    #[error("Incorrect birthday format \"{0}\". Please use dd.mm.yyyy pattern")]
    InvalidDateFormat(String),

    #[error("Birthday date \"{0}\" is in the future")]
    FutureBirthday(String),

    #[error("Incorrect page size \"{0}\". Page size should be greater than 0")]
    InvalidPageSize(String),

    #[error("Search sample is empty")]
    EmptySample,

    #[error("File already exists: {}", .0.display())]
    FileAlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, BookError>;
