use std::num::ParseIntError;

use thiserror::Error;

/// Coarse category of a failure, one per pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Network,
    Parse,
    Connection,
    Write,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("connection to {url} failed: {message}")]
    Connection { url: String, message: String },

    #[error("write to {url} failed: {message}")]
    Write { url: String, message: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Network { .. } => ErrorKind::Network,
            Error::Parse(_) => ErrorKind::Parse,
            Error::Connection { .. } => ErrorKind::Connection,
            Error::Write { .. } => ErrorKind::Write,
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV has no header row")]
    MissingHeader,

    #[error("header has {0} columns, expected at least 4")]
    ShortHeader(usize),

    #[error("row {row} has {len} columns, header has {expected}")]
    ShortRow { row: usize, len: usize, expected: usize },

    #[error("invalid date {value:?} in header column {column}: {reason}")]
    Date {
        column: usize,
        value: String,
        reason: &'static str,
    },

    #[error("date {0} precedes 1970-01-01 and has no line protocol timestamp")]
    DateBeforeEpoch(chrono::NaiveDate),

    #[error("invalid count {value:?} at row {row}, column {column}: {source}")]
    Count {
        row: usize,
        column: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("negative count {value:?} at row {row}, column {column}")]
    NegativeCount { row: usize, column: usize, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
