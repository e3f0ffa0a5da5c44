//! Error types for the isopay library.

use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during record handling and message generation.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading a CSV field record.
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error serializing XML output.
    #[error("XML serialization error: {0}")]
    XmlError(String),

    /// Invalid amount format.
    #[error("Invalid amount format: {0}")]
    InvalidAmount(String),

    /// Invalid exchange rate value.
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    /// Invalid message type specified.
    #[error("Invalid message type: {0}")]
    InvalidMessageType(String),

    /// Invalid channel or Fedwire sub-type combination.
    #[error("Invalid channel: {0}")]
    InvalidChannel(String),

    /// Cross-field validation rejected the record. Each entry describes
    /// one missing or malformed field; no XML is produced while any exist.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Neither the rate provider nor the fallback table has the pair.
    #[error("No exchange rate available for {from}/{to}")]
    RateUnavailable { from: String, to: String },

    /// The rate provider call failed outright.
    #[error("Rate provider error: {0}")]
    RateProvider(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlError(err.to_string())
    }
}
