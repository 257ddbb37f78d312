//! Error definitions.

use std::collections::TryReserveError;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can be returned when parsing, encoding or computing with date literals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The text does not match the grammar, or the pattern itself is malformed.
    #[error("{0}")]
    InvalidFormat(String),
    /// A field exceeds its bounds or the date does not exist in the calendar.
    #[error("{0}")]
    OutOfRange(String),
    /// The requested conversion has no date/datetime counterpart.
    #[error("{0}")]
    UnsupportedConversion(String),
    #[error("{0}")]
    FormatError(String),
    #[error("{0}")]
    IoError(String),
    #[error("{0}")]
    TryReserveError(TryReserveError),
}

impl From<std::fmt::Error> for Error {
    #[inline]
    fn from(e: std::fmt::Error) -> Self {
        match try_format!("{}", e) {
            Ok(s) => Error::FormatError(s),
            Err(e) => e,
        }
    }
}

impl From<std::io::Error> for Error {
    #[inline]
    fn from(e: std::io::Error) -> Self {
        match try_format!("date literal record i/o failed: {}", e) {
            Ok(s) => Error::IoError(s),
            Err(e) => e,
        }
    }
}

impl From<TryReserveError> for Error {
    #[inline]
    fn from(e: TryReserveError) -> Self {
        Error::TryReserveError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let err = Error::OutOfRange("date literal [2023-02-29] is out of range".to_string());
        assert_eq!(err.to_string(), "date literal [2023-02-29] is out of range");

        let err: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert_eq!(err, Error::IoError("date literal record i/o failed: eof".to_string()));
    }
}
