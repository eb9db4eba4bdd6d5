use std::error::Error as StdError;
use std::fmt;
use std::io;

use ndarray::ShapeError;

use crate::types::{StringError, ValueError};

/// The error type for storage-related operations.
#[derive(Clone, PartialEq, Eq)]
pub enum Error {
    /// The storage backend refused an operation (missing object, wrong mode, bad layout).
    Storage(String),
    /// A user error occurred in the high-level API (e.g., invalid user input).
    Internal(String),
}

/// A type for results generated by storage operations where the `Err` type is
/// set to `h5fixture::Error`.
pub type Result<T, E = Error> = ::std::result::Result<T, E>;

impl Error {
    pub fn storage<S: Into<String>>(desc: S) -> Self {
        Self::Storage(desc.into())
    }

    pub fn description(&self) -> &str {
        match *self {
            Self::Storage(ref desc) | Self::Internal(ref desc) => desc,
        }
    }
}

impl From<&str> for Error {
    fn from(desc: &str) -> Self {
        Self::Internal(desc.into())
    }
}

impl From<String> for Error {
    fn from(desc: String) -> Self {
        Self::Internal(desc)
    }
}

impl From<ValueError> for Error {
    fn from(err: ValueError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<StringError> for Error {
    fn from(err: StringError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        format!("shape error: {err}").into()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl StdError for Error {}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        Self::new(io::ErrorKind::Other, err)
    }
}

#[cfg(test)]
pub mod tests {
    use ndarray::{ErrorKind, ShapeError};

    use super::*;

    #[test]
    pub fn test_conversions() {
        let err: Error = "foo".into();
        assert_eq!(err, Error::Internal("foo".into()));
        let err: Error = ShapeError::from_kind(ErrorKind::IncompatibleShape).into();
        assert!(err.to_string().starts_with("shape error: "));
        let err: Error = ValueError::MissingField("x".into()).into();
        assert_eq!(err.to_string(), "value error: missing field 'x'");
        let err: Error = StringError::InternalNull.into();
        assert!(err.description().contains("internal null"));
    }

    #[test]
    pub fn test_io_error() {
        let err = io::Error::from(Error::storage("unable to open file"));
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(err.to_string(), "unable to open file");
    }
}
