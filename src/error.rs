/// Result type shared by `BinaryReader` and `BinaryWriter`.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for `BinaryReader` and `BinaryWriter`.
///
/// Both types latch the first error they report. Until the error is cleared with
/// `discard_error()` or `reset()`, every later operation fails with the same value and does
/// not change any state.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum Error {
    /// A logical failure, such as `BinaryReader::find` not finding the requested byte.
    #[error("the operation failed")]
    Failed,

    /// A read, skip, or seek would move the cursor past the valid range.
    #[error("the operation would move the cursor out of bounds")]
    OutOfBounds,

    /// The writer could not make room for the requested bytes, either because the allocator
    /// failed or because the writer is bound to a fixed-size buffer.
    #[error("the buffer could not provide the requested capacity")]
    OutOfMemory,
}

impl Error {
    /// The numeric code for this error.
    pub const fn code(self) -> ErrorCode {
        match self {
            Self::Failed => ErrorCode::Failed,
            Self::OutOfBounds => ErrorCode::OutOfBounds,
            Self::OutOfMemory => ErrorCode::OutOfMemory,
        }
    }
}

/// Numeric status codes, for callers that exchange status values with other components.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[repr(u8)]
pub enum ErrorCode {
    /// No error.
    #[default]
    Ok = 0,
    /// See `Error::Failed`.
    Failed = 1,
    /// See `Error::OutOfBounds`.
    OutOfBounds = 2,
    /// See `Error::OutOfMemory`.
    OutOfMemory = 3,
}

impl ErrorCode {
    /// Returns the raw numeric value of this code.
    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Converts a raw numeric value into a code. Returns `None` for unknown values.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Ok),
            1 => Some(Self::Failed),
            2 => Some(Self::OutOfBounds),
            3 => Some(Self::OutOfMemory),
            _ => None,
        }
    }

    /// Converts this code into an `Error`. `ErrorCode::Ok` maps to `None`.
    pub const fn error(self) -> Option<Error> {
        match self {
            Self::Ok => None,
            Self::Failed => Some(Error::Failed),
            Self::OutOfBounds => Some(Error::OutOfBounds),
            Self::OutOfMemory => Some(Error::OutOfMemory),
        }
    }
}

impl From<Option<Error>> for ErrorCode {
    fn from(error: Option<Error>) -> Self {
        match error {
            None => Self::Ok,
            Some(e) => e.code(),
        }
    }
}

impl From<Error> for ErrorCode {
    fn from(error: Error) -> Self {
        error.code()
    }
}

#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        let kind = match error {
            Error::Failed => std::io::ErrorKind::Other,
            Error::OutOfBounds => std::io::ErrorKind::UnexpectedEof,
            Error::OutOfMemory => std::io::ErrorKind::WriteZero,
        };
        std::io::Error::new(kind, error)
    }
}
