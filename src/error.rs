//! Library-wide error and result types.

use std::fmt;
use std::io;

/// Result alias used throughout cheatkit.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Error messages are kept intentionally terse; callers that need richer
/// context should wrap `Error` in their own type.
#[derive(Debug)]
pub enum Error {
    /// An ARMAX code string did not have exactly 13 symbols after dashes and
    /// whitespace were removed. Carries the length that was found.
    InvalidLength(usize),
    /// A character outside the 32-symbol ARMAX alphabet.
    InvalidCharacter(char),
    /// The 4-bit checksum stored in the first decrypted word did not match
    /// the one recomputed over the batch.
    CrcMismatch { stored: u8, computed: u8 },
    /// A bitstream read ran past the end of the decrypted buffer.
    VerifierUnderflow,
    /// A verifier size-class index with no expansion length.
    UnknownSizeClass(u32),
    /// A batch contained no usable code.
    NoCodes,
    /// A structural constraint was violated (message describes which one).
    Parse(&'static str),
    /// An underlying I/O operation failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidLength(n) => write!(f, "code must be 13 characters, got {n}"),
            Error::InvalidCharacter(c) => write!(f, "invalid code character: {c:?}"),
            Error::CrcMismatch { stored, computed } => {
                write!(f, "checksum mismatch: stored {stored:X}, computed {computed:X}")
            }
            Error::VerifierUnderflow => write!(f, "verifier ran past end of codes"),
            Error::UnknownSizeClass(i) => write!(f, "unknown verifier size class: {i}"),
            Error::NoCodes => write!(f, "no valid codes"),
            Error::Parse(s) => write!(f, "parse error: {s}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Error::Io(e) = self {
            Some(e)
        } else {
            None
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_terse() {
        assert_eq!(
            Error::InvalidLength(12).to_string(),
            "code must be 13 characters, got 12"
        );
        assert_eq!(
            Error::InvalidCharacter('O').to_string(),
            "invalid code character: 'O'"
        );
        assert_eq!(
            Error::CrcMismatch {
                stored: 0xA,
                computed: 0x3
            }
            .to_string(),
            "checksum mismatch: stored A, computed 3"
        );
    }

    #[test]
    fn io_error_is_source() {
        use std::error::Error as _;
        let e = Error::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(e.source().is_some());
        assert!(Error::NoCodes.source().is_none());
    }
}
