use core::fmt::{Display, Formatter};

/// `ntp-wire` result type
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for packet, timestamp and leap-second table operations
///
/// Errors are handed back to the caller as-is. Nothing in this crate logs,
/// retries or recovers from them.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[non_exhaustive]
pub enum Error {
    /// A buffer holding or receiving an NTP packet is shorter than
    /// [`PACKET_SIZE`](crate::PACKET_SIZE) bytes
    IncorrectPayload,
    /// Leap-second table does not start with the `TZif` magic, its fixed
    /// header is cut short or its block structure is inconsistent
    BadData,
    /// Leap-second table version is not one of `0x00`, `'2'`, `'3'`, or a
    /// write was requested for a version other than `'2'`
    UnsupportedVersion,
    /// A variable-length section of a leap-second table is shorter than its
    /// header declares
    Truncated,
    /// The leap-second table is well formed but holds no leap seconds
    NoLeapSeconds,
    /// Every leap second in the table lies in the future
    NoApplicableLeapSecond,
    /// Network error occurred
    Network,
    /// Reading or writing a leap-second table failed
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::IncorrectPayload => {
                write!(f, "NTP packet must be {} bytes", crate::PACKET_SIZE)
            }
            Error::BadData => write!(f, "malformed leap second table"),
            Error::UnsupportedVersion => {
                write!(f, "unsupported leap second table version")
            }
            Error::Truncated => write!(f, "leap second table is truncated"),
            Error::NoLeapSeconds => {
                write!(f, "no leap seconds in the table")
            }
            Error::NoApplicableLeapSecond => {
                write!(f, "no leap second applies at the current time")
            }
            Error::Network => write!(f, "network error"),
            #[cfg(feature = "std")]
            Error::Io(kind) => write!(f, "I/O error: {kind}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::Truncated,
            kind => Error::Io(kind),
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod error_tests {
    use super::Error;
    use std::io;

    #[test]
    fn test_short_read_is_truncation() {
        let err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");

        assert_eq!(Error::from(err), Error::Truncated);
    }

    #[test]
    fn test_io_kind_preserved() {
        let err = io::Error::new(io::ErrorKind::NotFound, "missing");

        assert_eq!(Error::from(err), Error::Io(io::ErrorKind::NotFound));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::IncorrectPayload.to_string(),
            "NTP packet must be 48 bytes"
        );
        assert_eq!(
            Error::NoLeapSeconds.to_string(),
            "no leap seconds in the table"
        );
    }
}
