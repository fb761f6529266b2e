use std::error;
use std::fmt;
use std::io;

/// A `Result` type alias for this crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that encapsulates all possible errors in this crate.
#[derive(Debug)]
pub enum Error {
    /// A key handed to the builder was malformed.
    ///
    /// Keys must be non-empty and no longer than 65,535 bytes (the packed
    /// representation stores key lengths in 16 bits).
    Input {
        /// A description of what was wrong with the key.
        msg: &'static str,
    },
    /// An operation was attempted in the wrong phase of the trie's life
    /// cycle.
    ///
    /// Keys can only be added before [`compile`](crate::Trie::compile) and
    /// searches can only run after it.
    State {
        /// A description of the operation that was out of phase.
        msg: &'static str,
    },
    /// A payload outside the `i32` range reached the serializer.
    ///
    /// The core trie types payloads as `i32`, so this is never produced
    /// here; it exists for binding layers that funnel wider host-language
    /// integers through [`write_to`](crate::Trie::write_to).
    Payload {
        /// The offending payload value.
        got: i64,
    },
    /// A file presented for mapping did not start with the expected magic
    /// number.
    ///
    /// This usually means the file is not a serialized trie at all, or was
    /// written on a machine with a different byte order.
    Magic {
        /// The magic number this version of the crate writes.
        expected: u16,
        /// The first two bytes of the rejected file.
        got: u16,
    },
    /// A file presented for mapping had the right magic number but an
    /// inconsistent layout: a truncated array, trailing bytes after the
    /// last array, or arrays that disagree about their shared length.
    Format {
        /// A description of the inconsistency.
        msg: &'static str,
    },
    /// An I/O error occurred while writing a trie or opening a mapping.
    Io(io::Error),
}

impl Error {
    pub(crate) const fn input(msg: &'static str) -> Error {
        Error::Input { msg }
    }

    pub(crate) const fn state(msg: &'static str) -> Error {
        Error::State { msg }
    }

    pub(crate) const fn format(msg: &'static str) -> Error {
        Error::Format { msg }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Input { msg } => write!(f, "invalid key: {}", msg),
            Error::State { msg } => write!(f, "invalid operation: {}", msg),
            Error::Payload { got } => write!(
                f,
                "payload {} cannot be represented as a 32-bit signed integer",
                got
            ),
            Error::Magic { expected, got } => write!(
                f,
                "error opening trie: expected magic number {:#06x}, \
                 got {:#06x}. The file is probably not a serialized trie, \
                 or was written on an incompatible machine.",
                expected, got
            ),
            Error::Format { msg } => {
                write!(f, "error opening trie: {}", msg)
            }
            Error::Io(ref err) => err.fmt(f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
