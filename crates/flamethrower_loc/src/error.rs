//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent wrapper for [`std::string::FromUtf8Error`]
    #[error(transparent)]
    UTF8Error(#[from] std::string::FromUtf8Error),

    /// Transparent wrapper for [`serde_json::Error`]
    #[cfg(feature = "serde")]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// File is not a histogram chunk
    #[error("invalid histogram chunk")]
    InvalidHistogram,

    /// File is not a strings binary chunk
    #[error("invalid strings binary chunk")]
    InvalidStringsBinary,

    /// The histogram cannot address any more characters
    #[error("too many characters, shift number {shift:#04X} is out of range")]
    TooManyCharacters {
        /// The first shift number that could not be stored
        shift: usize,
    },

    /// A size or offset in the header points past the end of the chunk
    #[error("chunk is truncated, {expected} bytes are required but only {available} are present")]
    TruncatedChunk {
        /// Number of bytes the header requires
        expected: u64,
        /// Number of bytes present
        available: u64,
    },

    /// The table is shorter than the base single byte range
    #[error("histogram table has {0} slots, at least 256 are required to add characters")]
    TableTooSmall(usize),

    /// The shift table never settled on a size
    #[error("shift table did not converge after {iterations} iterations")]
    ShiftsDidNotConverge {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// A character has no byte form under the current histogram
    #[error("unable to encode character {0:?}")]
    UnencodableCharacter(char),

    /// An encoded string referenced a slot outside the histogram
    #[error("character index {0:#X} is outside of the histogram")]
    InvalidCharacterIndex(usize),

    /// An encoded string ended in the middle of a shifted character
    #[error("encoded string ends after a shift byte")]
    TruncatedString,

    /// The header string cannot fit before the hash pairs
    #[error("header string of {0} bytes does not fit in the chunk header")]
    HeaderTooLong(usize),

    /// Strings were changed without serializing them again
    #[error("strings binary has pending changes, call update before saving")]
    NotUpdated,
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
