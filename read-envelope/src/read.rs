//! Traits for interpreting envelope data

use crate::envelope_data::EnvelopeData;

/// A type that can be read from a raw transfer envelope.
///
/// `read` is responsible for validating the buffer's structure: region
/// lengths must chain within bounds and discriminant bytes must name a known
/// kind. Accessors on the returned reader are lazy; they decode only the
/// field that was asked for.
pub trait EnvelopeRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing validation.
    fn read(data: EnvelopeData<'a>) -> Result<Self, ReadError>;
}

/// An error that occurs when reading envelope data.
///
/// Envelopes only ever come from this workspace's own writer, so any of
/// these indicates a codec bug or a buffer that was corrupted in transit;
/// they are not recoverable conditions a caller should branch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    OutOfBounds,
    InvalidArrayLen,
    InvalidPatternKind(u8),
    InvalidFigureKind(u8),
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "A region was out of bounds"),
            ReadError::InvalidArrayLen => {
                write!(f, "Region length not a multiple of item size")
            }
            ReadError::InvalidPatternKind(byte) => {
                write!(f, "Invalid pattern kind '{byte}'")
            }
            ReadError::InvalidFigureKind(byte) => {
                write!(f, "Invalid figure kind '{byte}'")
            }
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {}
