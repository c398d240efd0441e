//! Errors raised while rebuilding a section from external data.

use thiserror::Error;

/// Errors that can occur when decoding a section or assembling one from raw
/// parts.
///
/// Each error applies to a single section; nothing is partially loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SectionError {
    /// The input ended before the section was complete.
    #[error("data truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the field being read.
        expected: usize,
        /// Bytes that were left in the input.
        actual: usize,
    },
    /// The descriptor byte does not carry the network-encoding flag.
    #[error("unsupported section encoding (descriptor byte {0:#04x})")]
    UnsupportedEncoding(u8),
    /// The bit width is not one of 1, 2, 3, 4, 5, 6, 8 or 16.
    #[error("invalid bit width: {0}")]
    InvalidBitWidth(u8),
    /// A variable-length integer ran past its maximum length or overflowed.
    #[error("malformed variable-length integer")]
    MalformedVarInt,
    /// The palette is empty or larger than the bit width can address.
    #[error("palette of {len} entries does not fit a {bits}-bit profile")]
    PaletteSizeMismatch {
        /// Palette length found.
        len: usize,
        /// Bit width of the packed words.
        bits: u8,
    },
    /// The palette lists the same value more than once.
    #[error("palette entry {index} repeats an earlier value")]
    DuplicatePaletteEntry {
        /// Position of the repeated entry.
        index: usize,
    },
    /// The packed word slice has the wrong length for its bit width.
    #[error("word count mismatch: expected {expected}, got {actual}")]
    WordCountMismatch {
        /// Words required by the bit width.
        expected: usize,
        /// Words supplied.
        actual: usize,
    },
    /// A palette value does not convert into the section's value type.
    #[error("palette value {0} out of range")]
    InvalidValue(i32),
    /// Bytes remained after a standalone section payload.
    #[error("{0} trailing bytes after section")]
    TrailingBytes(usize),
}
