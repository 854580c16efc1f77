//! The error type shared by the coding stages.
use thiserror::Error;

use crate::Symbol;

/// An error raised by the analysis, encoding or decoding of a buffer.
///
/// None of these are recoverable for the buffer at hand. They signal that the caller handed
/// over data which does not fit together, such as a packed buffer and a table built from a
/// different input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FanoError {
    /// No code can be derived from an empty buffer.
    #[error("empty input: there are no symbols to build a code from")]
    EmptyInput,

    /// The encoder met a byte for which the table holds no code.
    #[error("symbol {symbol:#04x} at offset {position} has no code in the table")]
    MissingSymbol { symbol: Symbol, position: usize },

    /// A packed buffer needs at least its header byte.
    #[error("packed buffer is missing its header byte")]
    MissingHeader,

    /// The header declares more padding than is possible or than there are bits.
    #[error("invalid padding of {padding} bits with {available} bits available")]
    InvalidPadding { padding: u8, available: usize },

    /// No code in the table matches the bits at this position.
    #[error("no code matches the bit stream at bit {position}")]
    NoMatchingCode { position: usize },
}
